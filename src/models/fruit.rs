use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::coerce;

/// One fruit inventory entry as stored and served.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fruit {
    pub id: String,
    pub name: String,
    pub variety: String,
    pub quantity: u64,
    pub supplier: String,
    pub harvest_date: DateTime<Utc>,
    pub available: bool,
    pub price: f64,
    pub creation_date: DateTime<Utc>,
}

impl Fruit {
    /// Builds the stored record from a validated payload plus server-assigned fields.
    pub fn from_new(id: String, creation_date: DateTime<Utc>, new: NewFruit) -> Self {
        Self {
            id,
            name: new.name,
            variety: new.variety,
            quantity: new.quantity,
            supplier: new.supplier,
            harvest_date: new.harvest_date,
            available: new.available,
            price: new.price,
            creation_date,
        }
    }

    /// Overwrites only the fields present in `update`.
    pub fn apply(&mut self, update: &FruitUpdate) {
        if let Some(available) = update.available {
            self.available = available;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(quantity) = update.quantity {
            self.quantity = quantity;
        }
    }
}

// ── Request payloads ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct NewFruit {
    pub name: String,
    pub variety: String,
    #[serde(deserialize_with = "coerce::quantity")]
    pub quantity: u64,
    pub supplier: String,
    #[serde(deserialize_with = "flexible_datetime::deserialize")]
    pub harvest_date: DateTime<Utc>,
    #[serde(default = "default_available", deserialize_with = "coerce::flag")]
    pub available: bool,
    #[serde(deserialize_with = "coerce::price")]
    pub price: f64,
}

impl NewFruit {
    pub fn validate(&self) -> AppResult<()> {
        validate_price(self.price)
    }
}

fn default_available() -> bool {
    true
}

/// Partial update: every field is optional, absent means "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FruitUpdate {
    #[serde(default, deserialize_with = "coerce::opt_flag")]
    pub available: Option<bool>,
    #[serde(default, deserialize_with = "coerce::opt_price")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "coerce::opt_quantity")]
    pub quantity: Option<u64>,
}

impl FruitUpdate {
    /// Field-wise merge where `self` wins over `fallback`.
    pub fn or(self, fallback: FruitUpdate) -> FruitUpdate {
        FruitUpdate {
            available: self.available.or(fallback.available),
            price: self.price.or(fallback.price),
            quantity: self.quantity.or(fallback.quantity),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.available.is_none() && self.price.is_none() && self.quantity.is_none()
    }

    pub fn validate(&self) -> AppResult<()> {
        match self.price {
            Some(price) => validate_price(price),
            None => Ok(()),
        }
    }
}

fn validate_price(price: f64) -> AppResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::InvalidField {
            field: "price",
            reason: "price must be a non-negative number".to_string(),
        });
    }
    Ok(())
}

// ── Date parsing ─────────────────────────────────────────────────────────────

/// Accepts RFC 3339, a naive ISO-8601 date-time (taken as UTC), or a bare date.
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

mod flexible_datetime {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_datetime(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid date/time `{}`", raw)))
    }
}
