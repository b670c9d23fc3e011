use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Produces ids for newly created records.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Produces creation timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Random v4 UUIDs in hyphenated text form.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidV4Ids;

impl IdGenerator for UuidV4Ids {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
pub use testing::{FixedClock, SequentialIds};
