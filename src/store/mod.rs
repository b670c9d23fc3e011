pub mod sources;

use anyhow::anyhow;
use indexmap::IndexMap;

use crate::error::{AppError, AppResult};
use crate::models::{Fruit, FruitUpdate, NewFruit};

pub use sources::{Clock, IdGenerator, SystemClock, UuidV4Ids};

/// How many fresh ids `create` asks for before giving up on a colliding generator.
const MAX_ID_ATTEMPTS: usize = 8;

/// In-memory fruit collection.
///
/// Backed by an `IndexMap` keyed on id: lookups are O(1) and iteration follows
/// insertion order, which is the order the list endpoint serves. Records are
/// never removed; soft delete only clears `available`.
pub struct FruitStore {
    fruits: IndexMap<String, Fruit>,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
}

impl Default for FruitStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FruitStore {
    pub fn new() -> Self {
        Self::with_sources(UuidV4Ids, SystemClock)
    }

    pub fn with_sources(ids: impl IdGenerator + 'static, clock: impl Clock + 'static) -> Self {
        Self {
            fruits: IndexMap::new(),
            ids: Box::new(ids),
            clock: Box::new(clock),
        }
    }

    pub fn len(&self) -> usize {
        self.fruits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fruits.is_empty()
    }

    /// Every record still marked available, oldest first.
    pub fn list_available(&self) -> Vec<Fruit> {
        self.fruits
            .values()
            .filter(|f| f.available)
            .cloned()
            .collect()
    }

    /// Looks a record up regardless of availability.
    pub fn get(&self, id: &str) -> AppResult<Fruit> {
        self.fruits.get(id).cloned().ok_or_else(|| not_found(id))
    }

    pub fn create(&mut self, new: NewFruit) -> AppResult<Fruit> {
        let id = self.fresh_id()?;
        let fruit = Fruit::from_new(id.clone(), self.clock.now(), new);
        self.fruits.insert(id, fruit.clone());
        Ok(fruit)
    }

    pub fn update(&mut self, id: &str, update: &FruitUpdate) -> AppResult<Fruit> {
        let fruit = self.fruits.get_mut(id).ok_or_else(|| not_found(id))?;
        fruit.apply(update);
        Ok(fruit.clone())
    }

    pub fn soft_delete(&mut self, id: &str) -> AppResult<()> {
        let fruit = self.fruits.get_mut(id).ok_or_else(|| not_found(id))?;
        fruit.available = false;
        Ok(())
    }

    fn fresh_id(&self) -> AppResult<String> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.next_id();
            if !self.fruits.contains_key(&id) {
                return Ok(id);
            }
        }
        Err(AppError::Internal(anyhow!(
            "id generator produced {} colliding ids in a row",
            MAX_ID_ATTEMPTS
        )))
    }
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Fruit {} not found", id))
}
