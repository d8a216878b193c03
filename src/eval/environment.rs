use crate::eval::{
    error::{Result, RuntimeError},
    object::Object,
};
use std::collections::HashMap;

pub const DEFAULT_CAPACITY: usize = 100;

/// Bounded name → value store. Rebinding an existing name always succeeds;
/// a new name is refused once `capacity` names are bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    store: HashMap<String, Object>,
    capacity: usize,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            store: HashMap::new(),
            capacity,
        }
    }

    pub fn get(&self, entry: &str) -> Option<&Object> {
        self.store.get(entry)
    }

    pub fn set(&mut self, key: &str, val: Object) -> Result<()> {
        if let Some(slot) = self.store.get_mut(key) {
            *slot = val;
            return Ok(());
        }

        if self.store.len() >= self.capacity {
            return Err(RuntimeError::CapacityExceeded {
                name: key.to_string(),
                capacity: self.capacity,
            });
        }

        self.store.insert(key.to_string(), val);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
