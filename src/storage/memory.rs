//! In-memory store

use rustc_hash::FxHashMap;

use super::{CartStore, StoreError, validate_key};

/// Records held in process memory; nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    records: FxHashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with an existing record.
    pub fn with_record(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut records = FxHashMap::default();
        records.insert(key.into(), value.into());

        Self { records }
    }

    /// Borrow the raw record stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.records.get(key).map(String::as_str)
    }

    /// Whether a record is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }
}

impl CartStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        validate_key(key)?;

        Ok(self.records.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        validate_key(key)?;

        self.records.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        validate_key(key)?;

        self.records.remove(key);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn write_then_read() -> TestResult {
        let mut store = MemoryStore::new();

        store.write("cart", "[]")?;

        assert_eq!(store.read("cart")?, Some("[]".to_string()));

        Ok(())
    }

    #[test]
    fn read_missing_is_none() -> TestResult {
        assert_eq!(MemoryStore::new().read("cart")?, None);

        Ok(())
    }

    #[test]
    fn remove_missing_succeeds() -> TestResult {
        let mut store = MemoryStore::with_record("other", "x");

        store.remove("cart")?;

        assert!(store.contains("other"));

        Ok(())
    }

    #[test]
    fn invalid_key_errors() {
        let mut store = MemoryStore::new();

        assert!(matches!(
            store.write("../cart", "[]"),
            Err(StoreError::InvalidKey(_))
        ));
    }
}
