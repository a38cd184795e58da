use dashmap::DashMap;

use crate::{err::Result, store::Store};

/// Process local store, lost on restart. Used for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: DashMap<String, String>,
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.map.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, val: &str) -> Result<()> {
        self.map.insert(key.to_string(), val.to_string());
        Ok(())
    }

    fn del(&self, key: &str) -> Result<()> {
        self.map.remove(key);
        Ok(())
    }

    fn list(&self, prefix: &str) -> Result<Vec<(String, String)>> {
        let mut kvs = self
            .map
            .iter()
            .filter(|e| e.key().starts_with(prefix))
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect::<Vec<_>>();
        kvs.sort();
        Ok(kvs)
    }
}
