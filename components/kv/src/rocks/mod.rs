// Copyright 2024 syfilter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::{
    fmt::{Debug, Formatter},
    path::{Path, PathBuf},
};

use rocksdb::{LogLevel, Options, DB};
use snafu::{OptionExt, ResultExt};

use crate::{
    err::{InvalidValueSnafu, Result, RocksdbSnafu},
    store::Store,
};

pub const DEFAULT_DB_PATH: &str = "/tmp/syfilter.store.db";

pub struct Builder {
    path: PathBuf,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_PATH),
        }
    }
}

impl Builder {
    pub fn with_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.path = path.as_ref().to_path_buf();
        self
    }

    pub fn build(self) -> Result<RocksdbStore> {
        let mut opts = Options::default();
        opts.set_log_level(LogLevel::Error);
        opts.create_if_missing(true);
        opts.increase_parallelism(syfilter_utils::num_cpus() as i32);
        let db = DB::open(&opts, &self.path).context(RocksdbSnafu)?;
        Ok(RocksdbStore { db })
    }
}

pub struct RocksdbStore {
    db: DB,
}

impl Debug for RocksdbStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut ds = f.debug_struct("RocksdbStore");
        ds.field("path", &self.db.path());
        ds.finish()
    }
}

fn decode(key: &[u8], val: Vec<u8>) -> Result<String> {
    String::from_utf8(val).ok().context(InvalidValueSnafu {
        key: String::from_utf8_lossy(key).to_string(),
    })
}

impl Store for RocksdbStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.db
            .get(key)
            .context(RocksdbSnafu)?
            .map(|v| decode(key.as_bytes(), v))
            .transpose()
    }

    fn set(&self, key: &str, val: &str) -> Result<()> {
        self.db.put(key, val).context(RocksdbSnafu)?;
        // an assignment must survive a crash right after it is acknowledged
        self.db.flush_wal(true).context(RocksdbSnafu)
    }

    fn del(&self, key: &str) -> Result<()> { self.db.delete(key).context(RocksdbSnafu) }

    fn list(&self, prefix: &str) -> Result<Vec<(String, String)>> {
        let mut kvs = Vec::new();
        for r in self.db.prefix_iterator(prefix) {
            let (k, v) = r.context(RocksdbSnafu)?;
            if !k.starts_with(prefix.as_bytes()) {
                break;
            }
            let key = decode(&k, k.to_vec())?;
            let val = decode(&k, v.to_vec())?;
            kvs.push((key, val));
        }
        Ok(kvs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = Builder::default()
            .with_path(temp_dir.path())
            .build()
            .unwrap();
        assert_eq!(store.get("hello").unwrap(), None);
        store.set("hello", "world").unwrap();
        store.set("help", "me").unwrap();
        store.set("other", "x").unwrap();
        assert_eq!(store.get("hello").unwrap(), Some("world".to_string()));
        assert_eq!(store.list("hel").unwrap().len(), 2);
        store.del("hello").unwrap();
        assert_eq!(store.get("hello").unwrap(), None);
    }
}
