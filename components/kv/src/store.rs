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

use std::{fmt::Debug, str::FromStr, sync::Arc};

use snafu::{ensure, OptionExt};
use strum_macros::EnumString;
use tracing::debug;

use crate::{
    err::{Result, UnsupportedStoreDSNSnafu},
    file::FileStore,
    memory::MemoryStore,
};

pub type StoreRef = Arc<dyn Store>;

/// A string keyed store. Keys within a single store are independent, there
/// is no transaction spanning several of them.
pub trait Store: Debug + Send + Sync + 'static {
    /// Get the value stored under `key`, `None` if it was never set.
    fn get(&self, key: &str) -> Result<Option<String>>;
    /// Set `key` to `val`, replacing any previous value.
    fn set(&self, key: &str, val: &str) -> Result<()>;
    /// Delete `key`. Deleting a missing key is not an error.
    fn del(&self, key: &str) -> Result<()>;
    /// List all key-value pairs whose key starts with `prefix`, ordered by
    /// key.
    fn list(&self, prefix: &str) -> Result<Vec<(String, String)>>;
}

#[derive(Debug, EnumString)]
enum StoreKinds {
    #[strum(serialize = "memory", serialize = "mem")]
    Memory,
    #[strum(serialize = "file", serialize = "json")]
    File,
    #[cfg(feature = "kv-rocksdb")]
    #[strum(serialize = "rocksdb", serialize = "Rocksdb")]
    Rocksdb,
}

impl StoreKinds {
    fn build(&self, dsn: &str, path: &str) -> Result<StoreRef> {
        match self {
            StoreKinds::Memory => Ok(Arc::new(MemoryStore::default())),
            StoreKinds::File => {
                ensure!(!path.is_empty(), UnsupportedStoreDSNSnafu { dsn });
                debug!("store [file] is built with path: {}", path);
                Ok(Arc::new(FileStore::open(path)?))
            }
            #[cfg(feature = "kv-rocksdb")]
            StoreKinds::Rocksdb => {
                ensure!(!path.is_empty(), UnsupportedStoreDSNSnafu { dsn });
                let store = crate::rocks::Builder::default().with_path(path).build()?;
                debug!("store [rocksdb] is built with path: {}", path);
                Ok(Arc::new(store))
            }
        }
    }
}

/// Open a store from a dsn shaped like `scheme://:path`, e.g.
/// `file://:/tmp/syfilter.store.json` or `memory://:`.
pub fn open_store(dsn: &str) -> Result<StoreRef> {
    let x = dsn.splitn(2, "://:").collect::<Vec<_>>();
    ensure!(x.len() == 2, UnsupportedStoreDSNSnafu { dsn });
    let kind = StoreKinds::from_str(x[0])
        .ok()
        .context(UnsupportedStoreDSNSnafu { dsn })?;
    kind.build(dsn, x[1])
}
