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
    collections::BTreeMap,
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    sync::Mutex,
};

use snafu::ResultExt;
use tracing::{debug, trace};

use crate::{
    err::{CorruptionSnafu, IoSnafu, Result},
    store::Store,
};

/// A store kept as a single JSON object on disk.
///
/// The whole object is rewritten on every mutation: the new content goes to
/// a sibling temporary file which is synced and then renamed over the old
/// one, so a crash leaves either the old or the new content behind.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    map:  Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let map = match fs::read(&path) {
            Ok(buf) if buf.is_empty() => BTreeMap::new(),
            Ok(buf) => serde_json::from_slice(&buf).context(CorruptionSnafu { path: &path })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("store file {} does not exist yet", path.display());
                BTreeMap::new()
            }
            Err(e) => return Err(e).context(IoSnafu { path: &path }),
        };
        Ok(Self {
            path,
            map: Mutex::new(map),
        })
    }

    fn persist(&self, map: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).context(IoSnafu { path: parent })?;
            }
        }
        let buf = serde_json::to_vec_pretty(map).context(CorruptionSnafu { path: &self.path })?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        let mut f = fs::File::create(&tmp).context(IoSnafu { path: &tmp })?;
        f.write_all(&buf).context(IoSnafu { path: &tmp })?;
        f.sync_all().context(IoSnafu { path: &tmp })?;
        fs::rename(&tmp, &self.path).context(IoSnafu { path: &self.path })?;
        trace!("persisted {} keys to {}", map.len(), self.path.display());
        Ok(())
    }

    fn mutate<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut guard = self.map.lock().unwrap_or_else(|e| e.into_inner());
        let mut next = guard.clone();
        f(&mut next);
        self.persist(&next)?;
        *guard = next;
        Ok(())
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let guard = self.map.lock().unwrap_or_else(|e| e.into_inner());
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, val: &str) -> Result<()> {
        self.mutate(|m| {
            m.insert(key.to_string(), val.to_string());
        })
    }

    fn del(&self, key: &str) -> Result<()> {
        if self.get(key)?.is_none() {
            return Ok(());
        }
        self.mutate(|m| {
            m.remove(key);
        })
    }

    fn list(&self, prefix: &str) -> Result<Vec<(String, String)>> {
        let guard = self.map.lock().unwrap_or_else(|e| e.into_inner());
        Ok(guard
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::err::Error;

    #[test]
    fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");
        {
            let store = FileStore::open(&path).unwrap();
            store.set("filter.sync", "abc").unwrap();
            store.set("filter.scrollback", "def").unwrap();
            store.del("filter.scrollback").unwrap();
        }
        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("filter.sync").unwrap(), Some("abc".to_string()));
        assert_eq!(store.get("filter.scrollback").unwrap(), None);
        assert_eq!(store.list("filter.").unwrap().len(), 1);
    }

    #[test]
    fn corrupted_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, b"{not json").unwrap();
        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, Error::Corruption { .. }));
    }

    #[test]
    fn failed_write_keeps_memory() {
        let dir = tempfile::tempdir().unwrap();
        // a directory in place of the file makes the rename fail
        let path = dir.path().join("store.json");
        fs::create_dir_all(path.join("blocker")).unwrap();
        let store = FileStore {
            path: path.clone(),
            map:  Mutex::new(BTreeMap::new()),
        };
        assert!(store.set("k", "v").is_err());
        assert_eq!(store.get("k").unwrap(), None);
    }
}
