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

use std::path::PathBuf;

use snafu::{Location, Snafu};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("{}", source))]
    Unknown {
        #[snafu(implicit)]
        location: Location,
        source:   Box<dyn std::error::Error + Send + Sync>,
    },

    #[snafu(display("Unsupported store dsn: {:?}, {:?}", dsn, location))]
    UnsupportedStoreDSN {
        #[snafu(implicit)]
        location: Location,
        dsn:      String,
    },

    #[snafu(display("IO error on {}: {}", path.display(), source))]
    Io {
        #[snafu(implicit)]
        location: Location,
        path:     PathBuf,
        source:   std::io::Error,
    },

    #[snafu(display("Corrupted store file {}: {}", path.display(), source))]
    Corruption {
        #[snafu(implicit)]
        location: Location,
        path:     PathBuf,
        source:   serde_json::Error,
    },

    #[snafu(display("Value of {:?} is not valid utf-8", key))]
    InvalidValue {
        #[snafu(implicit)]
        location: Location,
        key:      String,
    },

    #[cfg(feature = "kv-rocksdb")]
    RocksdbError {
        #[snafu(implicit)]
        location: Location,
        source:   rocksdb::Error,
    },
}
