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

use snafu::{IntoError, Location, Snafu};

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

    #[snafu(display("Invalid homeserver url {:?}: {}", url, reason))]
    InvalidHomeserver {
        #[snafu(implicit)]
        location: Location,
        url:      String,
        reason:   String,
    },

    #[snafu(display("Transport error: {}, {:?}", source, location))]
    Transport {
        #[snafu(implicit)]
        location: Location,
        source:   reqwest::Error,
    },

    #[snafu(display("Server rejected the filter with status {}: {}", status, body))]
    ServerRejected {
        #[snafu(implicit)]
        location: Location,
        status:   u16,
        body:     String,
    },
}

impl Error {
    /// Build an error out of anything, mostly for services living outside of
    /// this crate.
    #[track_caller]
    pub fn other<E>(e: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        UnknownSnafu.into_error(e.into())
    }
}
