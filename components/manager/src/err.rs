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

use snafu::{Location, Snafu};

#[derive(Snafu, Debug)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("store error: {}", source))]
    StoreError { source: syfilter_kv::Error },

    #[snafu(display("client error: {}", source))]
    ClientError { source: syfilter_client::Error },

    #[snafu(display("cannot start a runtime for creation requests: {}", source))]
    RuntimeUnavailable {
        #[snafu(implicit)]
        location: Location,
        source:   std::io::Error,
    },

    TokioJoinError {
        #[snafu(implicit)]
        location: Location,
        source:   tokio::task::JoinError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<syfilter_kv::Error> for Error {
    fn from(value: syfilter_kv::Error) -> Self { Self::StoreError { source: value } }
}

impl From<syfilter_client::Error> for Error {
    fn from(value: syfilter_client::Error) -> Self { Self::ClientError { source: value } }
}
