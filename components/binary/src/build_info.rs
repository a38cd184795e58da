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

mod built {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

use const_format::concatcp;
use syfilter_common::MATRIX_CLIENT_PREFIX;

pub const AUTHOR: &str = built::PKG_AUTHORS;

const COMMIT: &str = match built::GIT_COMMIT_HASH_SHORT {
    Some(hash) => hash,
    None => "",
};

const DIRTY: &str = match built::GIT_DIRTY {
    Some(true) => "-dirty",
    _ => "",
};

/// Cargo version. Builds without `SYFILTER_RELEASE` set carry the commit
/// they were built from, like `0.1.0+3f2a9c1-dirty`.
pub const VERSION: &str = if option_env!("SYFILTER_RELEASE").is_some() || COMMIT.is_empty() {
    built::PKG_VERSION
} else {
    concatcp!(built::PKG_VERSION, "+", COMMIT, DIRTY)
};

/// Shown by `--version`: adds the build target and the client API the
/// filters are uploaded to.
pub const LONG_VERSION: &str = concatcp!(
    VERSION,
    "\ntarget: ",
    built::TARGET,
    " (",
    built::PROFILE,
    ")\nrustc: ",
    built::RUSTC_VERSION,
    "\nclient api: ",
    MATRIX_CLIENT_PREFIX,
);
