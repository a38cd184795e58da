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

/// Every persisted assignment lives under this prefix, followed by the
/// request category name.
pub const FILTER_KEY_PREFIX: &str = "filterManagerService.filter.";

/// Event type pattern attached to every filter by default.
pub const DEFAULT_EVENT_TYPES: &str = "m.*";

pub const SYFILTER_DEBUG_STORE_ADDR: &str = "file://:/tmp/syfilter.store.json";
pub const SYFILTER_DEBUG_HOMESERVER: &str = "http://localhost:8008";

// The client-server API revision filters are uploaded to.
pub const MATRIX_CLIENT_PREFIX: &str = "/_matrix/client/v2_alpha";

/// Environment variable overriding the log filter directive.
pub const SYFILTER_LOG_ENV: &str = "SYFILTER_LOG";

pub fn filter_key(category_name: &str) -> String {
    format!("{}{}", FILTER_KEY_PREFIX, category_name)
}

pub type FilterId = String;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaced_key() {
        assert_eq!(filter_key("sync"), "filterManagerService.filter.sync");
        assert!(filter_key("scrollback").starts_with(FILTER_KEY_PREFIX));
    }
}
