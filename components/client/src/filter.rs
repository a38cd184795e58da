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

use serde::{Deserialize, Serialize};
use syfilter_common::FilterId;

/// The body uploaded to the homeserver. Fields left as `None` are omitted so
/// the server applies its own defaults.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types:       Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_types:   Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub senders:     Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_senders: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit:       Option<u32>,
}

/// A filter the server accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub id:         FilterId,
    pub definition: FilterDefinition,
}

#[derive(Debug, Default, Clone)]
pub struct FilterBuilder {
    definition: FilterDefinition,
}

fn push(list: &mut Option<Vec<String>>, v: &str) {
    let list = list.get_or_insert_with(Vec::new);
    if !list.iter().any(|x| x == v) {
        list.push(v.to_string());
    }
}

impl FilterBuilder {
    /// Only keep events whose type matches `pattern`. A trailing `*` matches
    /// any suffix, e.g. `m.*`.
    pub fn include_types(&mut self, pattern: &str) -> &mut Self {
        push(&mut self.definition.types, pattern);
        self
    }

    pub fn exclude_types(&mut self, pattern: &str) -> &mut Self {
        push(&mut self.definition.not_types, pattern);
        self
    }

    pub fn include_senders(&mut self, user_id: &str) -> &mut Self {
        push(&mut self.definition.senders, user_id);
        self
    }

    pub fn exclude_senders(&mut self, user_id: &str) -> &mut Self {
        push(&mut self.definition.not_senders, user_id);
        self
    }

    pub fn limit(&mut self, limit: u32) -> &mut Self {
        self.definition.limit = Some(limit);
        self
    }

    pub fn build(&self) -> FilterDefinition { self.definition.clone() }
}
