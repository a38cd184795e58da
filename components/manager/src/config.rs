use serde::{Deserialize, Serialize};
use syfilter_common::{DEFAULT_EVENT_TYPES, SYFILTER_DEBUG_HOMESERVER, SYFILTER_DEBUG_STORE_ADDR};

#[derive(Debug, Deserialize, Serialize, Clone, Eq, PartialEq)]
#[serde(default)]
pub struct ManagerConfig {
    /// Where assignments are persisted, see [syfilter_kv::open_store].
    pub store_dsn:    String,
    pub homeserver:   String,
    pub user_id:      String,
    pub access_token: String,
    /// Event type patterns every filter includes.
    pub event_types:  Vec<String>,
}

impl ManagerConfig {
    pub fn with_store_dsn(&mut self, dsn: &str) -> &mut Self {
        self.store_dsn = dsn.to_string();
        self
    }

    pub fn with_event_types(&mut self, event_types: Vec<String>) -> &mut Self {
        self.event_types = event_types;
        self
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            store_dsn:    SYFILTER_DEBUG_STORE_ADDR.to_string(),
            homeserver:   SYFILTER_DEBUG_HOMESERVER.to_string(),
            user_id:      String::new(),
            access_token: String::new(),
            event_types:  vec![DEFAULT_EVENT_TYPES.to_string()],
        }
    }
}
