use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use syfilter_common::filter_key;

/// Why a request needs a filter. Every variant gets its own filter and its
/// own persisted record.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RequestCategory {
    /// Long-poll event stream requests.
    Sync,
    /// History backfill requests.
    Scrollback,
}

impl RequestCategory {
    pub fn all() -> impl Iterator<Item = RequestCategory> { Self::iter() }

    /// Key of the persisted assignment, e.g. `filterManagerService.filter.sync`.
    pub fn store_key(&self) -> String { filter_key(self.as_ref()) }
}
