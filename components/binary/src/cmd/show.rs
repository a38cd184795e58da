use std::collections::BTreeMap;

use clap::Args;
use snafu::{ResultExt, Whatever};
use syfilter_kv::{open_store, StoreRef};
use syfilter_manager::RequestCategory;

use super::{print_assignments, LoggingArgs, StoreArgs};

/// Print the stored assignments without contacting the homeserver.
#[derive(Debug, Clone, Args)]
pub struct ShowArgs {
    #[arg(long, help = "Print as a JSON object")]
    pub json: bool,

    #[command(flatten)]
    pub store: StoreArgs,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

impl ShowArgs {
    pub fn run(&self) -> Result<(), Whatever> {
        self.logging.install()?;
        let store = open_store(&self.store.dsn()).whatever_context("cannot open store")?;
        let stored = stored_assignments(&store)?;

        if self.json {
            println!("{}", render_json(&stored)?);
        } else {
            print_assignments(|c| stored.get(&c).cloned());
        }
        Ok(())
    }
}

/// Every category that has an id in `store`. Empty ids are left out, the
/// manager would not use them either.
pub fn stored_assignments(store: &StoreRef) -> Result<BTreeMap<RequestCategory, String>, Whatever> {
    let mut stored = BTreeMap::new();
    for category in RequestCategory::all() {
        let id = store
            .get(&category.store_key())
            .with_whatever_context(|_| format!("cannot read assignment of {}", category))?;
        if let Some(id) = id.filter(|id| !id.is_empty()) {
            stored.insert(category, id);
        }
    }
    Ok(stored)
}

fn render_json(stored: &BTreeMap<RequestCategory, String>) -> Result<String, Whatever> {
    serde_json::to_string_pretty(stored).whatever_context("cannot encode")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use syfilter_kv::memory::MemoryStore;

    use super::*;

    #[test]
    fn json_uses_category_names() {
        let store: StoreRef = Arc::new(MemoryStore::default());
        store.set("filterManagerService.filter.sync", "f1").unwrap();
        store.set("filterManagerService.filter.scrollback", "f2").unwrap();

        let stored = stored_assignments(&store).unwrap();
        let value: serde_json::Value = serde_json::from_str(&render_json(&stored).unwrap()).unwrap();
        assert_eq!(value, serde_json::json!({"sync": "f1", "scrollback": "f2"}));
    }

    #[test]
    fn unassigned_categories_are_left_out() {
        let store: StoreRef = Arc::new(MemoryStore::default());
        store.set("filterManagerService.filter.sync", "").unwrap();
        store.set("filterManagerService.filter.scrollback", "f2").unwrap();

        let stored = stored_assignments(&store).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored.get(&RequestCategory::Scrollback).map(String::as_str), Some("f2"));
        assert_eq!(render_json(&BTreeMap::new()).unwrap(), "{}");
    }
}
