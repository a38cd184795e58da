use clap::Args;
use snafu::{ResultExt, Whatever};
use syfilter_kv::{open_store, StoreRef};
use syfilter_manager::RequestCategory;
use tracing::info;

use super::{LoggingArgs, StoreArgs};

/// Forget stored assignments so the next `generate` creates new filters.
#[derive(Debug, Clone, Args)]
pub struct ResetArgs {
    #[arg(
        long,
        help = "Only forget these categories [default: all]",
        value_name = "CATEGORY"
    )]
    pub category: Vec<RequestCategory>,

    #[command(flatten)]
    pub store: StoreArgs,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

impl ResetArgs {
    pub fn run(&self) -> Result<(), Whatever> {
        self.logging.install()?;
        let store = open_store(&self.store.dsn()).whatever_context("cannot open store")?;
        reset_categories(&store, &self.category)
    }
}

/// Delete the stored ids of `categories`, or of every category when empty.
pub fn reset_categories(store: &StoreRef, categories: &[RequestCategory]) -> Result<(), Whatever> {
    let categories = if categories.is_empty() {
        RequestCategory::all().collect::<Vec<_>>()
    } else {
        categories.to_vec()
    };
    for category in categories {
        store
            .del(&category.store_key())
            .with_whatever_context(|_| format!("cannot forget {}", category))?;
        info!("forgot the filter of {}", category);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use syfilter_kv::memory::MemoryStore;

    use super::*;

    const SYNC_KEY: &str = "filterManagerService.filter.sync";
    const SCROLLBACK_KEY: &str = "filterManagerService.filter.scrollback";

    fn populated() -> StoreRef {
        let store: StoreRef = Arc::new(MemoryStore::default());
        store.set(SYNC_KEY, "f1").unwrap();
        store.set(SCROLLBACK_KEY, "f2").unwrap();
        store
    }

    #[test]
    fn reset_one_category() {
        let store = populated();
        reset_categories(&store, &[RequestCategory::Sync]).unwrap();
        assert_eq!(store.get(SYNC_KEY).unwrap(), None);
        assert_eq!(store.get(SCROLLBACK_KEY).unwrap().as_deref(), Some("f2"));
    }

    #[test]
    fn reset_everything() {
        let store = populated();
        reset_categories(&store, &[]).unwrap();
        assert_eq!(store.get(SYNC_KEY).unwrap(), None);
        assert_eq!(store.get(SCROLLBACK_KEY).unwrap(), None);
        // nothing left to forget is fine
        reset_categories(&store, &[]).unwrap();
    }
}
