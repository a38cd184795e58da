pub mod generate;
pub mod reset;
pub mod show;

use clap::Args;
use snafu::Whatever;
use syfilter_common::SYFILTER_DEBUG_STORE_ADDR;
use syfilter_manager::RequestCategory;
use syfilter_utils::logger::{LoggingOptions, DEFAULT_LOG_LEVEL};

const STORE_OPTIONS_HEADER: &str = "Store options";
const LOGGING_OPTIONS_HEADER: &str = "Logging options";

#[derive(Debug, Clone, Args)]
pub struct StoreArgs {
    #[arg(
    long,
    help = "Specify the address of the assignment store, like file://:/path/to/store.json",
    help_heading = STORE_OPTIONS_HEADER,
    value_name = "DSN",
    )]
    pub store_dsn: Option<String>,
}

impl StoreArgs {
    pub fn dsn(&self) -> String {
        self.store_dsn
            .clone()
            .unwrap_or_else(|| SYFILTER_DEBUG_STORE_ADDR.to_string())
    }
}

#[derive(Debug, Clone, Args)]
pub struct LoggingArgs {
    #[clap(
    short,
    long,
    help = "Log level, overridden by SYFILTER_LOG",
    help_heading = LOGGING_OPTIONS_HEADER,
    value_name = "LEVEL",
    default_value = DEFAULT_LOG_LEVEL
    )]
    pub level: String,

    #[clap(
    long,
    help = "Disable all logging. You will still see stdout messages.",
    help_heading = LOGGING_OPTIONS_HEADER,
    conflicts_with = "level"
    )]
    pub no_log: bool,
}

impl LoggingArgs {
    pub fn install(&self) -> Result<(), Whatever> {
        if self.no_log {
            return Ok(());
        }
        LoggingOptions {
            level:       self.level.clone(),
            with_target: false,
        }
        .init_tracing_subscriber()
    }
}

pub fn print_assignments<F>(lookup: F)
where
    F: Fn(RequestCategory) -> Option<String>,
{
    for category in RequestCategory::all() {
        let id = lookup(category).unwrap_or_else(|| "-".to_string());
        println!("{:<12} {}", category, id);
    }
}
