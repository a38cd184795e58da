use std::path::PathBuf;

use clap::Args;
use snafu::{ensure_whatever, ResultExt, Whatever};
use syfilter_manager::{CreationOutcome, ManagerConfig};
use tracing::{info, warn};

use super::{print_assignments, LoggingArgs, StoreArgs};

const ACCOUNT_OPTIONS_HEADER: &str = "Account options";

#[derive(Debug, Clone, Args)]
#[command(flatten_help = true)]
#[command(long_about = r"

Load the stored filter assignments and create a filter on the homeserver
for every request category that has none yet.
Examples:

syfilter generate --homeserver https://matrix.example.org \
    --user-id @alice:example.org --access-token $TOKEN
")]
pub struct GenerateArgs {
    #[arg(
    long,
    help = "Read the manager configuration from a JSON file, flags take precedence",
    value_name = "FILE"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Homeserver base url", help_heading = ACCOUNT_OPTIONS_HEADER)]
    pub homeserver: Option<String>,

    #[arg(long, help = "Fully qualified user id, like @alice:example.org", help_heading = ACCOUNT_OPTIONS_HEADER)]
    pub user_id: Option<String>,

    #[arg(
    long,
    env = "SYFILTER_ACCESS_TOKEN",
    hide_env_values = true,
    help = "Access token of the user",
    help_heading = ACCOUNT_OPTIONS_HEADER
    )]
    pub access_token: Option<String>,

    #[arg(long = "event-type", help = "Event type pattern to include, may repeat [default: m.*]")]
    pub event_types: Vec<String>,

    #[command(flatten)]
    pub store: StoreArgs,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

impl GenerateArgs {
    fn manager_config(&self) -> Result<ManagerConfig, Whatever> {
        let mut config = match &self.config {
            Some(path) => {
                let buf = std::fs::read(path)
                    .with_whatever_context(|_| format!("cannot read {}", path.display()))?;
                serde_json::from_slice(&buf)
                    .with_whatever_context(|_| format!("invalid config {}", path.display()))?
            }
            None => ManagerConfig::default(),
        };
        if let Some(dsn) = &self.store.store_dsn {
            config.with_store_dsn(dsn);
        }
        if let Some(hs) = &self.homeserver {
            config.homeserver = hs.clone();
        }
        if let Some(user_id) = &self.user_id {
            config.user_id = user_id.clone();
        }
        if let Some(token) = &self.access_token {
            config.access_token = token.clone();
        }
        if !self.event_types.is_empty() {
            config.with_event_types(self.event_types.clone());
        }
        ensure_whatever!(!config.user_id.is_empty(), "a user id is required");
        ensure_whatever!(!config.access_token.is_empty(), "an access token is required");
        Ok(config)
    }

    pub fn run(&self) -> Result<(), Whatever> {
        self.logging.install()?;
        let config = self.manager_config()?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .whatever_context("cannot build tokio runtime")?;

        runtime.block_on(async {
            let manager =
                syfilter_manager::open(&config).whatever_context("cannot open filter manager")?;
            let pending = manager
                .generate_filters()
                .whatever_context("cannot load stored filters")?;
            if pending.is_empty() {
                info!("every request category already has a filter");
            }
            let outcomes = pending
                .wait()
                .await
                .whatever_context("creation task crashed")?;
            for (category, outcome) in outcomes {
                match outcome {
                    CreationOutcome::Assigned(id) => info!("created filter {} for {}", id, category),
                    CreationOutcome::Failed(reason) => {
                        warn!("no filter for {} yet: {}", category, reason)
                    }
                }
            }
            print_assignments(|c| manager.get_filter_id_for_request(c));
            Ok::<(), Whatever>(())
        })
    }
}
