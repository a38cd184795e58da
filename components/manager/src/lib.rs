//! Decides which server side filter each category of client request uses,
//! remembers the decision across restarts and creates missing filters.

pub mod category;
pub mod config;
pub mod err;
mod manager;
pub mod policy;

pub use category::RequestCategory;
pub use config::ManagerConfig;
pub use err::{Error, Result};
pub use manager::{open, CreationOutcome, FilterManager, FilterManagerBuilder, PendingCreations};
pub use policy::{FilterPolicy, FilterPolicyRef, UniformPolicy};
