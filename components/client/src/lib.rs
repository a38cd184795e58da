pub mod err;
pub mod filter;
pub mod http;
pub mod service;

pub use err::{Error, Result};
pub use filter::{Filter, FilterBuilder, FilterDefinition};
pub use http::HttpFilterService;
pub use service::{FilterService, FilterServiceRef};
