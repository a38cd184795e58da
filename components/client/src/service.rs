use std::sync::Arc;

use futures::future::BoxFuture;

use crate::{
    err::Result,
    filter::{Filter, FilterBuilder, FilterDefinition},
};

pub type FilterServiceRef = Arc<dyn FilterService>;

/// Creates filters on the server.
///
/// [FilterService::create] submits the request when it is called and hands
/// back a future resolving once the server answered. Dropping the future
/// abandons the answer, not necessarily the request.
pub trait FilterService: Send + Sync + 'static {
    fn new_filter(&self) -> FilterBuilder { FilterBuilder::default() }

    fn create(&self, definition: FilterDefinition) -> BoxFuture<'static, Result<Filter>>;
}
