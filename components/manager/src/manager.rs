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

use std::{
    fmt::{Display, Formatter},
    sync::{Arc, Mutex},
};

use dashmap::DashMap;
use snafu::ResultExt;
use syfilter_client::{FilterServiceRef, HttpFilterService};
use syfilter_common::FilterId;
use syfilter_kv::{open_store, StoreRef};
use tokio::{runtime::Handle, task::JoinHandle};
use tracing::{debug, error, info};

use crate::{
    category::RequestCategory,
    config::ManagerConfig,
    err::{Result, RuntimeUnavailableSnafu, TokioJoinSnafu},
    policy::{FilterPolicyRef, UniformPolicy},
};

/// Build a manager talking to the configured homeserver and persisting into
/// the configured store.
pub fn open(config: &ManagerConfig) -> Result<FilterManager> {
    let store = open_store(&config.store_dsn)?;
    let service = HttpFilterService::new(&config.homeserver, &config.user_id, &config.access_token)?;
    let manager = FilterManager::builder(store, Arc::new(service))
        .with_policy(Arc::new(UniformPolicy::new(config.event_types.clone())))
        .build()?;
    debug!("open filter manager: {}", manager);
    Ok(manager)
}

/// What became of one creation request.
///
/// An answer without a filter id counts as `Failed`; nothing is saved for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreationOutcome {
    Assigned(FilterId),
    Failed(String),
}

/// Creation requests submitted by one [FilterManager::generate_filters] call.
///
/// Dropping it leaves the requests running; their results are still applied
/// to the manager.
#[derive(Debug, Default)]
pub struct PendingCreations {
    tasks: Vec<(RequestCategory, JoinHandle<CreationOutcome>)>,
}

impl PendingCreations {
    pub fn categories(&self) -> Vec<RequestCategory> { self.tasks.iter().map(|(c, _)| *c).collect() }

    pub fn is_empty(&self) -> bool { self.tasks.is_empty() }

    pub fn len(&self) -> usize { self.tasks.len() }

    /// Wait until every request of this round has been answered and applied.
    pub async fn wait(self) -> Result<Vec<(RequestCategory, CreationOutcome)>> {
        let mut outcomes = Vec::with_capacity(self.tasks.len());
        for (category, task) in self.tasks {
            outcomes.push((category, task.await.context(TokioJoinSnafu)?));
        }
        Ok(outcomes)
    }
}

pub struct FilterManagerBuilder {
    store:   StoreRef,
    service: FilterServiceRef,
    policy:  FilterPolicyRef,
    runtime: Option<Handle>,
}

impl FilterManagerBuilder {
    pub fn with_policy(mut self, policy: FilterPolicyRef) -> Self {
        self.policy = policy;
        self
    }

    /// Runtime the creation requests run on. Defaults to the current runtime,
    /// or a shared background one outside of any runtime.
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn build(self) -> Result<FilterManager> {
        let runtime = match self.runtime {
            Some(runtime) => runtime,
            None => syfilter_utils::runtime::handle().context(RuntimeUnavailableSnafu)?,
        };
        Ok(FilterManager {
            inner: Arc::new(Inner {
                filters:     DashMap::new(),
                store:       self.store,
                service:     self.service,
                policy:      self.policy,
                runtime,
                write_guard: Mutex::new(()),
            }),
        })
    }
}

/// Keeps track of which filter each [RequestCategory] uses.
///
/// One manager exists per client session; clones share the same state.
#[derive(Clone)]
pub struct FilterManager {
    inner: Arc<Inner>,
}

struct Inner {
    // category -> the filter currently in use
    filters:     DashMap<RequestCategory, FilterId>,
    store:       StoreRef,
    service:     FilterServiceRef,
    policy:      FilterPolicyRef,
    runtime:     Handle,
    // serializes reloads and saves so memory never runs ahead of the store
    write_guard: Mutex<()>,
}

impl Display for FilterManager {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FilterManager: {:?}, {} assigned",
            self.inner.store,
            self.inner.filters.len()
        )
    }
}

impl Inner {
    fn load_stored_filters(&self) -> Result<()> {
        let _guard = self.write_guard.lock().unwrap_or_else(|e| e.into_inner());
        let mut loaded = Vec::new();
        for category in RequestCategory::all() {
            let id = self.store.get(&category.store_key())?;
            loaded.push((category, id));
        }
        // every read succeeded, now replace what we had
        for (category, id) in loaded {
            match id {
                Some(id) if !id.is_empty() => {
                    self.filters.insert(category, id);
                }
                _ => {
                    self.filters.remove(&category);
                }
            }
        }
        Ok(())
    }

    fn save_filter(&self, category: RequestCategory, filter_id: FilterId) -> Result<()> {
        let _guard = self.write_guard.lock().unwrap_or_else(|e| e.into_inner());
        self.store.set(&category.store_key(), &filter_id)?;
        self.filters.insert(category, filter_id);
        Ok(())
    }

    fn apply_creation(
        &self,
        category: RequestCategory,
        created: syfilter_client::Result<syfilter_client::Filter>,
    ) -> CreationOutcome {
        let filter = match created {
            Ok(filter) => filter,
            Err(e) => {
                error!("unable to create filter for {}: {}", category, e);
                return CreationOutcome::Failed(e.to_string());
            }
        };
        // an empty id would be read back as unassigned
        if filter.id.is_empty() {
            error!("homeserver returned an empty filter id for {}", category);
            return CreationOutcome::Failed("empty filter id".to_string());
        }
        match self.save_filter(category, filter.id.clone()) {
            Ok(()) => {
                info!("filter {} assigned to {} requests", filter.id, category);
                CreationOutcome::Assigned(filter.id)
            }
            Err(e) => {
                error!("unable to save filter {} for {}: {}", filter.id, category, e);
                CreationOutcome::Failed(e.to_string())
            }
        }
    }
}

impl FilterManager {
    pub fn builder(store: StoreRef, service: FilterServiceRef) -> FilterManagerBuilder {
        FilterManagerBuilder {
            store,
            service,
            policy: Arc::new(UniformPolicy::default()),
            runtime: None,
        }
    }

    /// Reload every assignment from the store and submit a creation request
    /// for each category that has none.
    ///
    /// Returns once the requests are submitted. Calling it again before they
    /// complete submits them again; whichever answer is applied last wins.
    pub fn generate_filters(&self) -> Result<PendingCreations> {
        self.inner.load_stored_filters()?;

        let mut pending = PendingCreations::default();
        for category in RequestCategory::all() {
            if !self.inner.filters.contains_key(&category) {
                let task = self.create_filter(category);
                pending.tasks.push((category, task));
            }
        }
        debug!(
            "filters loaded, {} creation requests submitted",
            pending.len()
        );
        Ok(pending)
    }

    /// The filter currently used by `category` requests, `None` if it was
    /// never created or its creation has not completed (or failed).
    pub fn get_filter_id_for_request(&self, category: RequestCategory) -> Option<FilterId> {
        self.inner.filters.get(&category).map(|id| id.value().clone())
    }

    /// Snapshot of the current assignments, ordered by category.
    pub fn assignments(&self) -> Vec<(RequestCategory, FilterId)> {
        RequestCategory::all()
            .filter_map(|c| self.get_filter_id_for_request(c).map(|id| (c, id)))
            .collect()
    }

    fn create_filter(&self, category: RequestCategory) -> JoinHandle<CreationOutcome> {
        debug!("create filter for {}", category);
        let mut builder = self.inner.service.new_filter();
        self.inner.policy.apply(category, &mut builder);
        let created = self.inner.service.create(builder.build());

        let inner = self.inner.clone();
        self.inner
            .runtime
            .spawn(async move { inner.apply_creation(category, created.await) })
    }
}
