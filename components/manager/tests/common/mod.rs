#![allow(dead_code)]

use std::{
    io,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use futures::{future::BoxFuture, FutureExt};
use snafu::IntoError;
use syfilter_client::{Error as ClientError, Filter, FilterDefinition, FilterService};
use syfilter_kv::{err::UnknownSnafu, memory::MemoryStore, Store};
use tokio::sync::oneshot;

/// Answers creation requests immediately with `f1`, `f2`, ... in submission
/// order.
#[derive(Default)]
pub struct CountingService {
    submitted: Mutex<Vec<FilterDefinition>>,
    next:      AtomicUsize,
}

impl CountingService {
    pub fn submitted(&self) -> Vec<FilterDefinition> { self.submitted.lock().unwrap().clone() }
}

impl FilterService for CountingService {
    fn create(&self, definition: FilterDefinition) -> BoxFuture<'static, syfilter_client::Result<Filter>> {
        self.submitted.lock().unwrap().push(definition.clone());
        let id = format!("f{}", self.next.fetch_add(1, Ordering::SeqCst) + 1);
        async move { Ok::<_, ClientError>(Filter { id, definition }) }.boxed()
    }
}

type Answer = syfilter_client::Result<String>;

/// Holds every creation request until the test answers it.
#[derive(Default)]
pub struct ScriptedService {
    calls: Mutex<Vec<(FilterDefinition, Option<oneshot::Sender<Answer>>)>>,
}

impl ScriptedService {
    pub fn submitted(&self) -> usize { self.calls.lock().unwrap().len() }

    pub fn definition(&self, call: usize) -> FilterDefinition { self.calls.lock().unwrap()[call].0.clone() }

    pub fn succeed(&self, call: usize, id: &str) { self.answer(call, Ok(id.to_string())) }

    pub fn fail(&self, call: usize, reason: &str) { self.answer(call, Err(ClientError::other(reason.to_string()))) }

    fn answer(&self, call: usize, answer: Answer) {
        let tx = self.calls.lock().unwrap()[call]
            .1
            .take()
            .expect("call already answered");
        tx.send(answer).expect("creation task is gone");
    }
}

impl FilterService for ScriptedService {
    fn create(&self, definition: FilterDefinition) -> BoxFuture<'static, syfilter_client::Result<Filter>> {
        let (tx, rx) = oneshot::channel();
        self.calls.lock().unwrap().push((definition.clone(), Some(tx)));
        async move {
            let id = rx
                .await
                .unwrap_or_else(|_| Err(ClientError::other("request abandoned")))?;
            Ok::<_, ClientError>(Filter { id, definition })
        }
        .boxed()
    }
}

/// A memory store whose reads or writes can be switched to failing.
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner:       MemoryStore,
    fail_reads:  AtomicBool,
    fail_writes: AtomicBool,
}

impl FlakyStore {
    pub fn fail_reads(&self, fail: bool) { self.fail_reads.store(fail, Ordering::SeqCst) }

    pub fn fail_writes(&self, fail: bool) { self.fail_writes.store(fail, Ordering::SeqCst) }
}

fn unavailable() -> syfilter_kv::Error {
    UnknownSnafu.into_error(Box::new(io::Error::new(io::ErrorKind::Other, "store unavailable")))
}

impl Store for FlakyStore {
    fn get(&self, key: &str) -> syfilter_kv::Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, val: &str) -> syfilter_kv::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        self.inner.set(key, val)
    }

    fn del(&self, key: &str) -> syfilter_kv::Result<()> { self.inner.del(key) }

    fn list(&self, prefix: &str) -> syfilter_kv::Result<Vec<(String, String)>> { self.inner.list(prefix) }
}

pub fn memory_store() -> Arc<MemoryStore> { Arc::new(MemoryStore::default()) }
