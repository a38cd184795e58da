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

use once_cell::sync::OnceCell;
use tokio::runtime::{Handle, Runtime};
use tracing::debug;

// Creation requests are few and mostly wait on the network.
static BACKGROUND_RUNTIME: OnceCell<Runtime> = OnceCell::new();

fn background_runtime() -> std::io::Result<&'static Runtime> {
    BACKGROUND_RUNTIME.get_or_try_init(|| {
        debug!("start background tokio runtime");
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(crate::num_cpus().clamp(1, 2))
            .thread_name("syfilter-bg")
            .enable_all()
            .build()
    })
}

/// Returns the handle of the runtime the caller is already inside, or the
/// shared background runtime when called from plain synchronous code.
///
/// Fails only when the background runtime has to be started and cannot be.
pub fn handle() -> std::io::Result<Handle> {
    match Handle::try_current() {
        Ok(current) => Ok(current),
        Err(_) => Ok(background_runtime()?.handle().clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_outside_runtime() {
        let h = handle().unwrap();
        let v = h.block_on(h.spawn(async { 40 + 2 })).unwrap();
        assert_eq!(v, 42);
        // later calls reuse the same runtime
        let again = handle().unwrap();
        assert_eq!(again.block_on(async { 1 }), 1);
        assert!(BACKGROUND_RUNTIME.get().is_some());
    }

    #[tokio::test]
    async fn current_inside_runtime() {
        let v = handle().unwrap().spawn(async { 7 }).await.unwrap();
        assert_eq!(v, 7);
    }
}
