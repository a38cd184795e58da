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

use snafu::{ResultExt, Whatever};
use syfilter_common::SYFILTER_LOG_ENV;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration for syfilter logging
#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// The default filter directive (in the sense of
    /// [tracing_subscriber::filter::EnvFilter]) to use for logs. Will be
    /// overridden by the `SYFILTER_LOG` environment variable if set.
    pub level:       String,
    /// Print the module path of each event.
    pub with_target: bool,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level:       DEFAULT_LOG_LEVEL.to_string(),
            with_target: false,
        }
    }
}

impl LoggingOptions {
    pub fn init_tracing_subscriber(self) -> Result<(), Whatever> {
        let env_filter = create_env_filter(&self.level);
        // Don't install anything if we'll never emit any logs
        if env_filter.max_level_hint() == Some(LevelFilter::OFF) {
            return Ok(());
        }

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_ansi(supports_color::on(supports_color::Stream::Stderr).is_some())
            .with_target(self.with_target)
            .with_writer(std::io::stderr)
            .with_filter(env_filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .whatever_context("failed to install tracing subscriber")?;

        std::panic::set_hook(Box::new(tracing_panic_hook));
        Ok(())
    }
}

/// Create the filter from the SYFILTER_LOG environment variable or the given
/// directive if that variable is unset.
fn create_env_filter(filter: &str) -> EnvFilter {
    EnvFilter::try_from_env(SYFILTER_LOG_ENV).unwrap_or_else(|_| EnvFilter::new(filter))
}

/// Named symbol for our panic hook, which logs the panic.
fn tracing_panic_hook(info: &std::panic::PanicHookInfo) {
    let location = info.location();

    let msg = match info.payload().downcast_ref::<&'static str>() {
        Some(s) => *s,
        None => match info.payload().downcast_ref::<String>() {
            Some(s) => &s[..],
            None => "Box<dyn Any>",
        },
    };

    let thread = std::thread::current();
    let thread = thread.name().unwrap_or("<unnamed>");
    let backtrace = std::backtrace::Backtrace::capture();

    let _entered = if let Some(location) = location {
        tracing::error_span!("panic", %thread, location = %PrettyLocation(location))
    } else {
        tracing::error_span!("panic", %thread)
    }
    .entered();

    if backtrace.status() == std::backtrace::BacktraceStatus::Captured {
        tracing::error!("{msg}\n\nStack backtrace:\n{backtrace}");
    } else {
        tracing::error!("{msg}");
    }
}

struct PrettyLocation<'a, 'b>(&'a std::panic::Location<'b>);

impl std::fmt::Display for PrettyLocation<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.0.file(), self.0.line(), self.0.column())
    }
}
