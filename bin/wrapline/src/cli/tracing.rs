// This file is part of Wrapline.
//
// Wrapline is free software: you can redistribute it and/or modify it under the
// terms of the GNU Lesser General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later version.
//
// Wrapline is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with Wrapline.
// If not, see https://www.gnu.org/licenses/.

use std::io;

pub use tracing::*;
use tracing::subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_log::LogTracer;
use tracing_subscriber::{filter::Directive, EnvFilter, FmtSubscriber};

use super::LogsArgs;

const DEFAULT_FILTER: &str = "info";

// transport internals, silenced regardless of RUST_LOG
const SILENCED_TARGETS: &[&str] = &["h2", "hyper", "hyper_util", "reqwest", "rustls"];

/// Install the global subscriber.
///
/// The returned guard flushes buffered lines when dropped and must live until
/// the process exits.
pub fn configure_logging(config: &LogsArgs) -> anyhow::Result<WorkerGuard> {
    let (writer, guard) = match &config.file {
        Some(log_file) => {
            tracing_appender::non_blocking(tracing_appender::rolling::never(".", log_file))
        }
        None => tracing_appender::non_blocking(io::stdout()),
    };

    let builder = FmtSubscriber::builder()
        .with_env_filter(env_filter()?)
        .with_target(false)
        .with_ansi(config.file.is_none())
        .with_writer(writer);
    if config.json {
        subscriber::set_global_default(builder.json().finish())?;
    } else {
        subscriber::set_global_default(builder.compact().finish())?;
    }

    // Redirect logs from external crates using `log` to the tracing subscriber
    LogTracer::init()?;

    Ok(guard)
}

fn env_filter() -> anyhow::Result<EnvFilter> {
    let mut filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    for target in SILENCED_TARGETS {
        filter = filter.add_directive(format!("{target}=off").parse::<Directive>()?);
    }
    Ok(filter)
}
