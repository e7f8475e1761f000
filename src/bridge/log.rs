// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::borrow::Cow;

use crate::Level;
use crate::default_logging;

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warn,
            log::Level::Info => Level::Info,
            log::Level::Debug => Level::Debug,
            log::Level::Trace => Level::Trace,
        }
    }
}

struct LogCrateLogger(());

impl log::Log for LogCrateLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        let Some(logging) = default_logging() else {
            return false;
        };

        let delegate = logging.manager().delegate(metadata.target());
        delegate.is_enabled(metadata.level().into())
    }

    fn log(&self, record: &log::Record) {
        let Some(logging) = default_logging() else {
            return;
        };

        let level = Level::from(record.level());
        let delegate = logging.manager().delegate(record.target());
        if !delegate.is_enabled(level) {
            return;
        }

        // The message is already formatted; it is not a template.
        let text = match record.args().as_str() {
            Some(text) => Cow::Borrowed(text),
            None => Cow::Owned(record.args().to_string()),
        };
        delegate.log(level, &text);
    }

    fn flush(&self) {
        if let Some(logging) = default_logging() {
            logging.flush();
        }
    }
}

/// Set up the log crate global logger.
///
/// This function calls [`log::set_logger`] to set up a `LogCrateLogger` and all logs from the log
/// crate will be forwarded to the default [`Logging`](crate::Logging): the record target names
/// the channel, and the backend's level gate applies.
///
/// Log events that occur before [`set_default_logging`](crate::set_default_logging) is called
/// will be ignored.
///
/// This function will set the global maximum log level to `Trace`. To override this, call
/// [`log::set_max_level`] after this function.
///
/// # Errors
///
/// Return an error if the log crate global logger has already been set.
///
/// # Examples
///
/// ```
/// logtide::bridge::try_setup_log_crate().unwrap();
/// log::info!("forwarded once a default logging facade is set");
/// ```
pub fn try_setup_log_crate() -> Result<(), log::SetLoggerError> {
    static LOGGER: LogCrateLogger = LogCrateLogger(());
    log::set_logger(&LOGGER)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Set up the log crate global logger.
///
/// See [`try_setup_log_crate`].
///
/// # Panics
///
/// Panic if the log crate global logger has already been set.
pub fn setup_log_crate() {
    try_setup_log_crate().expect(
        "logtide::bridge::setup_log_crate must be called before the log crate global logger initialized",
    )
}
