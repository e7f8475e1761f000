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

//! The reference backend: a level gate in front of a synchronous console and an asynchronous,
//! day-rotated log file.
//!
//! Each enabled event is printed to the console on the calling thread and queued for the file
//! worker. File lines have the form
//! `<sequence as 16 hex digits>::<LEVEL>::<yyyy-MM-dd HH:mm:ss.SSS>::<channel>::<text>`.
//!
//! # Examples
//!
//! ```
//! use logtide::Level;
//! use logtide::Logging;
//! use logtide::Value;
//! use logtide::simple::SimpleConfig;
//! use logtide::simple::SimpleLoggerManager;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let config = SimpleConfig::new()
//!     .level(Level::Debug)
//!     .output_directory(dir.path())
//!     .file_prefix("doc");
//!
//! let logging = Logging::new(SimpleLoggerManager::new(config).unwrap());
//! logging.logger("app").debug("started in {} ms", &[Value::from(12)]);
//! logging.shutdown();
//! ```

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;

use arc_swap::ArcSwap;
use arc_swap::ArcSwapOption;
use jiff::tz::TimeZone;

use crate::DelegateLogger;
use crate::Error;
use crate::ErrorKind;
use crate::Level;
use crate::LoggerManager;
use crate::Trap;
use crate::child_name;
use crate::sink::Console;
use crate::sink::Pipeline;
use crate::sink::RollingFileWriter;

mod config;

pub use self::config::DISABLED_OUTPUT_DIRECTORY;
pub use self::config::LEVEL_ENV;
pub use self::config::OUTPUT_DIRECTORY_ENV;
pub use self::config::SimpleConfig;

/// The reference backend.
///
/// Every channel shares the backend's level threshold, console and file pipeline.
///
/// The console, output directory and file prefix can be changed while the backend runs; loggers
/// created earlier see the change. The level is fixed at construction. Clones share all state, so
/// a clone kept aside can reconfigure a backend that was handed to [`Logging`](crate::Logging).
#[derive(Clone, Debug)]
pub struct SimpleLoggerManager {
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    level: Level,
    console: ArcSwap<Console>,
    pipeline: ArcSwapOption<Pipeline>,
    files: Mutex<FileSettings>,
    trap: Arc<dyn Trap>,
}

/// File output settings. Reconfiguration holds the lock while it swaps the pipeline.
#[derive(Debug)]
struct FileSettings {
    output_directory: Option<PathBuf>,
    prefix: String,
    time_zone: TimeZone,
    shut_down: bool,
}

impl FileSettings {
    fn start_pipeline(&self, dir: &Path, trap: &Arc<dyn Trap>) -> Result<Pipeline, Error> {
        let writer = RollingFileWriter::new(dir, self.prefix.clone(), self.time_zone.clone());
        Pipeline::builder(writer).trap(trap.clone()).build()
    }
}

impl SimpleLoggerManager {
    /// Create the backend and, if file output is enabled, start its file worker.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidOutputDirectory`](crate::ErrorKind::InvalidOutputDirectory) if
    /// the output directory cannot be created or written, or an I/O error if the worker thread
    /// cannot be spawned.
    pub fn new(config: SimpleConfig) -> Result<Self, Error> {
        let SimpleConfig {
            output_directory,
            level,
            console,
            file_prefix,
            time_zone,
            trap,
        } = config;

        let trap: Arc<dyn Trap> = Arc::from(trap);
        let output_directory = output_directory
            .as_deref()
            .map(config::validate_output_directory)
            .transpose()?;

        let files = FileSettings {
            output_directory,
            prefix: file_prefix.unwrap_or_else(config::default_file_prefix),
            time_zone,
            shut_down: false,
        };
        let pipeline = match &files.output_directory {
            Some(dir) => Some(Arc::new(files.start_pipeline(dir, &trap)?)),
            None => None,
        };

        Ok(Self {
            shared: Arc::new(Shared {
                level,
                console: ArcSwap::from_pointee(console),
                pipeline: ArcSwapOption::new(pipeline),
                files: Mutex::new(files),
                trap,
            }),
        })
    }

    /// The minimum enabled level.
    pub fn level(&self) -> Level {
        self.shared.level
    }

    /// The absolute log file directory, if file output is enabled.
    pub fn output_directory(&self) -> Option<PathBuf> {
        self.files().output_directory.clone()
    }

    /// The prefix of log file names.
    pub fn file_prefix(&self) -> String {
        self.files().prefix.clone()
    }

    /// Replace the console destination. The previous console is flushed.
    pub fn set_console(&self, console: Console) {
        let previous = self.shared.console.swap(Arc::new(console));
        if let Err(err) = previous.flush() {
            self.shared.trap.trap(&Error::from_io_error(err));
        }
    }

    /// Write later events to `dir`, or stop file output with `None`.
    ///
    /// The open file is closed; the next event opens a new file in the new directory. The
    /// directory is validated the same way as at construction, and on failure the current
    /// settings stay in place.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidOutputDirectory`] if `dir` cannot be created or written,
    /// [`ErrorKind::PipelineClosed`] after shutdown, or an I/O error if a worker thread cannot be
    /// spawned.
    pub fn set_output_directory(&self, dir: Option<&Path>) -> Result<(), Error> {
        let mut files = self.files();
        if files.shut_down {
            return Err(shut_down());
        }

        let dir = dir.map(config::validate_output_directory).transpose()?;
        match (self.shared.pipeline.load_full(), &dir) {
            (Some(pipeline), Some(dir)) => pipeline.redirect(dir, files.prefix.clone())?,
            (None, Some(dir)) => {
                let pipeline = files.start_pipeline(dir, &self.shared.trap)?;
                self.shared.pipeline.store(Some(Arc::new(pipeline)));
            }
            (Some(_), None) => {
                if let Some(pipeline) = self.shared.pipeline.swap(None) {
                    pipeline.shutdown();
                }
            }
            (None, None) => {}
        }
        files.output_directory = dir;
        Ok(())
    }

    /// Start a new log file whose name begins with `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::PipelineClosed`] after shutdown.
    pub fn set_file_prefix(&self, prefix: impl Into<String>) -> Result<(), Error> {
        let mut files = self.files();
        if files.shut_down {
            return Err(shut_down());
        }

        let prefix = prefix.into();
        if let (Some(pipeline), Some(dir)) = (
            self.shared.pipeline.load_full(),
            files.output_directory.as_deref(),
        ) {
            pipeline.redirect(dir, prefix.clone())?;
        }
        files.prefix = prefix;
        Ok(())
    }

    fn files(&self) -> std::sync::MutexGuard<'_, FileSettings> {
        self.shared
            .files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn shut_down() -> Error {
    Error::new(ErrorKind::PipelineClosed, "the simple backend is shut down")
}

impl LoggerManager for SimpleLoggerManager {
    fn name(&self) -> &str {
        "simple"
    }

    fn delegate(&self, name: &str) -> Arc<dyn DelegateLogger> {
        Arc::new(SimpleDelegate {
            name: Arc::from(name),
            shared: self.shared.clone(),
        })
    }

    fn flush(&self) {
        if let Some(pipeline) = self.shared.pipeline.load().as_deref() {
            if let Err(err) = pipeline.flush() {
                self.shared.trap.trap(&err);
            }
        }
        if let Err(err) = self.shared.console.load().flush() {
            self.shared.trap.trap(&Error::from_io_error(err));
        }
    }

    fn shutdown(&self) {
        self.files().shut_down = true;
        if let Some(pipeline) = self.shared.pipeline.load().as_deref() {
            pipeline.shutdown();
        }
        if let Err(err) = self.shared.console.load().flush() {
            self.shared.trap.trap(&Error::from_io_error(err));
        }
    }
}

#[derive(Debug)]
struct SimpleDelegate {
    name: Arc<str>,
    shared: Arc<Shared>,
}

impl DelegateLogger for SimpleDelegate {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_enabled(&self, level: Level) -> bool {
        level.is_enabled_for(self.shared.level)
    }

    fn log(&self, level: Level, text: &str) {
        if let Some(pipeline) = self.shared.pipeline.load().as_deref() {
            if let Err(err) = pipeline.enqueue(level, self.name.clone(), text) {
                self.report(&err.with_context("channel", &self.name));
            }
        }

        if let Err(err) = self.shared.console.load().write_line(text) {
            let err = Error::from_io_error(err).with_context("channel", &self.name);
            self.report(&err);
        }
    }

    fn child(&self, suffix: &str) -> Arc<dyn DelegateLogger> {
        Arc::new(SimpleDelegate {
            name: Arc::from(child_name(&self.name, suffix)),
            shared: self.shared.clone(),
        })
    }

    fn report(&self, err: &Error) {
        self.shared.trap.trap(err);
    }
}
