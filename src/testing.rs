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

//! A backend that captures events in memory, for tests.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;

use crate::DelegateLogger;
use crate::Error;
use crate::ErrorKind;
use crate::Level;
use crate::LoggerManager;
use crate::child_name;

/// An event captured by [`Testing`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestingRecord {
    pub channel: String,
    pub level: Level,
    pub text: String,
}

/// An internal error captured by [`Testing`].
#[derive(Clone, Debug)]
pub struct TestingError {
    pub channel: String,
    pub kind: ErrorKind,
    pub message: String,
}

/// A backend that keeps every event in memory and echoes it to stderr, where a test harness (like
/// `cargo test`) captures it.
///
/// Clones share the same buffers, so a test can hand one clone to [`Logging`](crate::Logging)
/// and inspect the other.
///
/// # Examples
///
/// ```
/// use logtide::Level;
/// use logtide::Logging;
/// use logtide::testing::Testing;
///
/// let testing = Testing::new(Level::Warn);
/// let logger = Logging::new(testing.clone()).logger("app");
///
/// logger.info("hidden", &[]);
/// logger.warn("shown", &[]);
/// assert_eq!(testing.texts(), vec!["shown"]);
/// ```
#[derive(Clone, Debug)]
pub struct Testing {
    inner: Arc<Captured>,
}

#[derive(Debug)]
struct Captured {
    threshold: Level,
    records: Mutex<Vec<TestingRecord>>,
    errors: Mutex<Vec<TestingError>>,
}

impl Default for Testing {
    fn default() -> Self {
        Self::new(Level::Trace)
    }
}

impl Testing {
    /// Create a backend recording events at `threshold` and above.
    pub fn new(threshold: Level) -> Self {
        Self {
            inner: Arc::new(Captured {
                threshold,
                records: Mutex::new(vec![]),
                errors: Mutex::new(vec![]),
            }),
        }
    }

    /// The captured events, in the order they were logged.
    pub fn records(&self) -> Vec<TestingRecord> {
        let records = self.inner.records.lock();
        records.unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// The text of every captured event.
    pub fn texts(&self) -> Vec<String> {
        self.records().into_iter().map(|r| r.text).collect()
    }

    /// The captured internal errors.
    pub fn errors(&self) -> Vec<TestingError> {
        let errors = self.inner.errors.lock();
        errors.unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl LoggerManager for Testing {
    fn name(&self) -> &str {
        "testing"
    }

    fn delegate(&self, name: &str) -> Arc<dyn DelegateLogger> {
        Arc::new(TestingDelegate {
            name: name.to_string(),
            inner: self.inner.clone(),
        })
    }
}

#[derive(Debug)]
struct TestingDelegate {
    name: String,
    inner: Arc<Captured>,
}

impl DelegateLogger for TestingDelegate {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_enabled(&self, level: Level) -> bool {
        level.is_enabled_for(self.inner.threshold)
    }

    fn log(&self, level: Level, text: &str) {
        eprintln!("{level:<5} {}: {text}", self.name);
        let mut records = self
            .inner
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        records.push(TestingRecord {
            channel: self.name.clone(),
            level,
            text: text.to_string(),
        });
    }

    fn child(&self, suffix: &str) -> Arc<dyn DelegateLogger> {
        Arc::new(TestingDelegate {
            name: child_name(&self.name, suffix),
            inner: self.inner.clone(),
        })
    }

    fn report(&self, err: &Error) {
        eprintln!("{err}");
        let mut errors = self
            .inner
            .errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        errors.push(TestingError {
            channel: self.name.clone(),
            kind: err.kind(),
            message: err.message().to_string(),
        });
    }
}
