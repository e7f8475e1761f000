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

use std::sync::Arc;

use crate::Caller;
use crate::DelegateLogger;
use crate::Level;
use crate::Value;
use crate::template::TemplateFormatter;

/// A handle to one logging channel.
///
/// Handles are cheap to clone. Every leveled method checks the level gate first and renders the
/// template only when the channel is enabled. A template that fails to render is reported once to
/// the backend and the event is dropped; logging never panics or returns an error.
///
/// # Examples
///
/// ```
/// use logtide::Logging;
/// use logtide::Value;
/// use logtide::testing::Testing;
///
/// let testing = Testing::default();
/// let logging = Logging::new(testing.clone());
/// let logger = logging.logger("app");
///
/// logger.info("listening on port {}", &[Value::from(8080)]);
/// assert_eq!(testing.texts(), vec!["listening on port 8080"]);
/// ```
#[derive(Clone, Debug)]
pub struct Logger {
    delegate: Arc<dyn DelegateLogger>,
    template: Arc<TemplateFormatter>,
}

impl Logger {
    /// Create a handle from a backend delegate and a template formatter.
    pub fn new(delegate: Arc<dyn DelegateLogger>, template: Arc<TemplateFormatter>) -> Self {
        Self { delegate, template }
    }

    /// The channel name.
    pub fn name(&self) -> &str {
        self.delegate.name()
    }

    /// Return a handle to a child channel named `<name>.<suffix>`.
    pub fn child(&self, suffix: &str) -> Logger {
        Logger {
            delegate: self.delegate.child(suffix),
            template: self.template.clone(),
        }
    }

    /// Returns `true` if events at `level` are recorded.
    pub fn is_enabled(&self, level: Level) -> bool {
        self.delegate.is_enabled(level)
    }

    /// Log a message at `level` with the caller's location.
    #[track_caller]
    pub fn log(&self, level: Level, template: &str, args: &[Value<'_>]) {
        self.log_at(level, &Caller::here(), template, args);
    }

    /// Log a message at `level` from an explicit call site.
    pub fn log_at(&self, level: Level, caller: &Caller, template: &str, args: &[Value<'_>]) {
        if !self.delegate.is_enabled(level) {
            return;
        }

        match self.template.render(template, args, caller) {
            Ok(text) => self.delegate.log(level, &text),
            Err(err) => {
                let err = err
                    .with_context("channel", self.delegate.name())
                    .with_context("level", level)
                    .with_context("location", format!("{}:{}", caller.file(), caller.line()));
                self.delegate.report(&err);
            }
        }
    }

    /// Log a message at [`Level::Trace`].
    #[track_caller]
    pub fn trace(&self, template: &str, args: &[Value<'_>]) {
        self.log(Level::Trace, template, args);
    }

    /// Log a message at [`Level::Debug`].
    #[track_caller]
    pub fn debug(&self, template: &str, args: &[Value<'_>]) {
        self.log(Level::Debug, template, args);
    }

    /// Log a message at [`Level::Info`].
    #[track_caller]
    pub fn info(&self, template: &str, args: &[Value<'_>]) {
        self.log(Level::Info, template, args);
    }

    /// Log a message at [`Level::Warn`].
    #[track_caller]
    pub fn warn(&self, template: &str, args: &[Value<'_>]) {
        self.log(Level::Warn, template, args);
    }

    /// Log a message at [`Level::Error`].
    #[track_caller]
    pub fn error(&self, template: &str, args: &[Value<'_>]) {
        self.log(Level::Error, template, args);
    }

    /// Log a message at [`Level::Fatal`].
    #[track_caller]
    pub fn fatal(&self, template: &str, args: &[Value<'_>]) {
        self.log(Level::Fatal, template, args);
    }
}
