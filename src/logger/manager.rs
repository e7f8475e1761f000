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

use std::fmt;
use std::sync::Arc;

use crate::Error;
use crate::Level;

/// A backend: the provider of per-channel [`DelegateLogger`]s.
///
/// Exactly one manager must be registered when [`Logging`](crate::Logging) is built from a
/// [`PluginRegistry`](crate::PluginRegistry).
pub trait LoggerManager: fmt::Debug + Send + Sync + 'static {
    /// A short name identifying the backend in diagnostics.
    fn name(&self) -> &str;

    /// Return the delegate for the named channel.
    fn delegate(&self, name: &str) -> Arc<dyn DelegateLogger>;

    /// Flush any buffered output.
    ///
    /// Default to a no-op.
    fn flush(&self) {}

    /// Stop accepting events, drain buffered output and release resources.
    ///
    /// Default to a no-op.
    fn shutdown(&self) {}
}

impl<T: LoggerManager> From<T> for Box<dyn LoggerManager> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}

/// The backend side of one logging channel.
pub trait DelegateLogger: fmt::Debug + Send + Sync + 'static {
    /// The channel name.
    fn name(&self) -> &str;

    /// Returns `true` if the channel records events at `level`.
    ///
    /// This is checked before the message is rendered, so it must be cheap.
    fn is_enabled(&self, level: Level) -> bool;

    /// Record a rendered message.
    fn log(&self, level: Level, text: &str);

    /// Return the delegate of a child channel.
    fn child(&self, suffix: &str) -> Arc<dyn DelegateLogger>;

    /// Report an internal error, such as a message that failed to render.
    fn report(&self, err: &Error);
}

/// Join a channel name and a child suffix with a dot.
///
/// # Examples
///
/// ```
/// assert_eq!(logtide::child_name("app.db", "pool"), "app.db.pool");
/// assert_eq!(logtide::child_name("", "pool"), "pool");
/// ```
pub fn child_name(parent: &str, suffix: &str) -> String {
    if parent.is_empty() {
        suffix.to_string()
    } else {
        format!("{parent}.{suffix}")
    }
}
