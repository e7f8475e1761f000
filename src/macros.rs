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

//! Leveled logging macros.
//!
//! The macros capture the call site, including the enclosing function used by `{@method}`, and
//! convert the arguments with [`Value::from`](crate::Value) only after the level gate passes.

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// use logtide::Level;
/// use logtide::Logging;
/// use logtide::testing::Testing;
///
/// let testing = Testing::default();
/// let logger = Logging::new(testing.clone()).logger("app");
///
/// let queue = vec!["a", "b"];
/// logtide::log!(logger, Level::Info, "queue {} has {size} items", "jobs", &queue);
/// assert_eq!(testing.texts(), vec!["queue jobs has 2 items"]);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $template:expr $(, $arg:expr)* $(,)?) => {{
        let logger = &$logger;
        let level = $level;
        if logger.is_enabled(level) {
            logger.log_at(
                level,
                &$crate::caller!(),
                $template,
                &[$($crate::Value::from($arg)),*],
            );
        }
    }};
}

/// Log a message at [`Level::Trace`](crate::Level::Trace).
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Trace, $($rest)+)
    };
}

/// Log a message at [`Level::Debug`](crate::Level::Debug).
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($rest)+)
    };
}

/// Log a message at [`Level::Info`](crate::Level::Info).
///
/// # Examples
///
/// ```
/// use logtide::Logging;
/// use logtide::testing::Testing;
///
/// fn handle_request(logger: &logtide::Logger) {
///     logtide::info!(logger, "entered {@method}");
/// }
///
/// let testing = Testing::default();
/// handle_request(&Logging::new(testing.clone()).logger("app"));
/// assert_eq!(testing.texts(), vec!["entered handle_request()"]);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($rest)+)
    };
}

/// Log a message at [`Level::Warn`](crate::Level::Warn).
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Warn, $($rest)+)
    };
}

/// Log a message at [`Level::Error`](crate::Level::Error).
#[macro_export]
macro_rules! error {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($rest)+)
    };
}

/// Log a message at [`Level::Fatal`](crate::Level::Fatal).
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Fatal, $($rest)+)
    };
}
