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

//! Logtide is a logging facade with a message template engine and an asynchronous, day-rotating
//! file backend.
//!
//! # Overview
//!
//! Application code logs through named channels ([`Logger`]). Each call passes a template such as
//! `"user {} has {size} sessions"` and positional [`Value`] arguments. The backend's level gate is
//! checked first; only enabled events are rendered by the [template engine](template) and handed
//! to the backend ([`LoggerManager`]).
//!
//! Rendering never fails the caller: a broken template is reported to the backend's internal
//! error channel and the event is dropped.
//!
//! # Examples
//!
//! Console-only setup with the reference backend:
//!
//! ```
//! use logtide::Level;
//! use logtide::Logging;
//! use logtide::simple::SimpleConfig;
//! use logtide::simple::SimpleLoggerManager;
//!
//! let manager = SimpleLoggerManager::new(SimpleConfig::new().level(Level::Debug)).unwrap();
//! let logging = Logging::new(manager);
//!
//! let logger = logging.logger("app");
//! logtide::info!(logger, "listening on {}:{}", "0.0.0.0", 8080);
//! logtide::debug!(logger.child("db"), "pool has {size} connections", &[1, 2, 3]);
//!
//! logging.shutdown();
//! ```
//!
//! Backend and plugins resolved from a registry at startup:
//!
//! ```
//! use logtide::Logging;
//! use logtide::PluginRegistry;
//! use logtide::simple::SimpleConfig;
//! use logtide::simple::SimpleLoggerManager;
//!
//! let config = SimpleConfig::from_env()?.no_output_directory();
//! let registry =
//!     PluginRegistry::with_standard_plugins().manager(SimpleLoggerManager::new(config)?);
//!
//! logtide::set_default_logging(Logging::from_registry(registry)?)?;
//! logtide::logger("startup").info("ready", &[]);
//! logtide::shutdown();
//! # Ok::<(), logtide::Error>(())
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod bridge;
pub mod format;
pub mod simple;
pub mod sink;
pub mod template;
pub mod testing;

mod caller;
mod error;
mod level;
mod logger;
mod macros;
mod trap;
mod value;

pub use self::caller::Caller;
pub use self::error::Error;
pub use self::error::ErrorKind;
pub use self::format::ArgumentFormatter;
pub use self::level::Level;
pub use self::logger::DelegateLogger;
pub use self::logger::Logger;
pub use self::logger::LoggerManager;
pub use self::logger::Logging;
pub use self::logger::PluginRegistry;
pub use self::logger::child_name;
pub use self::logger::default_logging;
pub use self::logger::logger;
pub use self::logger::set_default_logging;
pub use self::logger::shutdown;
pub use self::template::MacroRenderer;
pub use self::template::TemplateFormatter;
pub use self::trap::DefaultTrap;
pub use self::trap::Trap;
pub use self::value::Value;
