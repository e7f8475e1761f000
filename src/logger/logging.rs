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
use std::sync::OnceLock;

use crate::DelegateLogger;
use crate::Error;
use crate::ErrorKind;
use crate::Level;
use crate::Logger;
use crate::LoggerManager;
use crate::PluginRegistry;
use crate::child_name;
use crate::format::Formatters;
use crate::template::Macros;
use crate::template::TemplateFormatter;

/// An initialized logging facade: one backend plus the template formatter shared by its loggers.
///
/// `Logging` is usually built once by the process entry point and either passed to the code that
/// logs or installed with [`set_default_logging`].
#[derive(Clone, Debug)]
pub struct Logging {
    manager: Arc<dyn LoggerManager>,
    template: Arc<TemplateFormatter>,
}

impl Logging {
    /// Create a facade over `manager` with the built-in formatters and macros.
    pub fn new(manager: impl Into<Box<dyn LoggerManager>>) -> Self {
        Self::with_template(manager, TemplateFormatter::standard())
    }

    /// Create a facade over `manager` with a custom template formatter.
    pub fn with_template(
        manager: impl Into<Box<dyn LoggerManager>>,
        template: TemplateFormatter,
    ) -> Self {
        Self {
            manager: Arc::from(manager.into()),
            template: Arc::new(template),
        }
    }

    /// Create a facade from the plugins in `registry`.
    ///
    /// # Errors
    ///
    /// * [`ErrorKind::NoBackendFound`] if no backend is registered.
    /// * [`ErrorKind::AmbiguousBackend`] if more than one backend is registered.
    /// * [`ErrorKind::DuplicateMacro`] or [`ErrorKind::InvalidMacroName`] if the macro renderers
    ///   conflict.
    pub fn from_registry(registry: PluginRegistry) -> Result<Self, Error> {
        let (mut managers, formatters, renderers) = registry.into_parts();

        let manager = match managers.len() {
            0 => {
                return Err(Error::new(
                    ErrorKind::NoBackendFound,
                    "no logger manager is registered",
                ));
            }
            1 => managers.remove(0),
            n => {
                let names = managers
                    .iter()
                    .map(|m| m.name().to_string())
                    .collect::<Vec<_>>();
                return Err(Error::new(
                    ErrorKind::AmbiguousBackend,
                    "more than one logger manager is registered",
                )
                .with_context("count", n)
                .with_context("managers", names.join(", ")));
            }
        };

        let mut chain = Formatters::new();
        for formatter in formatters {
            chain.push(formatter);
        }

        let mut macros = Macros::new();
        for renderer in renderers {
            macros.register(renderer)?;
        }

        Ok(Self {
            manager,
            template: Arc::new(TemplateFormatter::new(chain, macros)),
        })
    }

    /// The backend.
    pub fn manager(&self) -> &Arc<dyn LoggerManager> {
        &self.manager
    }

    /// The template formatter shared by all loggers.
    pub fn template(&self) -> &Arc<TemplateFormatter> {
        &self.template
    }

    /// Return a logger for the named channel.
    pub fn logger(&self, name: &str) -> Logger {
        Logger::new(self.manager.delegate(name), self.template.clone())
    }

    /// Return a logger for a channel named after the type `T`.
    pub fn logger_for<T: ?Sized>(&self) -> Logger {
        self.logger(std::any::type_name::<T>())
    }

    /// Flush the backend.
    pub fn flush(&self) {
        self.manager.flush();
    }

    /// Shut the backend down, draining buffered events.
    pub fn shutdown(&self) {
        self.manager.shutdown();
    }
}

static DEFAULT_LOGGING: OnceLock<Logging> = OnceLock::new();

/// Install the process-wide default facade.
///
/// The default can be set once and is never replaced.
///
/// # Errors
///
/// Returns [`ErrorKind::AlreadyInitialized`] if a default is already installed.
pub fn set_default_logging(logging: Logging) -> Result<(), Error> {
    DEFAULT_LOGGING.set(logging).map_err(|_| {
        Error::new(
            ErrorKind::AlreadyInitialized,
            "the default logging facade is already set",
        )
    })
}

/// Return the process-wide default facade, if installed.
pub fn default_logging() -> Option<&'static Logging> {
    DEFAULT_LOGGING.get()
}

/// Return a logger for the named channel from the default facade.
///
/// Before [`set_default_logging`] is called the returned logger discards every event.
pub fn logger(name: &str) -> Logger {
    match default_logging() {
        Some(logging) => logging.logger(name),
        None => Logger::new(
            Arc::new(Discard {
                name: name.to_string(),
            }),
            Arc::new(TemplateFormatter::default()),
        ),
    }
}

/// Shut the default facade down, if installed.
///
/// Call this before the process exits: the default facade lives in a static and is never
/// dropped, so buffered events are only written once it is shut down.
pub fn shutdown() {
    if let Some(logging) = default_logging() {
        logging.shutdown();
    }
}

#[derive(Debug)]
struct Discard {
    name: String,
}

impl DelegateLogger for Discard {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_enabled(&self, _: Level) -> bool {
        false
    }

    fn log(&self, _: Level, _: &str) {}

    fn child(&self, suffix: &str) -> Arc<dyn DelegateLogger> {
        Arc::new(Discard {
            name: child_name(&self.name, suffix),
        })
    }

    fn report(&self, _: &Error) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Testing;

    #[test]
    fn test_registry_requires_exactly_one_backend() {
        let err = Logging::from_registry(PluginRegistry::with_standard_plugins()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoBackendFound);

        let registry = PluginRegistry::with_standard_plugins()
            .manager(Testing::default())
            .manager(Testing::default());
        let err = Logging::from_registry(registry).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AmbiguousBackend);
        assert_eq!(err.context("count"), Some("2"));
    }

    #[test]
    fn test_registry_rejects_duplicate_macros() {
        let registry = PluginRegistry::with_standard_plugins()
            .manager(Testing::default())
            .macro_renderer(crate::template::MethodMacro);
        let err = Logging::from_registry(registry).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateMacro);
    }

    #[test]
    fn test_registry_builds_template_in_order() {
        let registry = PluginRegistry::with_standard_plugins().manager(Testing::default());
        assert_eq!(registry.formatters().len(), 5);
        assert_eq!(registry.macros().len(), 5);

        let logging = Logging::from_registry(registry).unwrap();
        assert_eq!(logging.template().formatters().len(), 5);
        assert!(logging.template().macros().contains("@method"));
    }

    #[test]
    fn test_logger_for_type() {
        struct Service;

        let logging = Logging::new(Testing::default());
        let logger = logging.logger_for::<Service>();
        assert!(logger.name().ends_with("Service"));
    }

    #[test]
    fn test_logger_before_default_is_set_discards() {
        let logger = logger("early");
        assert!(!logger.is_enabled(Level::Fatal));
        logger.fatal("{", &[]);
        assert_eq!(logger.child("x").name(), "early.x");
    }
}
