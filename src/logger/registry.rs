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

use crate::ArgumentFormatter;
use crate::LoggerManager;
use crate::MacroRenderer;
use crate::format::CollectionFormatter;
use crate::format::ErrorFormatter;
use crate::format::PathFormatter;
use crate::format::StringFormatter;
use crate::format::TypeFormatter;
use crate::template::FileMacro;
use crate::template::LineMacro;
use crate::template::MethodMacro;
use crate::template::ModuleMacro;
use crate::template::ThreadMacro;

/// Plugins supplied by the host application at startup.
///
/// The registry lists plugins by capability: backends ([`LoggerManager`]), argument formatters
/// and macro renderers. Registration order is preserved; formatters are queried in that order.
///
/// # Examples
///
/// ```
/// use logtide::Logging;
/// use logtide::PluginRegistry;
/// use logtide::testing::Testing;
///
/// let registry = PluginRegistry::with_standard_plugins().manager(Testing::default());
/// let logging = Logging::from_registry(registry).unwrap();
/// ```
#[derive(Debug, Default)]
pub struct PluginRegistry {
    managers: Vec<Box<dyn LoggerManager>>,
    formatters: Vec<Box<dyn ArgumentFormatter>>,
    macros: Vec<Box<dyn MacroRenderer>>,
}

impl PluginRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in formatters and macros, and no backend.
    pub fn with_standard_plugins() -> Self {
        Self::new()
            .formatter(StringFormatter)
            .formatter(CollectionFormatter)
            .formatter(ErrorFormatter)
            .formatter(PathFormatter)
            .formatter(TypeFormatter)
            .macro_renderer(MethodMacro)
            .macro_renderer(ModuleMacro)
            .macro_renderer(FileMacro)
            .macro_renderer(LineMacro)
            .macro_renderer(ThreadMacro)
    }

    /// Register a backend.
    #[must_use]
    pub fn manager(mut self, manager: impl Into<Box<dyn LoggerManager>>) -> Self {
        self.managers.push(manager.into());
        self
    }

    /// Register an argument formatter after the ones already registered.
    #[must_use]
    pub fn formatter(mut self, formatter: impl Into<Box<dyn ArgumentFormatter>>) -> Self {
        self.formatters.push(formatter.into());
        self
    }

    /// Register a macro renderer.
    #[must_use]
    pub fn macro_renderer(mut self, renderer: impl Into<Box<dyn MacroRenderer>>) -> Self {
        self.macros.push(renderer.into());
        self
    }

    /// The registered backends.
    pub fn managers(&self) -> &[Box<dyn LoggerManager>] {
        &self.managers
    }

    /// The registered argument formatters, in query order.
    pub fn formatters(&self) -> &[Box<dyn ArgumentFormatter>] {
        &self.formatters
    }

    /// The registered macro renderers.
    pub fn macros(&self) -> &[Box<dyn MacroRenderer>] {
        &self.macros
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        Vec<Arc<dyn LoggerManager>>,
        Vec<Box<dyn ArgumentFormatter>>,
        Vec<Box<dyn MacroRenderer>>,
    ) {
        let managers = self.managers.into_iter().map(Arc::from).collect();
        (managers, self.formatters, self.macros)
    }
}
