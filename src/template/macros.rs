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

//! Context-derived placeholders such as `{@method}`.

use std::collections::HashMap;
use std::fmt;

use crate::Caller;
use crate::Error;
use crate::ErrorKind;

/// The prefix that marks a placeholder as a macro rather than an argument.
pub const MACRO_SIGIL: char = '@';

/// Text rendered by `{@method}` when the enclosing function is unknown.
pub const UNKNOWN_METHOD: &str = "<unknown>";

/// A named, zero-argument producer of text resolved from the call site.
pub trait MacroRenderer: fmt::Debug + Send + Sync + 'static {
    /// The placeholder name, including the leading `@`.
    fn name(&self) -> &str;

    /// Render the macro for one placeholder occurrence.
    fn render(&self, caller: &Caller) -> String;
}

impl<T: MacroRenderer> From<T> for Box<dyn MacroRenderer> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}

/// A registry of [`MacroRenderer`]s keyed by name.
#[derive(Debug, Default)]
pub struct Macros {
    renderers: HashMap<String, Box<dyn MacroRenderer>>,
}

impl Macros {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with `@method`, `@module`, `@file`, `@line` and `@thread`.
    pub fn standard() -> Self {
        let mut macros = Self::new();
        for renderer in [
            Box::new(MethodMacro) as Box<dyn MacroRenderer>,
            Box::new(ModuleMacro),
            Box::new(FileMacro),
            Box::new(LineMacro),
            Box::new(ThreadMacro),
        ] {
            macros
                .renderers
                .insert(renderer.name().to_string(), renderer);
        }
        macros
    }

    /// Register a renderer.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidMacroName`] if the name does not start with `@`, or
    /// [`ErrorKind::DuplicateMacro`] if the name is already registered.
    pub fn register(&mut self, renderer: impl Into<Box<dyn MacroRenderer>>) -> Result<(), Error> {
        let renderer = renderer.into();
        let name = renderer.name().to_string();

        if !name.starts_with(MACRO_SIGIL) {
            return Err(Error::new(
                ErrorKind::InvalidMacroName,
                "macro names must start with '@'",
            )
            .with_context("name", name));
        }

        if self.renderers.contains_key(&name) {
            return Err(
                Error::new(ErrorKind::DuplicateMacro, "macro is registered twice")
                    .with_context("name", name),
            );
        }

        self.renderers.insert(name, renderer);
        Ok(())
    }

    /// Returns `true` if a renderer with the given name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.renderers.contains_key(name)
    }

    /// Resolve a macro for the given call site.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::UnknownMacro`] if no renderer has that name.
    pub fn resolve(&self, name: &str, caller: &Caller) -> Result<String, Error> {
        match self.renderers.get(name) {
            Some(renderer) => Ok(renderer.render(caller)),
            None => Err(Error::new(ErrorKind::UnknownMacro, "no macro renderer registered")
                .with_context("name", name)),
        }
    }
}

/// `{@method}`: the enclosing function of the logging call, as `name()`. When the call site
/// carries no function path, the first stack frame outside logtide is used.
#[derive(Debug, Default, Clone, Copy)]
pub struct MethodMacro;

impl MacroRenderer for MethodMacro {
    fn name(&self) -> &str {
        "@method"
    }

    fn render(&self, caller: &Caller) -> String {
        if let Some(name) = caller.method_name() {
            return format!("{name}()");
        }
        match crate::caller::method_from_stack() {
            Some(name) => format!("{name}()"),
            None => UNKNOWN_METHOD.to_string(),
        }
    }
}

/// `{@module}`: the module path of the logging call.
#[derive(Debug, Default, Clone, Copy)]
pub struct ModuleMacro;

impl MacroRenderer for ModuleMacro {
    fn name(&self) -> &str {
        "@module"
    }

    fn render(&self, caller: &Caller) -> String {
        caller.module_path().unwrap_or(UNKNOWN_METHOD).to_string()
    }
}

/// `{@file}`: the source file of the logging call.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileMacro;

impl MacroRenderer for FileMacro {
    fn name(&self) -> &str {
        "@file"
    }

    fn render(&self, caller: &Caller) -> String {
        caller.file().to_string()
    }
}

/// `{@line}`: the source line of the logging call.
#[derive(Debug, Default, Clone, Copy)]
pub struct LineMacro;

impl MacroRenderer for LineMacro {
    fn name(&self) -> &str {
        "@line"
    }

    fn render(&self, caller: &Caller) -> String {
        caller.line().to_string()
    }
}

/// `{@thread}`: the name of the logging thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadMacro;

impl MacroRenderer for ThreadMacro {
    fn name(&self) -> &str {
        "@thread"
    }

    fn render(&self, _: &Caller) -> String {
        std::thread::current()
            .name()
            .unwrap_or("<unnamed>")
            .to_string()
    }
}
