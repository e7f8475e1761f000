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

//! Call-site context used by macro placeholders.

use std::backtrace::Backtrace;
use std::backtrace::BacktraceStatus;
use std::panic::Location;

/// The call site of a log statement.
///
/// The facade captures this at the logging call site. [`Logger`] methods are
/// `#[track_caller]`, so the location always refers to the first frame outside logtide; the
/// [facade macros](crate::info) additionally record the enclosing function and module.
///
/// [`Logger`]: crate::Logger
#[derive(Clone, Copy, Debug)]
pub struct Caller {
    location: &'static Location<'static>,
    module_path: Option<&'static str>,
    function: Option<&'static str>,
}

impl Caller {
    /// Capture the location of the caller.
    #[track_caller]
    pub fn here() -> Self {
        Self {
            location: Location::caller(),
            module_path: None,
            function: None,
        }
    }

    /// Attach the module path of the call site.
    pub fn with_module_path(mut self, module_path: &'static str) -> Self {
        self.module_path = Some(module_path);
        self
    }

    /// Attach the fully qualified path of the enclosing function.
    pub fn with_function(mut self, function: &'static str) -> Self {
        self.function = Some(function);
        self
    }

    /// The source file of the call site.
    pub fn file(&self) -> &'static str {
        self.location.file()
    }

    /// The line of the call site.
    pub fn line(&self) -> u32 {
        self.location.line()
    }

    /// The module path of the call site, if captured.
    pub fn module_path(&self) -> Option<&'static str> {
        self.module_path
    }

    /// The fully qualified path of the enclosing function, if captured.
    pub fn function(&self) -> Option<&'static str> {
        self.function
    }

    /// The bare name of the enclosing function.
    ///
    /// Closure segments are skipped so a log call inside a closure reports the function that
    /// defines the closure.
    pub fn method_name(&self) -> Option<&'static str> {
        self.function?
            .rsplit("::")
            .find(|segment| !segment.is_empty() && !segment.starts_with('{'))
    }
}

/// Frames whose symbols start with these prefixes belong to logtide or the runtime and are never
/// reported as the calling method.
const INTERNAL_FRAME_PREFIXES: &[&str] = &[
    "logtide::",
    "std::",
    "core::",
    "alloc::",
    "backtrace::",
    "test::",
    "log::__private_api",
    "__rust",
];

/// The bare name of the innermost function on the current stack outside logtide.
///
/// Used when the call site carries no function path, as with plain [`Logger`] method calls.
/// Returns `None` when no backtrace can be captured or every frame is internal.
///
/// [`Logger`]: crate::Logger
pub(crate) fn method_from_stack() -> Option<String> {
    let backtrace = Backtrace::force_capture();
    if backtrace.status() != BacktraceStatus::Captured {
        return None;
    }

    backtrace
        .to_string()
        .lines()
        .filter_map(frame_symbol)
        .find(|symbol| !is_internal_frame(symbol))
        .and_then(bare_name)
        .map(str::to_string)
}

/// Extract the symbol from a rendered frame line such as `  12: app::handle_request`.
fn frame_symbol(line: &str) -> Option<&str> {
    let (index, symbol) = line.trim_start().split_once(": ")?;
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(symbol.trim())
}

fn is_internal_frame(symbol: &str) -> bool {
    if symbol == "<unknown>" {
        return true;
    }
    let path = symbol.trim_start_matches(['<', '&']);
    if path.starts_with("logtide::") && path.contains("::tests::") {
        return false;
    }
    INTERNAL_FRAME_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
}

fn bare_name(symbol: &str) -> Option<&str> {
    let mut segments = symbol.rsplit("::").peekable();
    // legacy mangling leaves a `::h<16 hex>` hash on the symbol
    if let Some(last) = segments.peek() {
        if last.len() == 17
            && last.starts_with('h')
            && last[1..].bytes().all(|b| b.is_ascii_hexdigit())
        {
            segments.next();
        }
    }
    segments
        .map(|segment| segment.trim_end_matches('>'))
        .find(|segment| !segment.is_empty() && !segment.starts_with('{'))
}

/// Expands to the fully qualified path of the enclosing function.
#[doc(hidden)]
#[macro_export]
macro_rules! __function_path {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        match name.strip_suffix("::f") {
            Some(name) => name,
            None => name,
        }
    }};
}

/// Expands to a [`Caller`] for the current call site.
#[macro_export]
macro_rules! caller {
    () => {
        $crate::Caller::here()
            .with_module_path(::std::module_path!())
            .with_function($crate::__function_path!())
    };
}
