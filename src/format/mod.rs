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

//! Argument formatters applied by named placeholders such as `{size}`.
//!
//! Formatters are queried in registration order until one of them supports the argument and the
//! operation.

use std::fmt;
use std::fmt::Write;

use crate::Error;
use crate::ErrorKind;
use crate::Value;

mod collection;
mod error;
mod path;
mod string;
mod type_name;

pub use self::collection::CollectionFormatter;
pub use self::error::ErrorFormatter;
pub use self::path::PathFormatter;
pub use self::string::StringFormatter;
pub use self::type_name::TypeFormatter;
pub(crate) use self::path::check_writable_dir;

/// Text rendered by a formatter that failed to read the file system.
pub const UNAVAILABLE: &str = "<null>";

/// A formatter for one family of argument values.
///
/// Implementations must be side-effect free; formatters that read the file system render
/// [`UNAVAILABLE`] instead of failing.
pub trait ArgumentFormatter: fmt::Debug + Send + Sync + 'static {
    /// Format `value` with the named operation.
    ///
    /// Returns `None` if this formatter does not handle the value or the operation.
    fn format(&self, value: &Value<'_>, operation: &str) -> Option<String>;
}

impl<T: ArgumentFormatter> From<T> for Box<dyn ArgumentFormatter> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}

/// An ordered chain of [`ArgumentFormatter`]s.
#[derive(Debug, Default)]
pub struct Formatters {
    formatters: Vec<Box<dyn ArgumentFormatter>>,
}

impl Formatters {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a chain with the built-in formatters, in this order: strings, collections, errors,
    /// paths, types.
    pub fn standard() -> Self {
        Self::new()
            .with(StringFormatter)
            .with(CollectionFormatter)
            .with(ErrorFormatter)
            .with(PathFormatter)
            .with(TypeFormatter)
    }

    /// Append a formatter to the end of the chain.
    pub fn push(&mut self, formatter: impl Into<Box<dyn ArgumentFormatter>>) {
        self.formatters.push(formatter.into());
    }

    /// Append a formatter to the end of the chain.
    #[must_use]
    pub fn with(mut self, formatter: impl Into<Box<dyn ArgumentFormatter>>) -> Self {
        self.push(formatter);
        self
    }

    /// The number of registered formatters.
    pub fn len(&self) -> usize {
        self.formatters.len()
    }

    /// Returns `true` if no formatter is registered.
    pub fn is_empty(&self) -> bool {
        self.formatters.is_empty()
    }

    /// Format an argument with the named operation.
    ///
    /// `null` always renders as `"null"`; an empty operation renders the value's natural text.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::UnsupportedFormatOperation`] if no formatter handles the value and the
    /// operation.
    ///
    /// # Examples
    ///
    /// ```
    /// use logtide::Value;
    /// use logtide::format::Formatters;
    ///
    /// let formatters = Formatters::standard();
    /// let list = vec![1, 2, 3];
    /// assert_eq!(formatters.format_argument(&Value::from(&list), "size").unwrap(), "3");
    /// ```
    pub fn format_argument(&self, value: &Value<'_>, operation: &str) -> Result<String, Error> {
        let mut out = String::new();
        self.write_argument(&mut out, value, operation)?;
        Ok(out)
    }

    pub(crate) fn write_argument(
        &self,
        out: &mut String,
        value: &Value<'_>,
        operation: &str,
    ) -> Result<(), Error> {
        if value.is_null() {
            out.push_str("null");
            return Ok(());
        }

        if operation.is_empty() {
            // writing to a String never fails
            let _ = write!(out, "{value}");
            return Ok(());
        }

        for formatter in &self.formatters {
            if let Some(formatted) = formatter.format(value, operation) {
                out.push_str(&formatted);
                return Ok(());
            }
        }

        Err(Error::new(
            ErrorKind::UnsupportedFormatOperation,
            "no argument formatter supports the operation",
        )
        .with_context("type", value.type_name())
        .with_context("operation", operation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Fixed(&'static str);

    impl ArgumentFormatter for Fixed {
        fn format(&self, _: &Value<'_>, operation: &str) -> Option<String> {
            (operation == "fixed").then(|| self.0.to_string())
        }
    }

    #[test]
    fn test_first_registered_formatter_wins() {
        let formatters = Formatters::new().with(Fixed("first")).with(Fixed("second"));
        let out = formatters.format_argument(&Value::from(1), "fixed").unwrap();
        assert_eq!(out, "first");
    }

    #[test]
    fn test_null_ignores_operation() {
        let formatters = Formatters::new();
        assert_eq!(
            formatters.format_argument(&Value::Null, "size").unwrap(),
            "null"
        );
    }

    #[test]
    fn test_unsupported_operation_names_type_and_operation() {
        let err = Formatters::standard()
            .format_argument(&Value::from(1), "size")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormatOperation);
        assert_eq!(err.context("type"), Some("i64"));
        assert_eq!(err.context("operation"), Some("size"));
    }
}
