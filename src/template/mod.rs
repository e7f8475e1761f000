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

//! The message template engine.
//!
//! Templates interleave literal text with placeholders:
//!
//! * `{}` consumes the next positional argument and renders its natural text.
//! * `{op}` consumes the next positional argument and applies the named operation through the
//!   [argument formatter chain](crate::format::Formatters), e.g. `{size}` or `{isEmpty}`.
//! * `{@name}` consumes no argument and renders a [macro](MacroRenderer) from the call site, e.g.
//!   `{@method}`.
//! * `\{` renders a literal `{`; the backslash is dropped.
//!
//! Arguments beyond the last placeholder are ignored.

use std::borrow::Cow;

use crate::Caller;
use crate::Error;
use crate::ErrorKind;
use crate::Value;
use crate::format::Formatters;

mod macros;

pub use self::macros::FileMacro;
pub use self::macros::LineMacro;
pub use self::macros::MACRO_SIGIL;
pub use self::macros::MacroRenderer;
pub use self::macros::Macros;
pub use self::macros::MethodMacro;
pub use self::macros::ModuleMacro;
pub use self::macros::ThreadMacro;
pub use self::macros::UNKNOWN_METHOD;

/// Renders message templates against positional arguments.
///
/// # Examples
///
/// ```
/// use logtide::Caller;
/// use logtide::Value;
/// use logtide::template::TemplateFormatter;
///
/// let formatter = TemplateFormatter::standard();
/// let list = vec!["x", "y"];
/// let text = formatter
///     .render(
///         "a {} has {size} items",
///         &[Value::from("list"), Value::from(&list)],
///         &Caller::here(),
///     )
///     .unwrap();
/// assert_eq!(text, "a list has 2 items");
/// ```
#[derive(Debug, Default)]
pub struct TemplateFormatter {
    formatters: Formatters,
    macros: Macros,
}

impl TemplateFormatter {
    /// Create a template formatter from a formatter chain and a macro registry.
    pub fn new(formatters: Formatters, macros: Macros) -> Self {
        Self { formatters, macros }
    }

    /// Create a template formatter with the built-in formatters and macros.
    pub fn standard() -> Self {
        Self::new(Formatters::standard(), Macros::standard())
    }

    /// The argument formatter chain.
    pub fn formatters(&self) -> &Formatters {
        &self.formatters
    }

    /// The macro registry.
    pub fn macros(&self) -> &Macros {
        &self.macros
    }

    /// Render `template` with `args`.
    ///
    /// A template without any `{` is returned as-is without allocating.
    ///
    /// # Errors
    ///
    /// * [`ErrorKind::UnterminatedPlaceholder`] if an unescaped `{` has no closing `}`.
    /// * [`ErrorKind::MissingArgument`] if a placeholder has no argument left.
    /// * [`ErrorKind::UnsupportedFormatOperation`] if no formatter handles an operation.
    /// * [`ErrorKind::UnknownMacro`] if a macro placeholder is not registered.
    pub fn render<'t>(
        &self,
        template: &'t str,
        args: &[Value<'_>],
        caller: &Caller,
    ) -> Result<Cow<'t, str>, Error> {
        let Some(first) = template.find('{') else {
            return Ok(Cow::Borrowed(template));
        };

        let bytes = template.as_bytes();
        let mut out = String::with_capacity(template.len() + 16);
        let mut processed = 0;
        let mut arg_index = 0;
        let mut next = Some(first);

        while let Some(open) = next {
            if open > 0 && bytes[open - 1] == b'\\' {
                out.push_str(&template[processed..open - 1]);
                out.push('{');
                processed = open + 1;
            } else {
                let Some(close) = template[open..].find('}').map(|i| open + i) else {
                    return Err(Error::new(
                        ErrorKind::UnterminatedPlaceholder,
                        "template is missing a closing brace",
                    )
                    .with_context("position", open)
                    .with_context("template", template));
                };

                out.push_str(&template[processed..open]);
                let operation = &template[open + 1..close];
                if operation.starts_with(MACRO_SIGIL) {
                    out.push_str(&self.macros.resolve(operation, caller)?);
                } else {
                    let Some(arg) = args.get(arg_index) else {
                        return Err(Error::new(
                            ErrorKind::MissingArgument,
                            "template has more placeholders than arguments",
                        )
                        .with_context("index", arg_index)
                        .with_context("template", template));
                    };
                    self.formatters.write_argument(&mut out, arg, operation)?;
                    arg_index += 1;
                }
                processed = close + 1;
            }

            next = template[processed..].find('{').map(|i| processed + i);
        }

        out.push_str(&template[processed..]);
        Ok(Cow::Owned(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(template: &str, args: &[Value]) -> Result<String, Error> {
        TemplateFormatter::standard()
            .render(template, args, &Caller::here())
            .map(Cow::into_owned)
    }

    #[test]
    fn test_literal_templates() {
        assert_eq!(render("", &[]).unwrap(), "");
        assert_eq!(render("a b c", &[]).unwrap(), "a b c");
        assert_eq!(
            render("a b c", &[1.into(), 2.into(), 3.into()]).unwrap(),
            "a b c"
        );
    }

    #[test]
    fn test_literal_template_is_borrowed() {
        let formatter = TemplateFormatter::standard();
        let text = formatter
            .render("no placeholders here }", &[Value::from(1)], &Caller::here())
            .unwrap();
        assert!(matches!(text, Cow::Borrowed(_)));
    }

    #[test]
    fn test_positional_arguments() {
        assert_eq!(render("a {} c", &["b".into()]).unwrap(), "a b c");
        assert_eq!(render("{} b c", &["a".into()]).unwrap(), "a b c");
        assert_eq!(
            render("a {} c {}", &["b".into(), 'd'.into()]).unwrap(),
            "a b c d"
        );
        assert_eq!(render("1 {} 3", &[2.into()]).unwrap(), "1 2 3");
        assert_eq!(render("null {}", &[Value::Null]).unwrap(), "null null");
    }

    #[test]
    fn test_sequences() {
        let list = vec!["a", "b"];
        assert_eq!(
            render("list {}", &[Value::from(&list)]).unwrap(),
            "list [a, b]"
        );
        assert_eq!(
            render(
                "arrays {} {}",
                &[Value::from(["a", "b"]), Value::from([Some("c"), None])]
            )
            .unwrap(),
            "arrays [a, b] [c, null]"
        );
        assert_eq!(
            render(
                "arrays {} {}",
                &[
                    Value::from(["a", "b"]),
                    Value::from(vec![Value::from("c"), Value::from(["d", "e"])]),
                ]
            )
            .unwrap(),
            "arrays [a, b] [c, [d, e]]"
        );
    }

    #[test]
    fn test_escaped_brace() {
        assert_eq!(render("a \\{} c", &["b".into()]).unwrap(), "a {} c");
        assert_eq!(render("\\{", &[]).unwrap(), "{");
        assert_eq!(render("\\{} {}", &["x".into()]).unwrap(), "{} x");
    }

    #[test]
    fn test_operations() {
        let list = vec![1, 2, 3];
        let empty: Vec<i32> = vec![];
        assert_eq!(render("{size}", &[Value::from(&list)]).unwrap(), "3");
        assert_eq!(render("{isEmpty}", &[Value::from(&list)]).unwrap(), "false");
        assert_eq!(render("{isEmpty}", &[Value::from(&empty)]).unwrap(), "true");
        assert_eq!(render("{size}", &[Value::Null]).unwrap(), "null");
    }

    #[test]
    fn test_macros_do_not_consume_arguments() {
        let formatter = TemplateFormatter::standard();
        let caller = crate::caller!();
        let text = formatter
            .render("in {@method}: i = {}", &[Value::from(4)], &caller)
            .unwrap();
        assert_eq!(text, "in test_macros_do_not_consume_arguments(): i = 4");
    }

    #[test]
    fn test_failures() {
        let err = render("a { c", &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnterminatedPlaceholder);

        let err = render("a {} {}", &["b".into()]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingArgument);
        assert_eq!(err.context("index"), Some("1"));

        let err = render("{nope}", &["b".into()]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormatOperation);

        let err = render("{@nope}", &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownMacro);
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let formatter = TemplateFormatter::standard();
        let caller = Caller::here();
        let args = [Value::from("b"), Value::from(vec![1, 2])];
        let first = formatter.render("a {} {size} {}", &args[..1], &caller);
        assert!(first.is_err());

        let once = formatter.render("a {} {size}", &args, &caller).unwrap();
        let twice = formatter.render("a {} {size}", &args, &caller).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once, "a b 2");
    }
}
