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

use std::fmt::Write;

use crate::Value;
use crate::format::ArgumentFormatter;

/// Operations on errors: `message` and `stackTrace`.
///
/// `stackTrace` renders the error followed by one `caused by:` line per source.
#[derive(Debug, Default, Clone, Copy)]
pub struct ErrorFormatter;

impl ArgumentFormatter for ErrorFormatter {
    fn format(&self, value: &Value<'_>, operation: &str) -> Option<String> {
        let Value::Error { error, type_name } = value else {
            return None;
        };

        match operation {
            "message" => Some(error.to_string()),
            "stackTrace" => {
                let mut out = format!("{type_name}: {error}");
                let mut source = error.source();
                while let Some(err) = source {
                    let _ = write!(out, "\ncaused by: {err}");
                    source = err.source();
                }
                Some(out)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fmt;

    use super::*;

    #[derive(Debug)]
    struct Outer(std::io::Error);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("cannot load settings")
        }
    }

    impl std::error::Error for Outer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_error_operations() {
        let err = Outer(std::io::Error::other("disk on fire"));
        let value = Value::error(&err);

        assert_eq!(
            ErrorFormatter.format(&value, "message").as_deref(),
            Some("cannot load settings")
        );

        let trace = ErrorFormatter.format(&value, "stackTrace").unwrap();
        let lines = trace.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("Outer: cannot load settings"));
        assert_eq!(lines[1], "caused by: disk on fire");
    }
}
