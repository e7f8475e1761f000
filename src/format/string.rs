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

use crate::Value;
use crate::format::ArgumentFormatter;

/// Operations on strings: `isEmpty`, `length`, `trim`, `toLowerCase`, `toUpperCase`.
///
/// `length` counts characters, not bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct StringFormatter;

impl ArgumentFormatter for StringFormatter {
    fn format(&self, value: &Value<'_>, operation: &str) -> Option<String> {
        let Value::Str(s) = value else {
            return None;
        };

        match operation {
            "isEmpty" => Some(s.is_empty().to_string()),
            "length" => Some(s.chars().count().to_string()),
            "trim" => Some(s.trim().to_string()),
            "toLowerCase" => Some(s.to_lowercase()),
            "toUpperCase" => Some(s.to_uppercase()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_operations() {
        let value = Value::from(" Abc ");
        let f = |op| StringFormatter.format(&value, op);

        assert_eq!(f("isEmpty").as_deref(), Some("false"));
        assert_eq!(f("length").as_deref(), Some("5"));
        assert_eq!(f("trim").as_deref(), Some("Abc"));
        assert_eq!(f("toLowerCase").as_deref(), Some(" abc "));
        assert_eq!(f("toUpperCase").as_deref(), Some(" ABC "));
        assert_eq!(f("reverse"), None);
    }

    #[test]
    fn test_length_counts_chars() {
        let value = Value::from("héllo");
        assert_eq!(
            StringFormatter.format(&value, "length").as_deref(),
            Some("5")
        );
    }

    #[test]
    fn test_non_strings_are_not_applicable() {
        assert_eq!(StringFormatter.format(&Value::from(1), "length"), None);
    }
}
