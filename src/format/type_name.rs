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

/// Type introspection for any value: `type`, `type.name`, `type.simpleName`, `type.module`.
///
/// Values built from primitives report their primitive name; values captured with
/// [`Value::display`], [`Value::debug`] or [`Value::error`] report the Rust type path.
#[derive(Debug, Default, Clone, Copy)]
pub struct TypeFormatter;

impl ArgumentFormatter for TypeFormatter {
    fn format(&self, value: &Value<'_>, operation: &str) -> Option<String> {
        let type_name = value.type_name();
        // the path without generic arguments
        let base = type_name.split('<').next().unwrap_or(type_name);

        match operation {
            "type" | "type.name" => Some(type_name.to_string()),
            "type.simpleName" => Some(base.rsplit("::").next().unwrap_or(base).to_string()),
            "type.module" => Some(
                base.rsplit_once("::")
                    .map(|(module, _)| module)
                    .unwrap_or_default()
                    .to_string(),
            ),
            _ => None,
        }
    }
}
