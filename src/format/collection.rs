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

/// Operations on sequences and maps.
///
/// Sequences and maps support `size` and `isEmpty`; maps also support `keys` and `values`,
/// rendered as sequences.
#[derive(Debug, Default, Clone, Copy)]
pub struct CollectionFormatter;

impl ArgumentFormatter for CollectionFormatter {
    fn format(&self, value: &Value<'_>, operation: &str) -> Option<String> {
        match (value, operation) {
            (Value::Seq(values), "size") => Some(values.len().to_string()),
            (Value::Seq(values), "isEmpty") => Some(values.is_empty().to_string()),
            (Value::Map(entries), "size") => Some(entries.len().to_string()),
            (Value::Map(entries), "isEmpty") => Some(entries.is_empty().to_string()),
            (Value::Map(entries), "keys") => {
                let keys = entries.iter().map(|(k, _)| k.clone()).collect();
                Some(Value::Seq(keys).to_string())
            }
            (Value::Map(entries), "values") => {
                let values = entries.iter().map(|(_, v)| v.clone()).collect();
                Some(Value::Seq(values).to_string())
            }
            _ => None,
        }
    }
}
