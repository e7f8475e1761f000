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

use logtide::ArgumentFormatter;
use logtide::Caller;
use logtide::ErrorKind;
use logtide::Logging;
use logtide::MacroRenderer;
use logtide::PluginRegistry;
use logtide::Value;
use logtide::testing::Testing;

#[derive(Debug)]
struct HexFormatter;

impl ArgumentFormatter for HexFormatter {
    fn format(&self, value: &Value<'_>, operation: &str) -> Option<String> {
        match (value, operation) {
            (Value::U64(n), "hex") => Some(format!("{n:#x}")),
            (Value::I64(n), "hex") => Some(format!("{n:#x}")),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct TenantMacro;

impl MacroRenderer for TenantMacro {
    fn name(&self) -> &str {
        "@tenant"
    }

    fn render(&self, _: &Caller) -> String {
        "acme".to_string()
    }
}

#[derive(Debug)]
struct UnnamedMacro;

impl MacroRenderer for UnnamedMacro {
    fn name(&self) -> &str {
        "tenant"
    }

    fn render(&self, _: &Caller) -> String {
        String::new()
    }
}

fn logging(testing: &Testing) -> Logging {
    let registry = PluginRegistry::with_standard_plugins()
        .manager(testing.clone())
        .formatter(HexFormatter)
        .macro_renderer(TenantMacro);
    Logging::from_registry(registry).unwrap()
}

#[test]
fn test_custom_plugins_take_part_in_rendering() {
    let testing = Testing::default();
    let logger = logging(&testing).logger("plugins");

    logtide::info!(logger, "[{@tenant}] flags {hex} of {size}", 255u32, &["a", "b"]);
    assert_eq!(testing.texts(), vec!["[acme] flags 0xff of 2"]);
}

#[test]
fn test_builtin_formatters_run_before_custom_ones() {
    let testing = Testing::default();
    let logger = logging(&testing).logger("plugins");

    // `length` is handled by the string formatter; numbers fall through to nobody.
    logtide::info!(logger, "{length}", "héllo");
    logtide::info!(logger, "{length}", 5);
    assert_eq!(testing.texts(), vec!["5"]);

    let errors = testing.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::UnsupportedFormatOperation);
    assert_eq!(errors[0].channel, "plugins");
}

#[test]
fn test_macro_names_need_the_sigil() {
    let registry = PluginRegistry::new()
        .manager(Testing::default())
        .macro_renderer(UnnamedMacro);
    let err = Logging::from_registry(registry).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidMacroName);
}

#[test]
fn test_empty_registry_has_no_formatters_or_macros() {
    let testing = Testing::default();
    let registry = PluginRegistry::new().manager(testing.clone());
    let logger = Logging::from_registry(registry).unwrap().logger("bare");

    logtide::info!(logger, "{} {}", "natural", &[1, 2]);
    logtide::info!(logger, "{size}", &[1, 2]);
    logtide::info!(logger, "{@method}");

    assert_eq!(testing.texts(), vec!["natural [1, 2]"]);
    let kinds = testing
        .errors()
        .into_iter()
        .map(|err| err.kind)
        .collect::<Vec<_>>();
    assert_eq!(
        kinds,
        vec![ErrorKind::UnsupportedFormatOperation, ErrorKind::UnknownMacro]
    );
}
