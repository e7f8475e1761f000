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

use logtide::Logger;
use logtide::Logging;
use logtide::Value;
use logtide::testing::Testing;

fn logger(testing: &Testing) -> Logger {
    Logging::new(testing.clone()).logger("values")
}

#[test]
fn test_untyped_literals_convert_to_values() {
    assert!(matches!(Value::from(5), Value::I64(5)));
    assert_eq!(Value::from("here").to_string(), "here");
    assert_eq!(Value::from(&[1, 2][..]).to_string(), "[1, 2]");
    assert_eq!(Value::from(&["a", "b"]).to_string(), "[a, b]");
}

#[test]
fn test_macro_arguments_accept_literals_and_slices() {
    let testing = Testing::default();
    let logger = logger(&testing);

    logtide::info!(logger, "{} {size}", 5, &[1, 2][..]);
    logtide::info!(logger, "{} and {}", "here", vec![1.5, 2.5]);
    assert_eq!(testing.texts(), vec!["5 2", "here and [1.5, 2.5]"]);
}

#[test]
fn test_borrowed_collections_convert_by_cloning_elements() {
    let names = vec![String::from("x"), String::from("y")];
    let words = vec!["p", "q"];
    let nested = vec![vec![1u8], vec![2, 3]];

    let testing = Testing::default();
    let logger = logger(&testing);
    logger.info(
        "{} {} {}",
        &[Value::from(&names), Value::from(&words), Value::from(&nested)],
    );
    assert_eq!(testing.texts(), vec!["[x, y] [p, q] [[1], [2, 3]]"]);
}
