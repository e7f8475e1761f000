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

//! Positional arguments of a log call.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::path::PathBuf;

/// A positional argument passed to a log call.
///
/// Values borrow from the call site; nothing is copied unless the level gate lets the event
/// through and the template is rendered.
///
/// # Examples
///
/// ```
/// use logtide::Value;
///
/// assert_eq!(Value::from(42).to_string(), "42");
/// assert_eq!(Value::from(None::<&str>).to_string(), "null");
/// assert_eq!(Value::from(vec!["a", "b"]).to_string(), "[a, b]");
/// ```
#[derive(Clone)]
pub enum Value<'a> {
    /// The absent value, rendered as `null`.
    Null,
    Bool(bool),
    Char(char),
    I64(i64),
    U64(u64),
    F64(f64),
    Str(Cow<'a, str>),
    /// Arrays, slices, vectors and other collections.
    Seq(Vec<Value<'a>>),
    /// Ordered key-value pairs.
    Map(Vec<(Value<'a>, Value<'a>)>),
    /// A file system path.
    Path(&'a Path),
    /// An error with its source chain.
    Error {
        error: &'a (dyn std::error::Error + 'static),
        type_name: &'static str,
    },
    /// Any value rendered through its [`fmt::Display`] implementation.
    Display {
        value: &'a dyn fmt::Display,
        type_name: &'static str,
    },
    /// Any value rendered through its [`fmt::Debug`] implementation.
    Debug {
        value: &'a dyn fmt::Debug,
        type_name: &'static str,
    },
}

impl<'a> Value<'a> {
    /// Capture a value rendered with [`fmt::Display`].
    pub fn display<T: fmt::Display>(value: &'a T) -> Self {
        Value::Display {
            value,
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Capture a value rendered with [`fmt::Debug`].
    pub fn debug<T: fmt::Debug>(value: &'a T) -> Self {
        Value::Debug {
            value,
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Capture an error so that formatters can walk its source chain.
    pub fn error<E: std::error::Error + 'static>(error: &'a E) -> Self {
        Value::Error {
            error,
            type_name: std::any::type_name::<E>(),
        }
    }

    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The name of the type this value was captured from.
    pub fn type_name(&self) -> &'static str {
        match *self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Char(_) => "char",
            Value::I64(_) => "i64",
            Value::U64(_) => "u64",
            Value::F64(_) => "f64",
            Value::Str(_) => "str",
            Value::Seq(_) => "seq",
            Value::Map(_) => "map",
            Value::Path(_) => "std::path::Path",
            Value::Error { type_name, .. }
            | Value::Display { type_name, .. }
            | Value::Debug { type_name, .. } => type_name,
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(v) => fmt::Display::fmt(v, f),
            Value::Char(v) => fmt::Display::fmt(v, f),
            Value::I64(v) => fmt::Display::fmt(v, f),
            Value::U64(v) => fmt::Display::fmt(v, f),
            Value::F64(v) => fmt::Display::fmt(v, f),
            Value::Str(v) => f.write_str(v),
            Value::Seq(values) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    fmt::Display::fmt(value, f)?;
                }
                f.write_str("]")
            }
            Value::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            Value::Path(path) => fmt::Display::fmt(&path.display(), f),
            Value::Error { error, .. } => fmt::Display::fmt(error, f),
            Value::Display { value, .. } => fmt::Display::fmt(value, f),
            Value::Debug { value, .. } => fmt::Debug::fmt(value, f),
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value<{}>({self})", self.type_name())
    }
}

macro_rules! impl_from_primitive {
    ($variant:ident, $target:ty, $($ty:ty),+) => {
        $(
            impl From<$ty> for Value<'_> {
                fn from(v: $ty) -> Self {
                    Value::$variant(v as $target)
                }
            }

            impl From<&$ty> for Value<'_> {
                fn from(v: &$ty) -> Self {
                    Value::$variant(*v as $target)
                }
            }
        )+
    };
}

impl_from_primitive!(I64, i64, i8, i16, i32, i64, isize);
impl_from_primitive!(U64, u64, u8, u16, u32, u64, usize);
impl_from_primitive!(F64, f64, f32, f64);
impl_from_primitive!(Bool, bool, bool);
impl_from_primitive!(Char, char, char);

impl<'a> From<&'a str> for Value<'a> {
    fn from(v: &'a str) -> Self {
        Value::Str(Cow::Borrowed(v))
    }
}

impl<'a, 'b: 'a> From<&'a &'b str> for Value<'a> {
    fn from(v: &'a &'b str) -> Self {
        Value::Str(Cow::Borrowed(*v))
    }
}

impl From<String> for Value<'_> {
    fn from(v: String) -> Self {
        Value::Str(Cow::Owned(v))
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(v: &'a String) -> Self {
        Value::Str(Cow::Borrowed(v.as_str()))
    }
}

impl<'a> From<Cow<'a, str>> for Value<'a> {
    fn from(v: Cow<'a, str>) -> Self {
        Value::Str(v)
    }
}

impl<'a> From<&'a Path> for Value<'a> {
    fn from(v: &'a Path) -> Self {
        Value::Path(v)
    }
}

impl<'a> From<&'a PathBuf> for Value<'a> {
    fn from(v: &'a PathBuf) -> Self {
        Value::Path(v.as_path())
    }
}

impl<'a, 'b: 'a> From<&'a Value<'b>> for Value<'a> {
    fn from(v: &'a Value<'b>) -> Self {
        v.clone()
    }
}

impl<'a, T: Into<Value<'a>>> From<Option<T>> for Value<'a> {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl<'a, T: Clone + Into<Value<'a>>> From<&'a [T]> for Value<'a> {
    fn from(v: &'a [T]) -> Self {
        Value::Seq(v.iter().cloned().map(Into::into).collect())
    }
}

impl<'a, T: Clone + Into<Value<'a>>, const N: usize> From<&'a [T; N]> for Value<'a> {
    fn from(v: &'a [T; N]) -> Self {
        Value::from(v.as_slice())
    }
}

impl<'a, T: Into<Value<'a>>, const N: usize> From<[T; N]> for Value<'a> {
    fn from(v: [T; N]) -> Self {
        Value::Seq(v.into_iter().map(Into::into).collect())
    }
}

impl<'a, T: Clone + Into<Value<'a>>> From<&'a Vec<T>> for Value<'a> {
    fn from(v: &'a Vec<T>) -> Self {
        Value::from(v.as_slice())
    }
}

impl<'a, T: Into<Value<'a>>> From<Vec<T>> for Value<'a> {
    fn from(v: Vec<T>) -> Self {
        Value::Seq(v.into_iter().map(Into::into).collect())
    }
}

impl<'a, K, V> From<&'a BTreeMap<K, V>> for Value<'a>
where
    K: Clone + Into<Value<'a>>,
    V: Clone + Into<Value<'a>>,
{
    fn from(v: &'a BTreeMap<K, V>) -> Self {
        Value::Map(
            v.iter()
                .map(|(k, v)| (k.clone().into(), v.clone().into()))
                .collect(),
        )
    }
}

impl<'a, K, V, S> From<&'a HashMap<K, V, S>> for Value<'a>
where
    K: Clone + Into<Value<'a>>,
    V: Clone + Into<Value<'a>>,
{
    fn from(v: &'a HashMap<K, V, S>) -> Self {
        Value::Map(
            v.iter()
                .map(|(k, v)| (k.clone().into(), v.clone().into()))
                .collect(),
        )
    }
}
