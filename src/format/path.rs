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

use std::fs;
use std::fs::OpenOptions;
use std::io;
use std::path::Path;

use url::Url;

use crate::Value;
use crate::format::ArgumentFormatter;
use crate::format::UNAVAILABLE;

/// Operations on file system paths.
///
/// Supported operations: `canExecute`, `canRead`, `canWrite`, `content`, `exists`, `length`,
/// `uri`, `absolutePath` and `canonicalPath`. These read the file system; failures render
/// [`UNAVAILABLE`], `false` or `0` rather than propagating.
#[derive(Debug, Default, Clone, Copy)]
pub struct PathFormatter;

impl ArgumentFormatter for PathFormatter {
    fn format(&self, value: &Value<'_>, operation: &str) -> Option<String> {
        let Value::Path(path) = value else {
            return None;
        };

        let formatted = match operation {
            "canExecute" => can_execute(path).to_string(),
            "canRead" => fs::File::open(path).is_ok().to_string(),
            "canWrite" => can_write(path).to_string(),
            "content" => fs::read_to_string(path).unwrap_or_else(|_| UNAVAILABLE.to_string()),
            "exists" => path.exists().to_string(),
            "length" => fs::metadata(path)
                .map(|m| m.len())
                .unwrap_or_default()
                .to_string(),
            "uri" => std::path::absolute(path)
                .ok()
                .and_then(|path| Url::from_file_path(path).ok())
                .map_or_else(|| UNAVAILABLE.to_string(), String::from),
            "absolutePath" => match std::path::absolute(path) {
                Ok(path) => path.display().to_string(),
                Err(_) => UNAVAILABLE.to_string(),
            },
            "canonicalPath" => match fs::canonicalize(path) {
                Ok(path) => path.display().to_string(),
                Err(_) => UNAVAILABLE.to_string(),
            },
            _ => return None,
        };

        Some(formatted)
    }
}

fn can_write(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_dir() => check_writable_dir(path).is_ok(),
        // never create or truncate the file
        Ok(_) => OpenOptions::new().append(true).open(path).is_ok(),
        Err(_) => false,
    }
}

/// Create and remove a temporary file in `dir`.
pub(crate) fn check_writable_dir(dir: &Path) -> io::Result<()> {
    tempfile::NamedTempFile::new_in(dir)?.close()
}

#[cfg(unix)]
fn can_execute(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn can_execute(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("exe"))
        && path.is_file()
}
