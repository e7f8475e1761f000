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
use std::path::Path;
use std::path::PathBuf;

use jiff::tz::TimeZone;

use crate::DefaultTrap;
use crate::Error;
use crate::ErrorKind;
use crate::Level;
use crate::Trap;
use crate::sink::Console;

/// The environment variable naming the log file directory.
pub const OUTPUT_DIRECTORY_ENV: &str = "LOGTIDE_OUTPUT_DIRECTORY";

/// The environment variable naming the minimum enabled level.
pub const LEVEL_ENV: &str = "LOGTIDE_LEVEL";

/// The output directory value that disables file output.
pub const DISABLED_OUTPUT_DIRECTORY: &str = "<none>";

/// Configuration of [`SimpleLoggerManager`](crate::simple::SimpleLoggerManager).
///
/// The defaults write [`Level::Info`] and above to stderr, with no file output.
///
/// # Examples
///
/// ```
/// use logtide::Level;
/// use logtide::simple::SimpleConfig;
///
/// let config = SimpleConfig::new()
///     .level(Level::Debug)
///     .output_directory(std::env::temp_dir())
///     .file_prefix("my-service");
/// ```
#[derive(Debug)]
pub struct SimpleConfig {
    pub(crate) output_directory: Option<PathBuf>,
    pub(crate) level: Level,
    pub(crate) console: Console,
    pub(crate) file_prefix: Option<String>,
    pub(crate) time_zone: TimeZone,
    pub(crate) trap: Box<dyn Trap>,
}

impl Default for SimpleConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SimpleConfig {
    /// Create a configuration with the defaults.
    pub fn new() -> Self {
        Self {
            output_directory: None,
            level: Level::Info,
            console: Console::default(),
            file_prefix: None,
            time_zone: TimeZone::system(),
            trap: Box::new(DefaultTrap::default()),
        }
    }

    /// Resolve the configuration from the process environment.
    ///
    /// * [`OUTPUT_DIRECTORY_ENV`]: the log file directory. Defaults to the platform temporary
    ///   directory; [`DISABLED_OUTPUT_DIRECTORY`] disables file output.
    /// * [`LEVEL_ENV`]: the minimum enabled level, case-insensitive. Defaults to `INFO`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidLevel`] if the level cannot be parsed.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Resolve the configuration from `lookup` instead of the process environment.
    ///
    /// # Examples
    ///
    /// ```
    /// use logtide::Level;
    /// use logtide::simple::SimpleConfig;
    ///
    /// let config = SimpleConfig::from_env_with(|name| match name {
    ///     "LOGTIDE_LEVEL" => Some("warn".to_string()),
    ///     "LOGTIDE_OUTPUT_DIRECTORY" => Some("<none>".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    /// assert_eq!(config.get_level(), Level::Warn);
    /// assert_eq!(config.get_output_directory(), None);
    /// ```
    pub fn from_env_with<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let output_directory = match lookup(OUTPUT_DIRECTORY_ENV) {
            Some(dir) if dir.trim() == DISABLED_OUTPUT_DIRECTORY => None,
            Some(dir) if !dir.trim().is_empty() => Some(PathBuf::from(dir.trim())),
            _ => Some(std::env::temp_dir()),
        };

        let level = match lookup(LEVEL_ENV) {
            Some(level) => level
                .parse::<Level>()
                .map_err(|err| err.with_context("variable", LEVEL_ENV))?,
            None => Level::Info,
        };

        let mut config = Self::new().level(level);
        config.output_directory = output_directory;
        Ok(config)
    }

    /// Write log files to `dir`.
    #[must_use]
    pub fn output_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_directory = Some(dir.into());
        self
    }

    /// Disable file output.
    #[must_use]
    pub fn no_output_directory(mut self) -> Self {
        self.output_directory = None;
        self
    }

    /// Set the minimum enabled level.
    #[must_use]
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set the console destination.
    #[must_use]
    pub fn console(mut self, console: Console) -> Self {
        self.console = console;
        self
    }

    /// Set the log file name prefix. Defaults to `<executable name>-<process id>`.
    #[must_use]
    pub fn file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = Some(prefix.into());
        self
    }

    /// Set the time zone used for timestamps and for detecting the day change.
    #[must_use]
    pub fn time_zone(mut self, time_zone: TimeZone) -> Self {
        self.time_zone = time_zone;
        self
    }

    /// Set the trap that receives internal errors.
    #[must_use]
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    /// The configured output directory, if file output is enabled.
    pub fn get_output_directory(&self) -> Option<&Path> {
        self.output_directory.as_deref()
    }

    /// The configured minimum level.
    pub fn get_level(&self) -> Level {
        self.level
    }
}

/// Make `dir` absolute, create it if missing, and check that it is a writable directory.
pub(crate) fn validate_output_directory(dir: &Path) -> Result<PathBuf, Error> {
    let invalid = |message: &str| {
        Error::new(ErrorKind::InvalidOutputDirectory, message).with_context("dir", dir.display())
    };

    let dir = std::path::absolute(dir)
        .map_err(|err| invalid("failed to resolve output directory").with_source(err))?;
    fs::create_dir_all(&dir)
        .map_err(|err| invalid("failed to create output directory").with_source(err))?;

    let metadata = fs::metadata(&dir)
        .map_err(|err| invalid("failed to read output directory").with_source(err))?;
    if !metadata.is_dir() {
        return Err(invalid("output directory is not a directory"));
    }
    crate::format::check_writable_dir(&dir)
        .map_err(|err| invalid("output directory is not writable").with_source(err))?;
    Ok(dir)
}

pub(crate) fn default_file_prefix() -> String {
    let name = std::env::current_exe()
        .ok()
        .and_then(|exe| {
            exe.file_stem()
                .and_then(|stem| stem.to_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "logtide".to_string());
    format!("{name}-{}", std::process::id())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tempfile::NamedTempFile;
    use tempfile::TempDir;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_env_defaults() {
        let config = SimpleConfig::from_env_with(lookup(&[])).unwrap();
        assert_eq!(config.get_level(), Level::Info);
        assert_eq!(
            config.get_output_directory(),
            Some(std::env::temp_dir().as_path())
        );
    }

    #[test]
    fn test_env_values() {
        let config = SimpleConfig::from_env_with(lookup(&[
            (LEVEL_ENV, " Trace "),
            (OUTPUT_DIRECTORY_ENV, "/var/log/app"),
        ]))
        .unwrap();
        assert_eq!(config.get_level(), Level::Trace);
        assert_eq!(
            config.get_output_directory(),
            Some(Path::new("/var/log/app"))
        );

        let config =
            SimpleConfig::from_env_with(lookup(&[(OUTPUT_DIRECTORY_ENV, "<none>")])).unwrap();
        assert_eq!(config.get_output_directory(), None);
    }

    #[test]
    fn test_env_invalid_level() {
        let err = SimpleConfig::from_env_with(lookup(&[(LEVEL_ENV, "verbose")])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidLevel);
        assert_eq!(err.context("variable"), Some(LEVEL_ENV));
    }

    #[test]
    fn test_validate_creates_missing_directory() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let dir = temp_dir.path().join("nested").join("logs");
        let validated = validate_output_directory(&dir).unwrap();
        assert!(validated.is_absolute());
        assert!(validated.is_dir());
    }

    #[test]
    fn test_validate_rejects_file() {
        let file = NamedTempFile::new().unwrap();
        let err = validate_output_directory(file.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOutputDirectory);
    }

    #[cfg(unix)]
    #[test]
    fn test_validate_rejects_unwritable_directory() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let dir = temp_dir.path().join("locked");
        fs::create_dir(&dir).unwrap();
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o555)).unwrap();

        // privileged users write through the mode bits, which leaves nothing to reject
        let writable = fs::write(dir.join("check"), b"").is_ok();
        let result = validate_output_directory(&dir);
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o755)).unwrap();

        if writable {
            assert!(result.is_ok());
        } else {
            let err = result.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidOutputDirectory);
            assert_eq!(err.message(), "output directory is not writable");
        }
    }

    #[test]
    fn test_default_file_prefix_has_pid() {
        let prefix = default_file_prefix();
        assert!(prefix.ends_with(&format!("-{}", std::process::id())));
    }
}
