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
use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use jiff::Zoned;
use jiff::civil::Weekday;
use jiff::tz::TimeZone;

use crate::DefaultTrap;
use crate::Error;
use crate::Trap;
use crate::sink::FILE_DATE_FORMAT;
use crate::sink::LogEvent;

/// A writer that appends events to a file per calendar day.
///
/// The first event opens a file; an event whose day of the week differs from the open file's
/// opens a new file and closes the previous one. File names have the form
/// `<prefix>.<yyyy-MM-dd>.<16 hex digits>.log`, where the hex suffix starts from the event time
/// in milliseconds and is bumped until the name does not exist yet. Existing files are never
/// overwritten.
///
/// Failures to close a file that is no longer current go to the writer's [`Trap`], since no
/// event is lost by them.
#[derive(Debug)]
pub struct RollingFileWriter {
    state: State,
    current: Option<Current>,
    trap: Arc<dyn Trap>,
}

#[derive(Debug)]
struct State {
    log_dir: PathBuf,
    log_filename_prefix: String,
    tz: TimeZone,
}

#[derive(Debug)]
struct Current {
    writer: BufWriter<File>,
    weekday: Weekday,
    path: PathBuf,
}

impl Current {
    fn close(mut self) -> Result<(), Error> {
        self.writer.flush().map_err(|err| {
            Error::from_io_error(err).with_context("path", self.path.display())
        })
    }
}

impl RollingFileWriter {
    /// Create a writer for `dir`. No file is opened until the first event arrives.
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>, tz: TimeZone) -> Self {
        Self {
            state: State {
                log_dir: dir.into(),
                log_filename_prefix: prefix.into(),
                tz,
            },
            current: None,
            trap: Arc::new(DefaultTrap::default()),
        }
    }

    /// Set the trap that receives failures to close a previous file.
    #[must_use]
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = Arc::from(trap.into());
        self
    }

    pub(crate) fn set_trap(&mut self, trap: Arc<dyn Trap>) {
        self.trap = trap;
    }

    /// The prefix of new file names.
    pub fn prefix(&self) -> &str {
        &self.state.log_filename_prefix
    }

    /// The directory files are written to.
    pub fn dir(&self) -> &Path {
        &self.state.log_dir
    }

    /// The path of the open file, if any.
    pub fn current_path(&self) -> Option<&Path> {
        self.current.as_ref().map(|current| current.path.as_path())
    }

    /// Append `event`, rolling over to a new file first if its day of the week changed.
    ///
    /// If the new file cannot be created the event is dropped, the previous file stays open,
    /// and the next event tries again. The returned result only reflects writing `event`.
    pub fn write_event(&mut self, event: &LogEvent) -> Result<(), Error> {
        let now = event.timestamp.to_zoned(self.state.tz.clone());

        let mut previous = None;
        let weekday = now.weekday();
        if self.should_rollover(weekday) {
            let next = self.state.create_log_writer(&now)?;
            previous = self.current.replace(next);
        }

        let written = match self.current.as_mut() {
            Some(current) => event
                .write_lines(&self.state.tz, &mut current.writer)
                .map_err(|err| {
                    Error::from_io_error(err).with_context("path", current.path.display())
                }),
            None => Ok(()),
        };

        if let Some(previous) = previous {
            if let Err(err) = previous.close() {
                self.trap.trap(&err);
            }
        }
        written
    }

    /// Flush the open file.
    pub fn flush(&mut self) -> Result<(), Error> {
        match self.current.as_mut() {
            Some(current) => current.writer.flush().map_err(|err| {
                Error::from_io_error(err).with_context("path", current.path.display())
            }),
            None => Ok(()),
        }
    }

    /// Flush and close the open file. The next event opens a new one.
    pub fn close(&mut self) -> Result<(), Error> {
        match self.current.take() {
            Some(current) => current.close(),
            None => Ok(()),
        }
    }

    /// Close the open file and write later events to `dir` with file names starting with
    /// `prefix`.
    ///
    /// The new directory is only created when the next event opens a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the open file cannot be flushed. The new settings apply regardless.
    pub fn redirect(
        &mut self,
        dir: impl Into<PathBuf>,
        prefix: impl Into<String>,
    ) -> Result<(), Error> {
        self.state.log_dir = dir.into();
        self.state.log_filename_prefix = prefix.into();
        self.close()
    }

    fn should_rollover(&self, weekday: Weekday) -> bool {
        self.current
            .as_ref()
            .is_none_or(|current| current.weekday != weekday)
    }
}

impl State {
    fn create_log_writer(&self, now: &Zoned) -> Result<Current, Error> {
        fs::create_dir_all(&self.log_dir).map_err(|err| {
            Error::from_io_error(err).with_context("dir", self.log_dir.display())
        })?;

        let date = now.strftime(FILE_DATE_FORMAT).to_string();
        let mut suffix = now.timestamp().as_millisecond() as u64;
        loop {
            let filename = format!("{}.{date}.{suffix:016x}.log", self.log_filename_prefix);
            let path = self.log_dir.join(filename);
            match OpenOptions::new().append(true).create_new(true).open(&path) {
                Ok(file) => {
                    return Ok(Current {
                        writer: BufWriter::new(file),
                        weekday: now.weekday(),
                        path,
                    });
                }
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                    suffix = suffix.wrapping_add(1);
                }
                Err(err) => {
                    return Err(Error::from_io_error(err).with_context("path", path.display()));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use jiff::Timestamp;
    use rand::Rng;
    use rand::distr::Alphanumeric;
    use tempfile::TempDir;

    use super::*;
    use crate::Level;

    // 2024-01-01 is a Monday.
    const MONDAY: &str = "2024-01-01T10:00:00Z";
    const MONDAY_LATE: &str = "2024-01-01T23:59:59.999Z";
    const TUESDAY: &str = "2024-01-02T00:00:00Z";

    fn event(sequence: u64, timestamp: &str, text: &str) -> LogEvent {
        LogEvent {
            sequence,
            level: Level::Info,
            timestamp: timestamp.parse::<Timestamp>().unwrap(),
            channel: Arc::from("rolling"),
            text: text.to_string(),
        }
    }

    fn random_text() -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect()
    }

    fn sorted_files(dir: &Path) -> Vec<PathBuf> {
        let mut files = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect::<Vec<_>>();
        files.sort();
        files
    }

    #[test]
    fn test_no_file_before_first_event() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let mut writer = RollingFileWriter::new(temp_dir.path(), "app", TimeZone::UTC);
        writer.flush().unwrap();
        writer.close().unwrap();

        assert!(writer.current_path().is_none());
        assert!(sorted_files(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_file_name_and_contents() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let mut writer = RollingFileWriter::new(temp_dir.path(), "app", TimeZone::UTC);

        let text = random_text();
        writer.write_event(&event(0, MONDAY, &text)).unwrap();
        writer.write_event(&event(1, MONDAY_LATE, "late")).unwrap();
        writer.close().unwrap();

        let files = sorted_files(temp_dir.path());
        assert_eq!(files.len(), 1);

        let millis = MONDAY.parse::<Timestamp>().unwrap().as_millisecond();
        let expected = format!("app.2024-01-01.{millis:016x}.log");
        assert_eq!(files[0].file_name().unwrap().to_str().unwrap(), expected);

        let contents = fs::read_to_string(&files[0]).unwrap();
        assert_eq!(
            contents,
            format!(
                "0000000000000000::INFO ::2024-01-01 10:00:00.000::rolling::{text}\n\
                 0000000000000001::INFO ::2024-01-01 23:59:59.999::rolling::late\n"
            )
        );
    }

    #[test]
    fn test_day_change_rolls_over_exactly_once() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let mut writer = RollingFileWriter::new(temp_dir.path(), "app", TimeZone::UTC);

        writer.write_event(&event(0, MONDAY, "m1")).unwrap();
        let monday = writer.current_path().unwrap().to_path_buf();
        writer.write_event(&event(1, MONDAY_LATE, "m2")).unwrap();
        assert_eq!(writer.current_path(), Some(monday.as_path()));

        writer.write_event(&event(2, TUESDAY, "t1")).unwrap();
        let tuesday = writer.current_path().unwrap().to_path_buf();
        assert_ne!(monday, tuesday);
        writer.write_event(&event(3, TUESDAY, "t2")).unwrap();
        assert_eq!(writer.current_path(), Some(tuesday.as_path()));
        writer.close().unwrap();

        assert_eq!(sorted_files(temp_dir.path()), vec![monday.clone(), tuesday.clone()]);
        let monday = fs::read_to_string(monday).unwrap();
        let tuesday = fs::read_to_string(tuesday).unwrap();
        assert_eq!(monday.lines().count(), 2);
        assert!(monday.lines().all(|line| line.starts_with("000000000000000")));
        assert!(tuesday.lines().next().unwrap().starts_with("0000000000000002::"));
        assert!(tuesday.lines().nth(1).unwrap().ends_with("::t2"));
    }

    #[test]
    fn test_existing_file_is_not_overwritten() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let millis = MONDAY.parse::<Timestamp>().unwrap().as_millisecond();
        let taken = temp_dir
            .path()
            .join(format!("app.2024-01-01.{millis:016x}.log"));
        fs::write(&taken, "keep me\n").unwrap();

        let mut writer = RollingFileWriter::new(temp_dir.path(), "app", TimeZone::UTC);
        writer.write_event(&event(0, MONDAY, "new")).unwrap();
        let path = writer.current_path().unwrap().to_path_buf();
        writer.close().unwrap();

        assert_ne!(path, taken);
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            format!("app.2024-01-01.{:016x}.log", millis + 1)
        );
        assert_eq!(fs::read_to_string(taken).unwrap(), "keep me\n");
    }

    #[test]
    fn test_redirect_closes_the_open_file() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let first = temp_dir.path().join("first");
        let second = temp_dir.path().join("second");
        let mut writer = RollingFileWriter::new(&first, "app", TimeZone::UTC);

        writer.write_event(&event(0, MONDAY, "before")).unwrap();
        writer.redirect(&second, "moved").unwrap();
        assert!(writer.current_path().is_none());
        assert_eq!(writer.dir(), second.as_path());
        assert_eq!(writer.prefix(), "moved");

        // same day, still a new file
        writer.write_event(&event(1, MONDAY_LATE, "after")).unwrap();
        writer.close().unwrap();

        let old = sorted_files(&first);
        assert_eq!(old.len(), 1);
        assert!(fs::read_to_string(&old[0]).unwrap().ends_with("::before\n"));

        let new = sorted_files(&second);
        assert_eq!(new.len(), 1);
        let name = new[0].file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("moved.2024-01-01."));
        assert!(fs::read_to_string(&new[0]).unwrap().ends_with("::after\n"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_failed_close_on_rollover_is_trapped_apart_from_the_event() {
        #[derive(Debug, Default)]
        struct Collect(std::sync::Mutex<Vec<String>>);

        impl Trap for Collect {
            fn trap(&self, err: &Error) {
                let path = err.context("path").unwrap_or_default().to_string();
                self.0.lock().unwrap().push(path);
            }
        }

        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let trap = Arc::new(Collect::default());
        let mut writer =
            RollingFileWriter::new(temp_dir.path(), "app", TimeZone::UTC).trap(trap.clone());

        // every flush of /dev/full fails with ENOSPC
        let full = PathBuf::from("/dev/full");
        let file = OpenOptions::new().write(true).open(&full).unwrap();
        writer.current = Some(Current {
            writer: BufWriter::new(file),
            weekday: Weekday::Monday,
            path: full,
        });
        writer.write_event(&event(0, MONDAY, "buffered")).unwrap();

        writer.write_event(&event(1, TUESDAY, "kept")).unwrap();
        let tuesday = writer.current_path().unwrap().to_path_buf();
        writer.close().unwrap();

        assert_eq!(*trap.0.lock().unwrap(), vec!["/dev/full".to_string()]);
        assert!(fs::read_to_string(tuesday).unwrap().ends_with("::kept\n"));
    }

    #[test]
    fn test_weekday_uses_configured_time_zone() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let tz = TimeZone::fixed(jiff::tz::offset(-5));
        let mut writer = RollingFileWriter::new(temp_dir.path(), "app", tz);

        // Both are still Monday at UTC-5.
        writer.write_event(&event(0, MONDAY, "a")).unwrap();
        writer.write_event(&event(1, "2024-01-02T04:59:59Z", "b")).unwrap();
        writer.close().unwrap();

        assert_eq!(sorted_files(temp_dir.path()).len(), 1);
    }
}
