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

//! The sinks of the reference backend: a synchronous console and a single-writer pipeline that
//! appends to day-rotated files.

use std::io;
use std::io::Write;
use std::sync::Arc;

use jiff::Timestamp;
use jiff::tz::TimeZone;

use crate::Level;

mod console;
mod pipeline;
mod rolling;
mod worker;

pub use self::console::Console;
pub use self::pipeline::Pipeline;
pub use self::pipeline::PipelineBuilder;
pub use self::rolling::RollingFileWriter;

/// Separates the fields of a file line.
pub const FIELD_DELIMITER: &str = "::";

/// The `strftime` format of the timestamp field.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S.%3f";

/// The `strftime` format of the date in a log file name.
pub const FILE_DATE_FORMAT: &str = "%Y-%m-%d";

/// A rendered event on its way to a log file.
#[derive(Clone, Debug)]
pub struct LogEvent {
    pub sequence: u64,
    pub level: Level,
    pub timestamp: Timestamp,
    pub channel: Arc<str>,
    pub text: String,
}

impl LogEvent {
    /// Write the event as one or more file lines.
    ///
    /// Every physical line of the text repeats the full prefix. Empty lines are skipped, but an
    /// empty text still produces one line holding only the prefix.
    ///
    /// # Examples
    ///
    /// ```
    /// use jiff::Timestamp;
    /// use jiff::tz::TimeZone;
    /// use logtide::Level;
    /// use logtide::sink::LogEvent;
    ///
    /// let event = LogEvent {
    ///     sequence: 26,
    ///     level: Level::Warn,
    ///     timestamp: "2024-03-04T05:06:07.089Z".parse::<Timestamp>().unwrap(),
    ///     channel: "app".into(),
    ///     text: "disk\nfull".to_string(),
    /// };
    ///
    /// let mut out = Vec::new();
    /// event.write_lines(&TimeZone::UTC, &mut out).unwrap();
    /// assert_eq!(
    ///     String::from_utf8(out).unwrap(),
    ///     "000000000000001a::WARN ::2024-03-04 05:06:07.089::app::disk\n\
    ///      000000000000001a::WARN ::2024-03-04 05:06:07.089::app::full\n"
    /// );
    /// ```
    pub fn write_lines(&self, tz: &TimeZone, out: &mut impl Write) -> io::Result<()> {
        let prefix = self.prefix(tz);

        let mut written = false;
        for line in self.text.lines().filter(|line| !line.is_empty()) {
            writeln!(out, "{prefix}{line}")?;
            written = true;
        }
        if !written {
            writeln!(out, "{prefix}")?;
        }
        Ok(())
    }

    fn prefix(&self, tz: &TimeZone) -> String {
        let time = self.timestamp.to_zoned(tz.clone());
        format!(
            "{sequence:016x}{d}{level:<5}{d}{time}{d}{channel}{d}",
            sequence = self.sequence,
            level = self.level,
            time = time.strftime(TIMESTAMP_FORMAT),
            channel = self.channel,
            d = FIELD_DELIMITER,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(text: &str) -> LogEvent {
        LogEvent {
            sequence: u64::MAX,
            level: Level::Info,
            timestamp: "2024-01-01T00:00:00Z".parse().unwrap(),
            channel: "svc.db".into(),
            text: text.to_string(),
        }
    }

    fn lines(event: &LogEvent) -> String {
        let mut out = vec![];
        event.write_lines(&TimeZone::UTC, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_prefix_fields() {
        assert_eq!(
            lines(&event("ready")),
            "ffffffffffffffff::INFO ::2024-01-01 00:00:00.000::svc.db::ready\n"
        );
    }

    #[test]
    fn test_multi_line_text_repeats_prefix() {
        let out = lines(&event("a\r\n\nb\n"));
        let prefix = "ffffffffffffffff::INFO ::2024-01-01 00:00:00.000::svc.db::";
        assert_eq!(out, format!("{prefix}a\n{prefix}b\n"));
    }

    #[test]
    fn test_empty_text_writes_prefix_only() {
        let out = lines(&event(""));
        assert_eq!(
            out,
            "ffffffffffffffff::INFO ::2024-01-01 00:00:00.000::svc.db::\n"
        );
    }
}
