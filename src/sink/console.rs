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

use std::fmt;
use std::io;
use std::io::Write;
use std::sync::Mutex;
use std::sync::PoisonError;

/// The console destination of the reference backend.
///
/// Console output is written on the calling thread, one raw message per line.
pub enum Console {
    /// Print to stdout.
    Stdout,
    /// Print to stderr.
    Stderr,
    /// Print to an arbitrary writer, such as a buffer captured by a test.
    Writer(Mutex<Box<dyn Write + Send>>),
}

impl Default for Console {
    fn default() -> Self {
        Console::Stderr
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Console::Stdout => f.write_str("Stdout"),
            Console::Stderr => f.write_str("Stderr"),
            Console::Writer(_) => f.write_str("Writer"),
        }
    }
}

impl Console {
    /// Create a console that prints to `writer`.
    pub fn writer(writer: impl Write + Send + 'static) -> Self {
        Console::Writer(Mutex::new(Box::new(writer)))
    }

    /// Write `text` followed by a newline.
    pub fn write_line(&self, text: &str) -> io::Result<()> {
        match self {
            Console::Stdout => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{text}")
            }
            Console::Stderr => {
                let mut stderr = io::stderr().lock();
                writeln!(stderr, "{text}")
            }
            Console::Writer(writer) => {
                let mut writer = writer.lock().unwrap_or_else(PoisonError::into_inner);
                writeln!(writer, "{text}")?;
                writer.flush()
            }
        }
    }

    /// Flush the destination.
    pub fn flush(&self) -> io::Result<()> {
        match self {
            Console::Stdout => io::stdout().flush(),
            Console::Stderr => io::stderr().flush(),
            Console::Writer(writer) => writer
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .flush(),
        }
    }
}
