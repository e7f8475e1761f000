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

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::thread::JoinHandle;

use crossbeam_channel::Sender;
use crossbeam_channel::bounded;
use crossbeam_channel::unbounded;
use jiff::Timestamp;

use crate::DefaultTrap;
use crate::Error;
use crate::ErrorKind;
use crate::Level;
use crate::Trap;
use crate::sink::LogEvent;
use crate::sink::RollingFileWriter;
use crate::sink::worker::Message;
use crate::sink::worker::Worker;

/// A single-writer queue in front of a [`RollingFileWriter`].
///
/// Callers enqueue events without touching the file; a dedicated worker thread writes them in
/// queue order. Each event gets the next value of one sequence counter in the same critical
/// section that enqueues it, so the file holds a contiguous, increasing run of sequence numbers.
/// The counter wraps to zero after `u64::MAX`.
///
/// Dropping the pipeline shuts it down.
#[derive(Debug)]
pub struct Pipeline {
    intake: Mutex<Option<Intake>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    trap: Arc<dyn Trap>,
}

#[derive(Debug)]
struct Intake {
    sender: Sender<Message>,
    next_sequence: u64,
}

impl Pipeline {
    /// Create a [`PipelineBuilder`] around `writer`.
    #[must_use]
    pub fn builder(writer: RollingFileWriter) -> PipelineBuilder {
        PipelineBuilder::new(writer)
    }

    /// Stamp a new event with the current time and the next sequence number, and queue it.
    ///
    /// Returns the assigned sequence number.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::PipelineClosed`] after [`Pipeline::shutdown`].
    pub fn enqueue(
        &self,
        level: Level,
        channel: Arc<str>,
        text: impl Into<String>,
    ) -> Result<u64, Error> {
        let mut guard = self.intake.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(intake) = guard.as_mut() else {
            return Err(closed());
        };

        let sequence = intake.next_sequence;
        let event = LogEvent {
            sequence,
            level,
            timestamp: Timestamp::now(),
            channel,
            text: text.into(),
        };
        intake
            .sender
            .send(Message::Event(event))
            .map_err(|_| closed())?;
        intake.next_sequence = sequence.wrapping_add(1);
        Ok(sequence)
    }

    /// Close the current file and write events queued after this call to `dir`, with file names
    /// starting with `prefix`. The sequence counter carries on.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::PipelineClosed`] after [`Pipeline::shutdown`].
    pub fn redirect(
        &self,
        dir: impl Into<PathBuf>,
        prefix: impl Into<String>,
    ) -> Result<(), Error> {
        let guard = self.intake.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(intake) = guard.as_ref() else {
            return Err(closed());
        };

        let message = Message::Redirect {
            dir: dir.into(),
            prefix: prefix.into(),
        };
        intake.sender.send(message).map_err(|_| closed())
    }

    /// Block until every event queued before this call is written and flushed.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::PipelineClosed`] after [`Pipeline::shutdown`].
    pub fn flush(&self) -> Result<(), Error> {
        let sender = {
            let intake = self.intake.lock().unwrap_or_else(PoisonError::into_inner);
            match intake.as_ref() {
                Some(intake) => intake.sender.clone(),
                None => return Err(closed()),
            }
        };

        let (ack, done) = bounded(1);
        sender.send(Message::Flush(ack)).map_err(|_| closed())?;
        done.recv().map_err(|_| closed())
    }

    /// Stop accepting events, let the worker drain the queue and close the file, and wait for it.
    ///
    /// Calling this more than once is a no-op.
    pub fn shutdown(&self) {
        // Dropping the last sender disconnects the queue once it is drained.
        let intake = self
            .intake
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        drop(intake);

        let worker = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(worker) = worker {
            if worker.join().is_err() {
                let err = Error::new(ErrorKind::Io, "log file worker panicked");
                self.trap.trap(&err);
            }
        }
    }

    /// Returns `true` once [`Pipeline::shutdown`] has been called.
    pub fn is_shutdown(&self) -> bool {
        self.intake
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    #[cfg(test)]
    fn set_next_sequence(&self, sequence: u64) {
        let mut intake = self.intake.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(intake) = intake.as_mut() {
            intake.next_sequence = sequence;
        }
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn closed() -> Error {
    Error::new(ErrorKind::PipelineClosed, "the log file pipeline is shut down")
}

/// A builder for configuring [`Pipeline`].
#[derive(Debug)]
pub struct PipelineBuilder {
    writer: RollingFileWriter,
    thread_name: String,
    trap: Box<dyn Trap>,
}

impl PipelineBuilder {
    /// Create a builder around `writer`.
    pub fn new(writer: RollingFileWriter) -> Self {
        Self {
            writer,
            thread_name: "logtide-file-writer".to_string(),
            trap: Box::new(DefaultTrap::default()),
        }
    }

    /// Set the name of the worker thread.
    #[must_use]
    pub fn thread_name(mut self, thread_name: impl Into<String>) -> Self {
        self.thread_name = thread_name.into();
        self
    }

    /// Set the trap that receives write failures.
    #[must_use]
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    /// Spawn the worker thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn build(self) -> Result<Pipeline, Error> {
        let Self {
            writer,
            thread_name,
            trap,
        } = self;

        let trap: Arc<dyn Trap> = Arc::from(trap);
        let (sender, receiver) = unbounded();
        let worker = Worker::new(writer, receiver, trap.clone());
        let handle = worker
            .make_thread(thread_name)
            .map_err(|err| Error::from_io_error(err).with_context("thread", "file writer"))?;

        Ok(Pipeline {
            intake: Mutex::new(Some(Intake {
                sender,
                next_sequence: 0,
            })),
            worker: Mutex::new(Some(handle)),
            trap,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use std::path::PathBuf;

    use jiff::tz::TimeZone;
    use tempfile::TempDir;

    use super::*;

    fn pipeline(dir: &Path) -> Pipeline {
        let writer = RollingFileWriter::new(dir, "pipeline", TimeZone::UTC);
        Pipeline::builder(writer).build().unwrap()
    }

    fn read_lines(dir: &Path) -> Vec<String> {
        let files = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect::<Vec<PathBuf>>();
        let mut lines = vec![];
        for file in files {
            let contents = fs::read_to_string(file).unwrap();
            lines.extend(contents.lines().map(str::to_string));
        }
        lines
    }

    #[test]
    fn test_flush_makes_events_visible() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let pipeline = pipeline(temp_dir.path());

        assert_eq!(pipeline.enqueue(Level::Info, "a".into(), "one").unwrap(), 0);
        assert_eq!(pipeline.enqueue(Level::Warn, "a".into(), "two").unwrap(), 1);
        pipeline.flush().unwrap();

        let lines = read_lines(temp_dir.path());
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("0000000000000000::INFO ::"));
        assert!(lines[0].ends_with("::a::one"));
        assert!(lines[1].starts_with("0000000000000001::WARN ::"));
    }

    #[test]
    fn test_shutdown_drains_and_rejects_later_events() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let pipeline = pipeline(temp_dir.path());

        for i in 0..1000 {
            pipeline
                .enqueue(Level::Debug, "drain".into(), format!("event {i}"))
                .unwrap();
        }
        pipeline.shutdown();
        assert!(pipeline.is_shutdown());

        let lines = read_lines(temp_dir.path());
        assert_eq!(lines.len(), 1000);
        assert!(lines[999].ends_with("::event 999"));

        let err = pipeline
            .enqueue(Level::Error, "drain".into(), "late")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PipelineClosed);
        assert_eq!(pipeline.flush().unwrap_err().kind(), ErrorKind::PipelineClosed);

        pipeline.shutdown();
    }

    #[test]
    fn test_redirect_keeps_order_and_sequence() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let first = temp_dir.path().join("first");
        let second = temp_dir.path().join("second");
        let pipeline = pipeline(&first);

        pipeline.enqueue(Level::Info, "r".into(), "old").unwrap();
        pipeline.redirect(&second, "next").unwrap();
        assert_eq!(pipeline.enqueue(Level::Info, "r".into(), "new").unwrap(), 1);
        pipeline.shutdown();

        let old = read_lines(&first);
        assert_eq!(old.len(), 1);
        assert!(old[0].ends_with("::r::old"));

        let new = read_lines(&second);
        assert_eq!(new.len(), 1);
        assert!(new[0].starts_with("0000000000000001::"));
        assert!(new[0].ends_with("::r::new"));

        let err = pipeline.redirect(&first, "again").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PipelineClosed);
    }

    #[test]
    fn test_sequence_wraps_to_zero() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let pipeline = pipeline(temp_dir.path());
        pipeline.set_next_sequence(u64::MAX);

        assert_eq!(pipeline.enqueue(Level::Info, "w".into(), "max").unwrap(), u64::MAX);
        assert_eq!(pipeline.enqueue(Level::Info, "w".into(), "zero").unwrap(), 0);
        drop(pipeline);

        let lines = read_lines(temp_dir.path());
        assert!(lines[0].starts_with("ffffffffffffffff::"));
        assert!(lines[1].starts_with("0000000000000000::"));
    }
}
