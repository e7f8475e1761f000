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

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::Receiver;
use crossbeam_channel::RecvError;
use crossbeam_channel::Sender;
use crossbeam_channel::TryRecvError;

use crate::Trap;
use crate::sink::LogEvent;
use crate::sink::RollingFileWriter;

#[derive(Debug)]
pub(crate) enum Message {
    Event(LogEvent),
    Flush(Sender<()>),
    Redirect { dir: PathBuf, prefix: String },
}

/// The only owner of the rolling file. It drains the queue in arrival order.
pub(crate) struct Worker {
    writer: RollingFileWriter,
    receiver: Receiver<Message>,
    trap: Arc<dyn Trap>,
    acks: Vec<Sender<()>>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum WorkerState {
    Empty,
    Disconnected,
    Continue,
}

impl Worker {
    pub(crate) fn new(
        mut writer: RollingFileWriter,
        receiver: Receiver<Message>,
        trap: Arc<dyn Trap>,
    ) -> Worker {
        writer.set_trap(trap.clone());
        Self {
            writer,
            receiver,
            trap,
            acks: vec![],
        }
    }

    fn handle(&mut self, message: Message) {
        match message {
            Message::Event(event) => {
                if let Err(err) = self.writer.write_event(&event) {
                    self.trap.trap(&err.with_context("sequence", event.sequence));
                }
            }
            Message::Flush(ack) => self.acks.push(ack),
            Message::Redirect { dir, prefix } => {
                if let Err(err) = self.writer.redirect(dir, prefix) {
                    self.trap.trap(&err);
                }
            }
        }
    }

    fn recv(&mut self) -> WorkerState {
        match self.receiver.recv() {
            Ok(message) => {
                self.handle(message);
                WorkerState::Continue
            }
            Err(RecvError) => WorkerState::Disconnected,
        }
    }

    fn try_recv(&mut self) -> WorkerState {
        match self.receiver.try_recv() {
            Ok(message) => {
                self.handle(message);
                WorkerState::Continue
            }
            Err(TryRecvError::Empty) => WorkerState::Empty,
            Err(TryRecvError::Disconnected) => WorkerState::Disconnected,
        }
    }

    /// Block for one message, then take whatever else is queued, then flush.
    fn work(&mut self) -> WorkerState {
        let mut worker_state = self.recv();

        while worker_state == WorkerState::Continue {
            worker_state = self.try_recv();
        }

        if let Err(err) = self.writer.flush() {
            self.trap.trap(&err);
        }
        for ack in self.acks.drain(..) {
            let _ = ack.send(());
        }
        worker_state
    }

    pub(crate) fn make_thread(mut self, name: String) -> io::Result<JoinHandle<()>> {
        std::thread::Builder::new().name(name).spawn(move || {
            while self.work() != WorkerState::Disconnected {}

            if let Err(err) = self.writer.close() {
                self.trap.trap(&err);
            }
        })
    }
}
