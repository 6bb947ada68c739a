use crossbeam::channel::{Receiver, unbounded};
use log::{debug, error};
use std::io::{self, BufRead};
use std::thread;

use crate::control::{Command, SelectionSource, parse_command};

/// Reads commands from stdin, one per line, on a background thread.
///
/// Blocking reads stay on the reader thread; `poll` only drains what has
/// already arrived. Lines that are not commands are skipped.
pub struct StdinSource {
    rx: Receiver<Command>,
}

impl StdinSource {
    pub fn spawn() -> Self {
        Self::from_reader(io::BufReader::new(io::stdin()))
    }

    pub fn from_reader<R>(reader: R) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = unbounded();

        thread::spawn(move || {
            for line in reader.lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        error!("Failed to read input: {e}");
                        break;
                    }
                };

                match parse_command(&line) {
                    Some(command) => {
                        if tx.send(command).is_err() {
                            break; // receiver dropped
                        }
                    }
                    None => debug!("Ignoring input {line:?}"),
                }
            }
        });

        Self { rx }
    }
}

impl SelectionSource for StdinSource {
    fn poll(&mut self) -> Option<Command> {
        self.rx.try_recv().ok()
    }
}
