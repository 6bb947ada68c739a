//! Control path: turns user input into effect selections.
//!
//! Input arrives through a [`SelectionSource`], which is polled on the
//! control thread at a low rate. The only thing the control path ever
//! hands to the audio thread is a fully built processor, via
//! [`EngineHandle::select`].

pub mod stdin;

use anyhow::Result;
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crate::audio::engine::EngineHandle;

pub use stdin::StdinSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Select(usize),
    Quit,
}

/// Something the control loop can poll for user commands without blocking.
pub trait SelectionSource {
    fn poll(&mut self) -> Option<Command>;
}

/// Outcome of one controller step that the caller may want to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    Selected(usize),
    /// Key did not name an effect; the previous selection stays active.
    Ignored(usize),
    Quit,
}

/// Parse one line of user input. `q` quits, a number selects.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();

    if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
        return Some(Command::Quit);
    }

    line.parse().ok().map(Command::Select)
}

pub struct Controller<'a, S> {
    source: S,
    engine: &'a EngineHandle,
    poll_interval: Duration,
}

impl<'a, S: SelectionSource> Controller<'a, S> {
    pub fn new(source: S, engine: &'a EngineHandle, poll_interval: Duration) -> Self {
        Self {
            source,
            engine,
            poll_interval,
        }
    }

    /// Poll the source once and apply whatever it produced.
    pub fn step(&mut self) -> Result<Option<ControlEvent>> {
        self.engine.reclaim();

        let event = match self.source.poll() {
            None => None,
            Some(Command::Quit) => Some(ControlEvent::Quit),
            Some(Command::Select(index)) => {
                if self.engine.select(index)? {
                    Some(ControlEvent::Selected(index))
                } else {
                    Some(ControlEvent::Ignored(index))
                }
            }
        };

        Ok(event)
    }

    /// Keep polling until the source asks to quit or `running` is cleared.
    pub fn run<F>(&mut self, running: &AtomicBool, mut on_event: F) -> Result<()>
    where
        F: FnMut(ControlEvent),
    {
        debug!("Control loop polling every {:?}", self.poll_interval);

        while running.load(Ordering::SeqCst) {
            if let Some(event) = self.step()? {
                on_event(event);
                if event == ControlEvent::Quit {
                    info!("Quit requested");
                    break;
                }
            }
            thread::sleep(self.poll_interval);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::engine::Engine;
    use crate::fx::{ProcessorConfig, Registry};
    use std::collections::VecDeque;
    use std::sync::Arc;

    struct Scripted(VecDeque<Option<Command>>);

    impl SelectionSource for Scripted {
        fn poll(&mut self) -> Option<Command> {
            self.0.pop_front().flatten()
        }
    }

    fn engine() -> (Engine, EngineHandle) {
        let config = ProcessorConfig::new(8_000, 1).unwrap();
        Engine::new(config, Arc::new(Registry::catalog()))
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command("q"), Some(Command::Quit));
        assert_eq!(parse_command(" QUIT \n"), Some(Command::Quit));
        assert_eq!(parse_command("3"), Some(Command::Select(3)));
        assert_eq!(parse_command("12\n"), Some(Command::Select(12)));
        assert_eq!(parse_command("-1"), None);
        assert_eq!(parse_command("wah"), None);
        assert_eq!(parse_command(""), None);
    }

    #[test]
    fn step_applies_selection() {
        let (mut engine, handle) = engine();
        let script = Scripted(VecDeque::from([
            None,
            Some(Command::Select(6)),
            Some(Command::Select(40)),
        ]));
        let mut controller = Controller::new(script, &handle, Duration::ZERO);

        assert_eq!(controller.step().unwrap(), None);
        assert_eq!(controller.step().unwrap(), Some(ControlEvent::Selected(6)));
        assert_eq!(controller.step().unwrap(), Some(ControlEvent::Ignored(40)));
        assert_eq!(handle.selected_name(), "Fuzz");

        let mut output = [0.0];
        engine.process(&[1.0], &mut output).unwrap();
        assert_eq!(engine.active_name(), "Fuzz");
    }

    #[test]
    fn run_stops_on_quit() {
        let (_engine, handle) = engine();
        let script = Scripted(VecDeque::from([
            Some(Command::Select(1)),
            None,
            Some(Command::Quit),
            Some(Command::Select(2)),
        ]));
        let mut controller = Controller::new(script, &handle, Duration::ZERO);

        let running = AtomicBool::new(true);
        let mut events = Vec::new();
        controller.run(&running, |e| events.push(e)).unwrap();

        assert_eq!(events, vec![ControlEvent::Selected(1), ControlEvent::Quit]);
        assert_eq!(handle.selected(), 1);
    }

    #[test]
    fn run_returns_when_flag_cleared() {
        let (_engine, handle) = engine();
        let mut controller = Controller::new(Scripted(VecDeque::new()), &handle, Duration::ZERO);

        let running = AtomicBool::new(false);
        controller.run(&running, |_| panic!("no events expected")).unwrap();
    }
}
