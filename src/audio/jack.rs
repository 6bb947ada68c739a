use anyhow::{Context, Result};
use jack::Client;
use log::{debug, error, warn};

use crate::audio::engine::Engine;
use crate::audio::ports::Ports;

pub struct NotificationHandler;

pub struct ProcessHandler {
    ports: Ports,
    engine: Engine,
}

impl jack::NotificationHandler for NotificationHandler {
    fn sample_rate(&mut self, _: &Client, sample_rate: jack::Frames) -> jack::Control {
        // Processors are sized for the rate they were built with.
        warn!(">> JACK sample_rate changed to {sample_rate}, effects keep the rate they were built with");

        jack::Control::Continue
    }
}

impl ProcessHandler {
    pub fn new(client: &Client, engine: Engine) -> Result<Self> {
        let ports = Ports::new(client).context("failed to create audio ports")?;

        Ok(Self { ports, engine })
    }
}

impl jack::ProcessHandler for ProcessHandler {
    fn process(&mut self, _client: &jack::Client, ps: &jack::ProcessScope) -> jack::Control {
        let engine = &mut self.engine;

        if let Err(e) = self
            .ports
            .process_with(ps, |input, output| engine.process_f32(input, output))
        {
            error!("Audio processing error: {}", e);
            self.ports.silence_output(ps);
        }

        jack::Control::Continue
    }

    fn buffer_size(&mut self, _client: &jack::Client, frames: jack::Frames) -> jack::Control {
        // Block size is irrelevant to per-sample processing.
        debug!(">> JACK buffer_size changed to {frames} frames");
        jack::Control::Continue
    }
}
