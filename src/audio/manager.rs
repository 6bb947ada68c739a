use anyhow::{Context, Result};
use jack::{AsyncClient, Client, ClientOptions};
use log::{error, info, warn};
use std::sync::Arc;

use crate::audio::engine::{Engine, EngineHandle};
use crate::audio::jack::{NotificationHandler, ProcessHandler};
use crate::audio::ports::{IN_PORT, OUT_PORT_LEFT, OUT_PORT_RIGHT};
use crate::fx::{ProcessorConfig, Registry};
use crate::settings::{AudioSettings, Settings};

/// Owns the running JACK client and the control side of the engine.
pub struct Manager {
    active_client: AsyncClient<NotificationHandler, ProcessHandler>,
    engine_handle: EngineHandle,
    settings: AudioSettings,
}

impl Manager {
    pub fn new(settings: &Settings, registry: Arc<Registry>) -> Result<Self> {
        let (client, _) = Client::new(&settings.audio.client_name, ClientOptions::NO_START_SERVER)
            .context("failed to create JACK client")?;

        let sample_rate = client.sample_rate();
        let buffer_size = client.buffer_size();
        info!(
            "Sample rate: {sample_rate}, Buffer frames: {buffer_size}, Calls p/s: {}",
            sample_rate as f32 / buffer_size as f32
        );

        let config = ProcessorConfig::new(sample_rate as usize, 1).context("invalid JACK session")?;
        let (engine, engine_handle) = Engine::new(config, registry);
        let jack_handler =
            ProcessHandler::new(&client, engine).context("failed to create process handler")?;

        let active_client = client
            .activate_async(NotificationHandler, jack_handler)
            .context("failed to activate async client")?;

        let manager = Self {
            active_client,
            engine_handle,
            settings: settings.audio.clone(),
        };

        manager.connect_ports();

        Ok(manager)
    }

    fn own_port(&self, port: &str) -> String {
        format!("{}:{port}", self.active_client.as_client().name())
    }

    /// Connect audio ports based on settings. Failures are logged, not fatal.
    fn connect_ports(&self) {
        let client = self.active_client.as_client();
        let connections = [
            (self.settings.input_port.clone(), self.own_port(IN_PORT)),
            (self.own_port(OUT_PORT_LEFT), self.settings.output_left_port.clone()),
            (self.own_port(OUT_PORT_RIGHT), self.settings.output_right_port.clone()),
        ];

        for (source, destination) in connections {
            if let Err(e) = client.connect_ports_by_name(&source, &destination) {
                warn!("Failed to connect '{source}' -> '{destination}': {e}");
            } else {
                info!("Connected {source} -> {destination}");
            }
        }
    }

    /// Disconnect all audio connections
    pub fn disconnect_all(&self) {
        let client = self.active_client.as_client();

        for port in [IN_PORT, OUT_PORT_LEFT, OUT_PORT_RIGHT] {
            let name = self.own_port(port);
            if let Some(port) = client.port_by_name(&name) {
                client.disconnect(&port).unwrap_or_else(|e| {
                    error!("Failed to disconnect {name}: {e}");
                });
            }
        }
    }

    pub fn engine(&self) -> &EngineHandle {
        &self.engine_handle
    }

    pub fn sample_rate(&self) -> usize {
        self.active_client.as_client().sample_rate() as usize
    }

    pub fn buffer_size(&self) -> usize {
        self.active_client.as_client().buffer_size() as usize
    }
}
