use anyhow::{Context, Result};
use jack::{AudioIn, AudioOut, Client, Port, ProcessScope};

pub const IN_PORT: &str = "in_port";
pub const OUT_PORT_LEFT: &str = "out_port_left";
pub const OUT_PORT_RIGHT: &str = "out_port_right";

/// Mono input, mono signal duplicated to a stereo pair of outputs.
pub struct Ports {
    input: Port<AudioIn>,
    output_left: Port<AudioOut>,
    output_right: Port<AudioOut>,
}

impl Ports {
    pub fn new(client: &Client) -> Result<Self> {
        Ok(Self {
            input: client
                .register_port(IN_PORT, AudioIn::default())
                .context("failed to register in port")?,
            output_left: client
                .register_port(OUT_PORT_LEFT, AudioOut::default())
                .context("failed to register out port left")?,
            output_right: client
                .register_port(OUT_PORT_RIGHT, AudioOut::default())
                .context("failed to register out port right")?,
        })
    }

    /// Hand the input and left output buffers to `f`, then mirror left into right.
    pub fn process_with<F>(&mut self, ps: &ProcessScope, f: F) -> Result<()>
    where
        F: FnOnce(&[f32], &mut [f32]) -> Result<()>,
    {
        let input = self.input.as_slice(ps);
        let out_left = self.output_left.as_mut_slice(ps);
        f(input, out_left)?;

        let out_right = self.output_right.as_mut_slice(ps);
        out_right.copy_from_slice(out_left);
        Ok(())
    }

    pub fn silence_output(&mut self, ps: &ProcessScope) {
        self.output_left.as_mut_slice(ps).fill(0.0);
        self.output_right.as_mut_slice(ps).fill(0.0);
    }
}
