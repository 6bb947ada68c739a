use anyhow::{Result, ensure};

use crate::fx::{RingHistory, Sample};

/// A single-sample transform reading from the input and output histories.
///
/// While `compute` runs, `x.get(k)` is `x[n-k]` (the current input is at
/// offset 0) and `y.get(k)` for `k >= 1` is `y[n-k]`. `y.get(0)` is the
/// slot reserved for the value being computed and always reads as zero.
pub trait Effect: Send + 'static {
    /// Longest look-back, in samples, this effect reads from either history.
    fn max_delay(&self) -> usize;

    fn compute(&mut self, x: &RingHistory, y: &RingHistory) -> Sample;
}

/// Session parameters fixed for the lifetime of a processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessorConfig {
    pub sample_rate: usize,
    pub channels: usize,
}

impl ProcessorConfig {
    pub fn new(sample_rate: usize, channels: usize) -> Result<Self> {
        ensure!(sample_rate > 0, "sample rate must be positive");
        ensure!(channels > 0, "channel count must be positive");

        Ok(Self {
            sample_rate,
            channels,
        })
    }
}

/// An effect bound to its own pair of sample histories.
pub struct Processor {
    name: &'static str,
    config: ProcessorConfig,
    x: RingHistory,
    y: RingHistory,
    effect: Box<dyn Effect>,
}

impl Processor {
    pub fn new(name: &'static str, config: ProcessorConfig, effect: Box<dyn Effect>) -> Self {
        let max_delay = effect.max_delay();

        Self {
            name,
            config,
            x: RingHistory::new(max_delay),
            y: RingHistory::new(max_delay),
            effect,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn config(&self) -> ProcessorConfig {
        self.config
    }

    pub fn max_delay(&self) -> usize {
        self.x.max_delay()
    }

    /// Feed one input sample through the effect and return its output.
    #[inline]
    pub fn process(&mut self, sample: Sample) -> Sample {
        self.x.push(sample);
        self.y.push(0.0);

        let output = self.effect.compute(&self.x, &self.y);

        self.y.overwrite_latest(output);
        output
    }

    pub fn process_block(&mut self, samples: &mut [Sample]) {
        for sample in samples.iter_mut() {
            *sample = self.process(*sample);
        }
    }
}
