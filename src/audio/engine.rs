use anyhow::{Result, ensure};
use crossbeam::channel::{Receiver, Sender, TrySendError, bounded};
use log::{debug, info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::audio::convert;
use crate::audio::peak_meter::{PeakMeter, PeakMeterHandle};
use crate::fx::{Processor, ProcessorConfig, Registry, Sample};

const UPDATE_QUEUE_SIZE: usize = 16;
// `select` drains retirements before queueing, so at most the in-flight
// updates plus one new swap can be waiting here.
const RETIRE_QUEUE_SIZE: usize = 2 * UPDATE_QUEUE_SIZE;

pub enum EngineMessage {
    SetProcessor(Box<Processor>),
    ResetPeakMeter,
}

/// Audio-thread side. Owns the active processor exclusively.
pub struct Engine {
    processor: Box<Processor>,
    /// Control → audio: fully built replacement processors.
    rx_updates: Receiver<EngineMessage>,
    /// Audio → control: retired processors, freed off the audio thread.
    tx_retired: Sender<Box<Processor>>,
    /// Retirements that could not be handed back and were freed in place.
    dropped_in_place: Arc<AtomicUsize>,
    peak_meter: PeakMeter,
}

/// Control side of the engine.
pub struct EngineHandle {
    tx_updates: Sender<EngineMessage>,
    rx_retired: Receiver<Box<Processor>>,
    registry: Arc<Registry>,
    config: ProcessorConfig,
    selected: AtomicUsize,
    dropped_in_place: Arc<AtomicUsize>,
    reported_drops: AtomicUsize,
    peak_meter: PeakMeterHandle,
}

impl Engine {
    pub fn new(config: ProcessorConfig, registry: Arc<Registry>) -> (Self, EngineHandle) {
        let (tx_updates, rx_updates) = bounded(UPDATE_QUEUE_SIZE);
        let (tx_retired, rx_retired) = bounded(RETIRE_QUEUE_SIZE);
        let dropped_in_place = Arc::new(AtomicUsize::new(0));
        let (peak_meter, peak_meter_handle) = PeakMeter::new(config.sample_rate);

        let processor = registry.construct_identity(config);

        (
            Self {
                processor: Box::new(processor),
                rx_updates,
                tx_retired,
                dropped_in_place: Arc::clone(&dropped_in_place),
                peak_meter,
            },
            EngineHandle {
                tx_updates,
                rx_retired,
                registry,
                config,
                selected: AtomicUsize::new(0),
                dropped_in_place,
                reported_drops: AtomicUsize::new(0),
                peak_meter: peak_meter_handle,
            },
        )
    }

    /// Name of the processor currently running on this engine.
    pub fn active_name(&self) -> &'static str {
        self.processor.name()
    }

    /// Run a block of core samples through the active processor.
    ///
    /// Pending swaps are picked up before every sample, so a new processor
    /// can take over anywhere inside a block.
    pub fn process(&mut self, input: &[Sample], output: &mut [Sample]) -> Result<()> {
        ensure_block_sizes(input.len(), output.len())?;

        for (x, y) in input.iter().zip(output.iter_mut()) {
            self.handle_messages();
            *y = self.processor.process(*x);
        }

        self.peak_meter.process(output);
        Ok(())
    }

    /// Same as [`Engine::process`] for normalised float devices.
    pub fn process_f32(&mut self, input: &[f32], output: &mut [f32]) -> Result<()> {
        ensure_block_sizes(input.len(), output.len())?;

        let mut block_peak: Sample = 0.0;
        for (x, y) in input.iter().zip(output.iter_mut()) {
            self.handle_messages();
            let sample = self.processor.process(convert::from_f32(*x));
            block_peak = block_peak.max(sample.abs());
            *y = convert::to_f32(sample);
        }

        self.peak_meter.process_peak(block_peak, input.len());
        Ok(())
    }

    /// Same as [`Engine::process`] for 32-bit integer devices.
    pub fn process_i32(&mut self, input: &[i32], output: &mut [i32]) -> Result<()> {
        ensure_block_sizes(input.len(), output.len())?;

        let mut block_peak: Sample = 0.0;
        for (x, y) in input.iter().zip(output.iter_mut()) {
            self.handle_messages();
            let sample = self.processor.process(convert::from_i32(*x));
            block_peak = block_peak.max(sample.abs());
            *y = convert::to_i32(sample);
        }

        self.peak_meter.process_peak(block_peak, input.len());
        Ok(())
    }

    #[inline]
    fn handle_messages(&mut self) {
        while let Ok(message) = self.rx_updates.try_recv() {
            match message {
                EngineMessage::SetProcessor(processor) => {
                    let retired = std::mem::replace(&mut self.processor, processor);
                    // Full or disconnected: the processor comes back in the
                    // error and is dropped here instead.
                    if self.tx_retired.try_send(retired).is_err() {
                        self.dropped_in_place.fetch_add(1, Ordering::Relaxed);
                    }
                }
                EngineMessage::ResetPeakMeter => self.peak_meter.reset(),
            }
        }
    }
}

fn ensure_block_sizes(input: usize, output: usize) -> Result<()> {
    ensure!(
        input == output,
        "input block has {input} samples but output block has {output}"
    );
    Ok(())
}

impl EngineHandle {
    /// Build the processor for `index` and hand it to the audio thread.
    ///
    /// Returns `Ok(false)` and keeps the current selection when `index` is
    /// not in the registry.
    pub fn select(&self, index: usize) -> Result<bool> {
        self.reclaim();

        let Some(processor) = self.registry.construct(index, self.config) else {
            warn!(
                "No effect at index {index}, keeping {}",
                self.selected_name()
            );
            return Ok(false);
        };

        let name = processor.name();
        debug!(
            "Built {name} for {} Hz, {} history samples",
            processor.config().sample_rate,
            processor.max_delay() + 1
        );
        match self
            .tx_updates
            .try_send(EngineMessage::SetProcessor(Box::new(processor)))
        {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => anyhow::bail!("engine update queue is full"),
            Err(TrySendError::Disconnected(_)) => anyhow::bail!("engine has shut down"),
        }

        self.selected.store(index, Ordering::Release);
        info!("Selected effect {index}: {name}");
        Ok(true)
    }

    pub fn selected(&self) -> usize {
        self.selected.load(Ordering::Acquire)
    }

    pub fn selected_name(&self) -> &'static str {
        self.registry.name(self.selected()).unwrap_or("unknown")
    }

    /// Drop processors the audio thread has retired. Returns how many.
    pub fn reclaim(&self) -> usize {
        let count = self.rx_retired.try_iter().count();
        if count > 0 {
            debug!("Reclaimed {count} retired processor(s)");
        }

        let dropped = self.dropped_on_audio_thread();
        let reported = self.reported_drops.swap(dropped, Ordering::Relaxed);
        if dropped > reported {
            warn!(
                "{} retired processor(s) were freed on the audio thread",
                dropped - reported
            );
        }
        count
    }

    /// Processors the audio thread had to free itself because the retire
    /// queue was full or closed.
    pub fn dropped_on_audio_thread(&self) -> usize {
        self.dropped_in_place.load(Ordering::Relaxed)
    }

    pub fn reset_meter(&self) -> Result<()> {
        self.tx_updates
            .try_send(EngineMessage::ResetPeakMeter)
            .map_err(|e| anyhow::anyhow!("failed to queue meter reset: {e}"))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn peak_meter(&self) -> &PeakMeterHandle {
        &self.peak_meter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> (Engine, EngineHandle) {
        let config = ProcessorConfig::new(16_000, 1).unwrap();
        Engine::new(config, Arc::new(Registry::catalog()))
    }

    #[test]
    fn starts_with_identity() {
        let (mut engine, handle) = engine();
        assert_eq!(engine.active_name(), "Identity");
        assert_eq!(handle.selected(), 0);

        let input = [1.0, -2.0, 3.0];
        let mut output = [0.0; 3];
        engine.process(&input, &mut output).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn swap_applies_on_next_sample() {
        let (mut engine, handle) = engine();
        let fuzz = handle.registry().index_of("fuzz").unwrap();

        assert!(handle.select(fuzz).unwrap());
        assert_eq!(handle.selected_name(), "Fuzz");

        let mut output = [0.0; 1];
        engine.process(&[10.0], &mut output).unwrap();
        assert_eq!(engine.active_name(), "Fuzz");
        assert_eq!(output[0], 50.0);
    }

    #[test]
    fn out_of_range_selection_is_ignored() {
        let (mut engine, handle) = engine();
        assert!(handle.select(3).unwrap());
        assert!(!handle.select(42).unwrap());
        assert_eq!(handle.selected(), 3);

        let mut output = [0.0; 1];
        engine.process(&[0.0], &mut output).unwrap();
        assert_eq!(engine.active_name(), "NaturalEcho");
    }

    #[test]
    fn retired_processors_are_reclaimed_off_thread() {
        let (mut engine, handle) = engine();
        handle.select(1).unwrap();
        handle.select(2).unwrap();

        let mut output = [0.0; 4];
        engine.process(&[0.0; 4], &mut output).unwrap();

        // Identity and Echo both retired.
        assert_eq!(handle.reclaim(), 2);
        assert_eq!(handle.reclaim(), 0);
    }

    #[test]
    fn mismatched_blocks_are_rejected() {
        let (mut engine, _) = engine();
        let mut output = [0.0; 2];
        assert!(engine.process(&[0.0; 3], &mut output).is_err());

        let mut output = [0.0f32; 2];
        assert!(engine.process_f32(&[0.0; 1], &mut output).is_err());
    }

    #[test]
    fn integer_boundary_saturates() {
        let (mut engine, handle) = engine();
        let fuzz = handle.registry().index_of("fuzz").unwrap();
        handle.select(fuzz).unwrap();

        // Fuzz output is bounded well inside full scale.
        let mut output = [0; 2];
        engine.process_i32(&[i32::MAX, i32::MIN], &mut output).unwrap();
        let bound = (5.0 * 0.005 * f64::from(i32::MAX)).round() as i32;
        assert_eq!(output, [bound, -bound]);

        // Identity passes the extremes through untouched.
        handle.select(0).unwrap();
        engine.process_i32(&[i32::MAX, i32::MIN], &mut output).unwrap();
        assert_eq!(output, [i32::MAX, i32::MIN]);
        assert!(handle.peak_meter().get_info().is_clipping);
    }

    #[test]
    fn float_boundary_clamps() {
        let (mut engine, handle) = engine();
        let mut output = [0.0f32; 3];
        engine.process_f32(&[0.5, -1.0, 0.0], &mut output).unwrap();
        assert_eq!(output, [0.5, -1.0, 0.0]);

        handle.reset_meter().unwrap();
        engine.process_f32(&[0.25, 0.0, 0.0], &mut output).unwrap();
        assert!((handle.peak_meter().get_info().peak_linear - 0.25).abs() < 1e-6);
    }

    #[test]
    fn full_update_queue_never_spills_retirements() {
        let (mut engine, handle) = engine();
        for i in 0..UPDATE_QUEUE_SIZE {
            assert!(handle.select(1 + i % 8).unwrap());
        }
        assert!(handle.select(1).is_err());

        let mut output = [0.0; 1];
        engine.process(&[0.0], &mut output).unwrap();

        assert_eq!(handle.dropped_on_audio_thread(), 0);
        assert_eq!(handle.reclaim(), UPDATE_QUEUE_SIZE);
    }

    #[test]
    fn f32_meter_releases_peak_after_hold() {
        let (mut engine, handle) = engine();
        let block = 128;
        let mut output = vec![0.0f32; block];

        engine.process_f32(&vec![0.8; block], &mut output).unwrap();
        assert!((handle.peak_meter().get_info().peak_linear - 0.8).abs() < 1e-6);

        // Ten seconds of quieter blocks, well past the two second hold.
        for _ in 0..(10 * 16_000 / block) {
            engine.process_f32(&vec![0.2; block], &mut output).unwrap();
        }
        assert!((handle.peak_meter().get_info().peak_linear - 0.2).abs() < 1e-6);
    }

    #[test]
    fn i32_meter_releases_peak_after_hold() {
        let (mut engine, handle) = engine();
        let block = 256;
        let mut output = vec![0i32; block];

        engine.process_i32(&vec![i32::MAX / 2; block], &mut output).unwrap();
        for _ in 0..(3 * 16_000 / block) {
            engine.process_i32(&vec![i32::MAX / 8; block], &mut output).unwrap();
        }
        assert!((handle.peak_meter().get_info().peak_linear - 0.125).abs() < 1e-6);
    }
}
