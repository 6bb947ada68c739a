//! Run a WAV file through an effect without an audio device.

use anyhow::{Context, Result, anyhow, ensure};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::{debug, info};
use std::path::Path;

use crate::audio::convert;
use crate::fx::{Processor, ProcessorConfig, Registry, Sample};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSummary {
    pub effect: &'static str,
    pub frames: usize,
    pub channels: usize,
    /// Samples that went past full scale and were saturated on output.
    pub clipped: usize,
}

/// Process `input` with the effect at `index` and write the result to
/// `output` in the same format.
///
/// Every channel gets its own freshly built processor, so channels never
/// share history.
pub fn render_wav(
    input: &Path,
    output: &Path,
    registry: &Registry,
    index: usize,
) -> Result<RenderSummary> {
    let reader = WavReader::open(input)
        .with_context(|| format!("Failed to open WAV file {}", input.display()))?;
    let spec = reader.spec();
    check_format(&spec)?;

    let mut samples = read_samples(reader, &spec)?;

    let channels = spec.channels as usize;
    let config = ProcessorConfig::new(spec.sample_rate as usize, channels)?;
    let mut processors = (0..channels)
        .map(|_| registry.construct(index, config))
        .collect::<Option<Vec<Processor>>>()
        .ok_or_else(|| anyhow!("no effect at index {index}"))?;
    let effect = processors[0].name();

    debug!(
        "Rendering {} samples at {} Hz through {effect}",
        samples.len(),
        spec.sample_rate
    );

    for frame in samples.chunks_mut(channels) {
        for (sample, processor) in frame.iter_mut().zip(processors.iter_mut()) {
            *sample = processor.process(*sample);
        }
    }

    let clipped = write_samples(output, spec, &samples)?;
    let summary = RenderSummary {
        effect,
        frames: samples.len() / channels,
        channels,
        clipped,
    };

    info!(
        "Rendered {} frames through {effect} to {} ({} clipped)",
        summary.frames,
        output.display(),
        summary.clipped
    );
    Ok(summary)
}

fn check_format(spec: &WavSpec) -> Result<()> {
    match spec.sample_format {
        SampleFormat::Int => ensure!(
            matches!(spec.bits_per_sample, 8 | 16 | 24 | 32),
            "unsupported integer sample width: {} bits",
            spec.bits_per_sample
        ),
        SampleFormat::Float => ensure!(
            spec.bits_per_sample == 32,
            "unsupported float sample width: {} bits",
            spec.bits_per_sample
        ),
    }
    ensure!(spec.channels > 0, "WAV file has no channels");
    Ok(())
}

fn read_samples<R: std::io::Read>(reader: WavReader<R>, spec: &WavSpec) -> Result<Vec<Sample>> {
    if spec.sample_format == SampleFormat::Float {
        reader
            .into_samples::<f32>()
            .map(|s| s.map(convert::from_f32))
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read float samples")
    } else {
        let bits = spec.bits_per_sample;
        reader
            .into_samples::<i32>()
            .map(|s| s.map(|v| convert::from_int_bits(v, bits)))
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read integer samples")
    }
}

/// Write `samples` with saturation, returning how many were clipped.
fn write_samples(path: &Path, spec: WavSpec, samples: &[Sample]) -> Result<usize> {
    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create WAV file {}", path.display()))?;
    let mut clipped = 0;

    for &sample in samples {
        let written = match spec.sample_format {
            SampleFormat::Float => {
                clipped += usize::from(convert::exceeds_full_scale(sample));
                writer.write_sample(convert::to_f32(sample))
            }
            SampleFormat::Int => {
                let bits = spec.bits_per_sample;
                clipped += usize::from(convert::exceeds_int_bits(sample, bits));
                writer.write_sample(convert::to_int_bits(sample, bits))
            }
        };
        written.context("Failed to write sample")?;
    }

    writer.finalize().context("Failed to finalize WAV file")?;
    Ok(clipped)
}
