use std::path::Path;

use anyhow::Context;

use super::frame::{GATE_IN_THRESHOLD, InputFrame, OutputFrame};
use crate::pipeline::config::OutputConfig;

// Load a WAV file from disk as jack input: channel 0 is the audio,
// channel 1 (if there is one) is read as the gate.
pub fn load_input(path: &Path, target_rate: u32) -> anyhow::Result<Vec<InputFrame>> {
    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    // Read the samples from the WAV file
    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader // float, just pass it through
            .samples::<f32>()
            .collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => { // int, convert to float
            let max = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|x| x as f32 / max))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let audio: Vec<f32> = samples.chunks_exact(channels).map(|c| c[0]).collect();
    let gate: Vec<f32> = if channels > 1 {
        samples.chunks_exact(channels).map(|c| c[1]).collect()
    } else {
        vec![0.0; audio.len()]
    };

    let (audio, gate) = if spec.sample_rate != target_rate {
        (
            resample_linear(&audio, spec.sample_rate, target_rate),
            resample_linear(&gate, spec.sample_rate, target_rate),
        )
    } else {
        (audio, gate)
    };

    log::debug!(
        "loaded {} ({} Hz, {} ch) as {} input frames",
        path.display(),
        spec.sample_rate,
        channels,
        audio.len()
    );

    Ok(audio
        .into_iter()
        .zip(gate)
        .map(|(audio, g)| InputFrame { audio, gate: g > GATE_IN_THRESHOLD })
        .collect())
}

// gate volts, CV volts, audio; 32-bit float so the volts survive as-is
pub fn write_output(path: &Path, frames: &[OutputFrame], sample_rate: u32, output: &OutputConfig) -> anyhow::Result<()> {
    let spec = hound::WavSpec {
        channels: 3,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for f in frames {
        let gate = if f.gate { output.gate_high } else { output.gate_low };
        writer.write_sample(gate)?;
        writer.write_sample(f.cv)?;
        writer.write_sample(f.audio)?;
    }
    writer.finalize()?;
    Ok(())
}

fn resample_linear(samples: &[f32], source_rate: u32, target_rate: u32) -> Vec<f32> {
    if source_rate == target_rate || samples.is_empty() {
        return samples.to_vec();
    }
    let ratio = target_rate as f64 / source_rate as f64;
    let out_len = (samples.len() as f64 * ratio).ceil() as usize;
    let last = samples.len() - 1;

    (0..out_len)
        .map(|i| {
            // fractional position in the source buffer
            let src_pos = i as f64 / ratio;
            let idx = src_pos.floor() as usize;
            if idx >= last {
                return samples[last];
            }
            let frac = (src_pos - idx as f64) as f32;
            samples[idx] * (1.0 - frac) + samples[idx + 1] * frac
        })
        .collect()
}
