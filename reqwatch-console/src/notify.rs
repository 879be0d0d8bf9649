//! Best-effort audible alert for newly-arrived requests
//!
//! The cue is a short rising two-tone chime. Playback is fire-and-forget on
//! its own thread and swallows every failure - a machine with no audio
//! device, a busy output, or an unsupported format just stays silent. The
//! caller is responsible for invoking the sink at most once per poll tick.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::debug;

/// Tones as (frequency Hz, start offset s, duration s)
const TONES: [(f32, f32, f32); 2] = [(600.0, 0.0, 0.12), (900.0, 0.15, 0.2)];
/// Total chime length in seconds
const CHIME_SECS: f32 = 0.35;
/// Gain envelope: each tone decays exponentially from start to end gain
const START_GAIN: f32 = 0.25;
const END_GAIN: f32 = 0.01;

/// Capability for emitting the new-request cue
///
/// `notify` must never block the caller and never fail observably.
pub trait NotificationSink: Send + Sync {
    fn notify(&self);
}

/// Two-tone chime played through the default audio output
pub struct ChimePlayer;

impl NotificationSink for ChimePlayer {
    fn notify(&self) {
        let spawned = std::thread::Builder::new()
            .name("reqwatch-chime".to_string())
            .spawn(|| {
                if let Err(e) = play_chime() {
                    debug!("Chime unavailable: {}", e);
                }
            });
        if let Err(e) = spawned {
            debug!("Could not spawn chime thread: {}", e);
        }
    }
}

/// No-op sink for muted operation
pub struct SilentSink;

impl NotificationSink for SilentSink {
    fn notify(&self) {}
}

/// Synthesize the chime as mono f32 samples
fn synth_chime(sample_rate: f32) -> Vec<f32> {
    let frames = (CHIME_SECS * sample_rate) as usize;
    let mut samples = vec![0.0f32; frames];

    for &(frequency, start, duration) in &TONES {
        let begin = (start * sample_rate) as usize;
        let count = (duration * sample_rate) as usize;
        for i in 0..count {
            let t = i as f32 / sample_rate;
            let gain = START_GAIN * (END_GAIN / START_GAIN).powf(t / duration);
            let idx = begin + i;
            if idx < frames {
                samples[idx] += gain * (std::f32::consts::TAU * frequency * t).sin();
            }
        }
    }

    samples
}

/// Open the default output device and play the chime to completion
fn play_chime() -> Result<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| anyhow!("No audio output device available"))?;
    let config = device.default_output_config()?;

    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;

    // Mono samples shared with the cpal callback; the callback outputs
    // silence once the buffer drains (std::sync::Mutex for cpal callback
    // compatibility)
    let buffer: Arc<Mutex<VecDeque<f32>>> =
        Arc::new(Mutex::new(synth_chime(sample_rate).into()));
    let callback_buffer = Arc::clone(&buffer);

    let stream = match config.sample_format() {
        cpal::SampleFormat::F32 => {
            let config: cpal::StreamConfig = config.into();
            device.build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if let Ok(mut buf) = callback_buffer.try_lock() {
                        for frame in data.chunks_mut(channels) {
                            let sample = buf.pop_front().unwrap_or(0.0);
                            for out in frame.iter_mut() {
                                *out = sample;
                            }
                        }
                    } else {
                        for out in data.iter_mut() {
                            *out = 0.0;
                        }
                    }
                },
                |err| debug!("Audio stream error: {}", err),
                None,
            )?
        }
        _ => bail!("Unsupported sample format"),
    };

    stream.play()?;

    // Keep the stream alive until the buffer has drained through the device
    std::thread::sleep(Duration::from_millis((CHIME_SECS * 1000.0) as u64 + 150));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 44_100.0;

    fn at(samples: &[f32], seconds: f32) -> f32 {
        samples[(seconds * SAMPLE_RATE) as usize]
    }

    #[test]
    fn test_chime_length() {
        let samples = synth_chime(SAMPLE_RATE);
        assert_eq!(samples.len(), (CHIME_SECS * SAMPLE_RATE) as usize);
    }

    #[test]
    fn test_chime_amplitude_bounded() {
        let samples = synth_chime(SAMPLE_RATE);
        assert!(samples.iter().all(|s| s.abs() <= START_GAIN));
    }

    #[test]
    fn test_tones_separated_by_silence() {
        let samples = synth_chime(SAMPLE_RATE);

        // Inside the first tone
        let first_tone: f32 = samples[0..(0.12 * SAMPLE_RATE) as usize]
            .iter()
            .map(|s| s.abs())
            .sum();
        assert!(first_tone > 0.0);

        // Gap between the tones (0.12s..0.15s) is silent
        assert_eq!(at(&samples, 0.13), 0.0);
        assert_eq!(at(&samples, 0.14), 0.0);

        // Second tone is present
        let second_tone: f32 = samples[(0.16 * SAMPLE_RATE) as usize..(0.3 * SAMPLE_RATE) as usize]
            .iter()
            .map(|s| s.abs())
            .sum();
        assert!(second_tone > 0.0);
    }

    #[test]
    fn test_envelope_decays() {
        let samples = synth_chime(SAMPLE_RATE);

        // Near the end of the second tone the envelope is almost fully decayed
        let tail = &samples[(0.34 * SAMPLE_RATE) as usize..];
        assert!(tail.iter().all(|s| s.abs() <= 0.02));
    }

    #[test]
    fn test_silent_sink_is_a_no_op() {
        // Exists mostly to document the contract: notify never panics
        SilentSink.notify();
    }
}
