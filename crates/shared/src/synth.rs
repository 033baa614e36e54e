use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use reqwest::Client;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::process::Command;

use crate::config::Config;

/// Everything is mixed down to this format before export.
const SAMPLE_RATE: u32 = 22050;
/// Scripts are synthesized in fixed-width slices. The split is purely
/// positional; a slice may end mid-word.
const CHUNK_WIDTH: usize = 240;
/// Silence inserted after each synthesized slice.
const PAUSE_MS: usize = 300;
/// Peak normalization target, in dB below full scale.
const NORMALIZE_HEADROOM_DB: f64 = 0.1;

const SPEAKERS: [&str; 3] = ["Gracie Wise", "Daisy Studious", "Andrew Chipper"];

/// What synthesis measured. The word count comes from the script text, not
/// from the audio.
#[derive(Debug, Clone, Copy)]
pub struct SynthesisReport {
    pub duration_seconds: f64,
    pub word_count: usize,
}

/// Turns script text into an MP3 by way of a local TTS server and ffmpeg.
pub struct Synthesizer {
    client: Client,
    tts_url: String,
}

impl Synthesizer {
    pub fn new(config: &Config) -> Result<Self> {
        // Synthesis of a 240-char slice can take a while on CPU
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(300))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            tts_url: config.tts_url.clone(),
        })
    }

    /// Synthesize `script` into an MP3 at `out_path`.
    ///
    /// Each slice is fetched from the TTS server, converted to 22050 Hz mono
    /// 16-bit, and concatenated with a fixed pause. The result is
    /// peak-normalized and handed to ffmpeg for the MP3 encode.
    pub async fn synthesize(&self, script: &str, out_path: &Path) -> Result<SynthesisReport> {
        let speaker = SPEAKERS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(SPEAKERS[0]);
        println!("  Speaker: {}", speaker);

        let mut samples: Vec<i16> = Vec::new();
        for chunk in chunk_text(script, CHUNK_WIDTH) {
            let wav = self.fetch_chunk(&chunk, speaker).await?;
            samples.extend(decode_wav(&wav)?);
            samples.extend(silence(PAUSE_MS));
        }

        normalize_peak(&mut samples);

        let wav_path = out_path.with_extension("wav");
        write_wav(&wav_path, &samples)?;
        encode_mp3(&wav_path, out_path)?;
        let _ = fs::remove_file(&wav_path);

        Ok(SynthesisReport {
            duration_seconds: samples.len() as f64 / SAMPLE_RATE as f64,
            word_count: script.split_whitespace().count(),
        })
    }

    async fn fetch_chunk(&self, text: &str, speaker: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(&self.tts_url)
            .query(&[("text", text), ("speaker_id", speaker), ("language_id", "en")])
            .send()
            .await
            .context("Failed to reach the TTS server")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("TTS server returned {}", status);
        }

        Ok(response
            .bytes()
            .await
            .context("Failed to read TTS response body")?
            .to_vec())
    }
}

/// Split text into fixed-width slices on char boundaries. Whitespace-only
/// slices are dropped.
fn chunk_text(text: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect::<String>())
        .filter(|chunk| !chunk.trim().is_empty())
        .collect()
}

/// Decode a WAV body into mono i16 samples at SAMPLE_RATE.
fn decode_wav(bytes: &[u8]) -> Result<Vec<i16>> {
    let mut reader =
        hound::WavReader::new(Cursor::new(bytes)).context("Failed to parse TTS WAV data")?;
    let spec = reader.spec();

    let raw: Vec<i16> = match spec.sample_format {
        hound::SampleFormat::Int if spec.bits_per_sample == 16 => reader
            .samples::<i16>()
            .collect::<std::result::Result<_, _>>()
            .context("Failed to decode 16-bit samples")?,
        hound::SampleFormat::Int => {
            let shift = spec.bits_per_sample as i32 - 16;
            reader
                .samples::<i32>()
                .map(|s| {
                    s.map(|v| {
                        if shift >= 0 {
                            (v >> shift) as i16
                        } else {
                            (v << -shift) as i16
                        }
                    })
                })
                .collect::<std::result::Result<_, _>>()
                .context("Failed to decode integer samples")?
        }
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * i16::MAX as f32) as i16))
            .collect::<std::result::Result<_, _>>()
            .context("Failed to decode float samples")?,
    };

    let mono = downmix(&raw, spec.channels);
    Ok(resample(&mono, spec.sample_rate, SAMPLE_RATE))
}

/// Average interleaved channels down to one.
fn downmix(samples: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return samples.to_vec();
    }
    samples
        .chunks(channels as usize)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / frame.len() as i32) as i16
        })
        .collect()
}

/// Linear-interpolation resample.
fn resample(samples: &[i16], from: u32, to: u32) -> Vec<i16> {
    if from == to || samples.is_empty() {
        return samples.to_vec();
    }

    let step = from as f64 / to as f64;
    let out_len = (samples.len() as f64 / step).round() as usize;
    let last = samples.len() - 1;

    (0..out_len)
        .map(|i| {
            let pos = i as f64 * step;
            let idx = (pos.floor() as usize).min(last);
            let frac = pos - idx as f64;
            let a = samples[idx] as f64;
            let b = samples[(idx + 1).min(last)] as f64;
            (a + (b - a) * frac).round() as i16
        })
        .collect()
}

fn silence(ms: usize) -> Vec<i16> {
    vec![0; SAMPLE_RATE as usize * ms / 1000]
}

/// Scale so the loudest sample sits NORMALIZE_HEADROOM_DB below full scale.
fn normalize_peak(samples: &mut [i16]) {
    let peak = samples.iter().map(|s| (*s as i32).abs()).max().unwrap_or(0);
    if peak == 0 {
        return;
    }

    let target = i16::MAX as f64 * 10f64.powf(-NORMALIZE_HEADROOM_DB / 20.0);
    let gain = target / peak as f64;
    for sample in samples.iter_mut() {
        *sample = (*sample as f64 * gain)
            .round()
            .clamp(i16::MIN as f64, i16::MAX as f64) as i16;
    }
}

fn write_wav(path: &Path, samples: &[i16]) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize().context("Failed to finalize WAV file")?;

    Ok(())
}

fn encode_mp3(wav_path: &Path, mp3_path: &Path) -> Result<()> {
    let status = Command::new("ffmpeg")
        .arg("-y")
        .arg("-loglevel")
        .arg("error")
        .arg("-i")
        .arg(wav_path)
        .arg("-codec:a")
        .arg("libmp3lame")
        .arg("-qscale:a")
        .arg("2")
        .arg(mp3_path)
        .status()
        .context("Failed to launch ffmpeg (is it on PATH?)")?;

    if !status.success() {
        anyhow::bail!("ffmpeg exited with {}", status);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_respect_width_on_char_boundaries() {
        let text = "a".repeat(500);
        let chunks = chunk_text(&text, 240);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 240);
        assert_eq!(chunks[1].chars().count(), 240);
        assert_eq!(chunks[2].chars().count(), 20);
    }

    #[test]
    fn chunks_handle_multibyte_text() {
        let text = "é".repeat(300);
        let chunks = chunk_text(&text, 240);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 240);
        assert_eq!(chunks[1].chars().count(), 60);
    }

    #[test]
    fn whitespace_only_chunks_are_dropped() {
        assert!(chunk_text("", 240).is_empty());
        assert!(chunk_text("   \n\t  ", 240).is_empty());
    }

    #[test]
    fn silence_length_matches_pause() {
        // 300 ms at 22050 Hz
        assert_eq!(silence(300).len(), 6615);
        assert!(silence(300).iter().all(|&s| s == 0));
    }

    #[test]
    fn downmix_averages_stereo_frames() {
        let stereo = [100, 200, -100, -300];
        assert_eq!(downmix(&stereo, 2), vec![150, -200]);
        assert_eq!(downmix(&stereo, 1), stereo.to_vec());
    }

    #[test]
    fn resample_halves_and_doubles_lengths() {
        let samples: Vec<i16> = (0..100).collect();
        assert_eq!(resample(&samples, 44100, 22050).len(), 50);
        assert_eq!(resample(&samples, 22050, 44100).len(), 200);
        assert_eq!(resample(&samples, 22050, 22050), samples);
    }

    #[test]
    fn resample_preserves_endpoints() {
        let samples: Vec<i16> = vec![0, 1000];
        let out = resample(&samples, 22050, 44100);
        assert_eq!(out.first().copied(), Some(0));
        // Interpolated values stay within the input range
        assert!(out.iter().all(|&s| (0..=1000).contains(&s)));
    }

    #[test]
    fn normalize_hits_the_headroom_target() {
        let mut samples = vec![0, 1000, -500];
        normalize_peak(&mut samples);
        let target = (i16::MAX as f64 * 10f64.powf(-0.1 / 20.0)).round() as i16;
        assert_eq!(samples.iter().map(|s| s.abs()).max().unwrap(), target);
        assert_eq!(samples[0], 0);
    }

    #[test]
    fn normalize_leaves_silence_alone() {
        let mut samples = vec![0i16; 16];
        normalize_peak(&mut samples);
        assert!(samples.iter().all(|&s| s == 0));
    }

    #[test]
    fn decode_round_trips_a_stereo_wav() {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut buf = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut buf, spec).unwrap();
            for &sample in &[100i16, 200, -100, -300] {
                writer.write_sample(sample).unwrap();
            }
            writer.finalize().unwrap();
        }

        let decoded = decode_wav(&buf.into_inner()).unwrap();
        assert_eq!(decoded, vec![150, -200]);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode_wav(b"definitely not a wav").is_err());
    }
}
