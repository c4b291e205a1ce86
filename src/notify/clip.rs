//! Audio clip loading
//!
//! The asset is decoded completely into memory at startup so a broken file is
//! caught before the first tick, and so every playback can start from sample
//! zero without touching the filesystem again.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, Source};

use crate::error::{Result, WatchError};

/// Decoded PCM samples plus the format needed to play them
#[derive(Debug, Clone)]
pub struct AudioClip {
    path: PathBuf,
    channels: u16,
    sample_rate: u32,
    samples: Arc<[i16]>,
}

impl AudioClip {
    /// Decode the whole file. Missing or undecodable assets are fatal.
    pub fn load_once(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let load_err = |reason: String| WatchError::AudioLoad {
            path: path.to_path_buf(),
            reason,
        };

        let file = File::open(path).map_err(|e| load_err(e.to_string()))?;
        let decoder = Decoder::new(BufReader::new(file)).map_err(|e| load_err(e.to_string()))?;

        let channels = decoder.channels();
        let sample_rate = decoder.sample_rate();
        let samples: Vec<i16> = decoder.collect();

        if channels == 0 || sample_rate == 0 || samples.is_empty() {
            return Err(load_err("no audio frames decoded".to_string()));
        }

        let clip = Self {
            path: path.to_path_buf(),
            channels,
            sample_rate,
            samples: samples.into(),
        };
        log::info!(
            "Loaded notification sound {} ({} ch, {} Hz, {:.1}s)",
            clip.path().display(),
            clip.channels(),
            clip.sample_rate(),
            clip.duration().as_secs_f64()
        );
        Ok(clip)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration(&self) -> Duration {
        let frames = self.samples.len() as u64 / u64::from(self.channels);
        Duration::from_micros(frames * 1_000_000 / u64::from(self.sample_rate))
    }

    /// A fresh source positioned at the first sample; the clip itself is never consumed
    pub fn source(&self) -> ClipSource {
        ClipSource {
            samples: Arc::clone(&self.samples),
            position: 0,
            channels: self.channels,
            sample_rate: self.sample_rate,
        }
    }
}

/// Cursor over the shared samples of an `AudioClip`
#[derive(Debug, Clone)]
pub struct ClipSource {
    samples: Arc<[i16]>,
    position: usize,
    channels: u16,
    sample_rate: u32,
}

impl ClipSource {
    fn remaining(&self) -> usize {
        self.samples.len() - self.position
    }
}

impl Iterator for ClipSource {
    type Item = i16;

    fn next(&mut self) -> Option<i16> {
        let sample = self.samples.get(self.position).copied()?;
        self.position += 1;
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining(), Some(self.remaining()))
    }
}

impl ExactSizeIterator for ClipSource {}

impl Source for ClipSource {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.remaining())
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        let frames = self.samples.len() as u64 / u64::from(self.channels);
        Some(Duration::from_micros(frames * 1_000_000 / u64::from(self.sample_rate)))
    }
}
