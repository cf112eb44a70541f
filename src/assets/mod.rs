//! # Background Asset Loading
//!
//! Audio cues and OBJ models are read on short-lived worker threads. Each
//! request hands its result back through a `futures` oneshot channel that the
//! frame loop polls without blocking.
//!
//! A failed load is logged and dropped: the scene keeps running without the
//! resource and nothing is retried.

pub mod model;

use std::path::{Path, PathBuf};

use futures::channel::oneshot;
use log::{info, warn};

use crate::error::{HearthError, Result};
pub use model::{load_obj, LoadedModel};

/// A sound the scenes can play
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioCue {
    pub file: &'static str,
    pub looping: bool,
    pub volume: f32,
}

pub const BACKGROUND_MUSIC: AudioCue = AudioCue {
    file: "background_music.mp3",
    looping: true,
    volume: 0.5,
};
pub const WIND: AudioCue = AudioCue {
    file: "wind_sound.mp3",
    looping: true,
    volume: 0.2,
};
pub const BIRDS: AudioCue = AudioCue {
    file: "bird_chirping.mp3",
    looping: true,
    volume: 0.1,
};
pub const INTERACTION: AudioCue = AudioCue {
    file: "interaction_sound.mp3",
    looping: false,
    volume: 0.7,
};

/// Cues requested when the family scene is built
pub const AMBIENT_CUES: [AudioCue; 4] = [BACKGROUND_MUSIC, WIND, BIRDS, INTERACTION];

/// Plays decoded or raw audio. Playback is outside this crate; the default
/// sink only logs what would play.
pub trait AudioSink {
    fn play(&mut self, cue: &AudioCue, bytes: &[u8]);
}

#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, cue: &AudioCue, bytes: &[u8]) {
        info!(
            "Playing {} ({} bytes, loop: {}, volume: {:.1})",
            cue.file,
            bytes.len(),
            cue.looping,
            cue.volume
        );
    }
}

#[derive(Debug)]
pub enum Asset {
    Audio { cue: AudioCue, bytes: Vec<u8> },
    Model(LoadedModel),
}

struct PendingLoad {
    path: PathBuf,
    receiver: oneshot::Receiver<Result<Asset>>,
}

/// Tracks in-flight loads for one scene context
#[derive(Default)]
pub struct AssetLoader {
    pending: Vec<PendingLoad>,
    requested: usize,
    settled: usize,
}

impl AssetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_audio(&mut self, dir: &Path, cue: AudioCue) {
        let path = dir.join(cue.file);
        let job_path = path.clone();
        self.spawn(path, move || {
            let bytes = std::fs::read(&job_path).map_err(|source| HearthError::Asset {
                path: job_path.clone(),
                source,
            })?;
            Ok(Asset::Audio { cue, bytes })
        });
    }

    pub fn request_model(&mut self, path: &Path) {
        let job_path = path.to_path_buf();
        self.spawn(path.to_path_buf(), move || {
            load_obj(&job_path).map(Asset::Model)
        });
    }

    fn spawn<F>(&mut self, path: PathBuf, job: F)
    where
        F: FnOnce() -> Result<Asset> + Send + 'static,
    {
        let (sender, receiver) = oneshot::channel();
        std::thread::spawn(move || {
            // The receiver is gone if the scene was destroyed meanwhile
            let _ = sender.send(job());
        });
        self.requested += 1;
        self.pending.push(PendingLoad { path, receiver });
    }

    /// Collects every load that has finished since the last poll
    pub fn poll(&mut self) -> Vec<Asset> {
        let mut ready = Vec::new();
        let mut still_pending = Vec::with_capacity(self.pending.len());

        for mut load in self.pending.drain(..) {
            match load.receiver.try_recv() {
                Ok(Some(result)) => {
                    self.settled += 1;
                    match result {
                        Ok(asset) => ready.push(asset),
                        Err(err) => warn!("Asset load failed, continuing without it: {err}"),
                    }
                }
                Ok(None) => still_pending.push(load),
                Err(_) => {
                    self.settled += 1;
                    warn!("{}", HearthError::Cancelled(load.path));
                }
            }
        }

        self.pending = still_pending;
        ready
    }

    /// Blocks until every pending load has settled
    pub fn finish_blocking(&mut self) -> Vec<Asset> {
        let mut ready = Vec::new();
        for load in self.pending.drain(..) {
            self.settled += 1;
            match futures::executor::block_on(load.receiver) {
                Ok(Ok(asset)) => ready.push(asset),
                Ok(Err(err)) => warn!("Asset load failed, continuing without it: {err}"),
                Err(_) => warn!("{}", HearthError::Cancelled(load.path)),
            }
        }
        ready
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Percentage of requested loads that have settled, 100 when idle
    pub fn progress(&self) -> f32 {
        if self.requested == 0 {
            100.0
        } else {
            self.settled as f32 / self.requested as f32 * 100.0
        }
    }

    /// Abandons all pending loads; their workers finish into closed channels.
    /// Abandoned loads count as settled.
    pub fn cancel_all(&mut self) {
        self.settled += self.pending.len();
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_audio_yields_nothing() {
        let mut loader = AssetLoader::new();
        loader.request_audio(Path::new("/no/such/dir"), BACKGROUND_MUSIC);
        assert_eq!(loader.progress(), 0.0);

        let assets = loader.finish_blocking();
        assert!(assets.is_empty());
        assert_eq!(loader.pending(), 0);
        assert_eq!(loader.progress(), 100.0);
    }

    #[test]
    fn reads_audio_bytes() {
        let dir = std::env::temp_dir().join(format!("hearth-audio-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        std::fs::write(dir.join(INTERACTION.file), b"ID3").expect("write cue");

        let mut loader = AssetLoader::new();
        loader.request_audio(&dir, INTERACTION);
        let assets = loader.finish_blocking();
        std::fs::remove_dir_all(&dir).ok();

        match assets.as_slice() {
            [Asset::Audio { cue, bytes }] => {
                assert_eq!(cue, &INTERACTION);
                assert_eq!(bytes.as_slice(), b"ID3");
            }
            other => panic!("unexpected assets: {other:?}"),
        }
    }

    #[test]
    fn polling_eventually_settles() {
        let mut loader = AssetLoader::new();
        loader.request_model(Path::new("/no/such/model.obj"));
        let mut polls = 0;
        while loader.pending() > 0 && polls < 500 {
            assert!(loader.poll().is_empty());
            std::thread::sleep(std::time::Duration::from_millis(2));
            polls += 1;
        }
        assert_eq!(loader.pending(), 0);
    }

    #[test]
    fn cancelled_loads_are_forgotten() {
        let mut loader = AssetLoader::new();
        loader.request_audio(Path::new("/no/such/dir"), WIND);
        loader.request_audio(Path::new("/no/such/dir"), BIRDS);
        loader.cancel_all();
        assert_eq!(loader.pending(), 0);
        assert!(loader.poll().is_empty());
        assert_eq!(loader.progress(), 100.0);
    }
}
