//! rodio-backed [`AudioService`], compiled with the `sound` feature.

use super::{AudioService, Cue, Track};
use log::{info, warn};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

/// Speaker output through rodio.
///
/// Sound files are read lazily and cached as raw bytes; every play decodes
/// from the cache onto a fresh sink, so cues can overlap.
pub struct RodioAudio {
    // The stream must outlive every sink created from its handle
    output: Option<(OutputStream, OutputStreamHandle)>,
    sound_dir: PathBuf,
    cache: HashMap<&'static str, Arc<[u8]>>,
    /// Names already reported missing, so the log gets one line per asset.
    missing: HashSet<&'static str>,
    background: Option<Sink>,
    enabled: bool,
}

impl RodioAudio {
    pub fn new(sound_dir: impl Into<PathBuf>) -> Self {
        let output = match OutputStream::try_default() {
            Ok(output) => Some(output),
            Err(e) => {
                warn!("No audio output available, playing silently: {}", e);
                None
            }
        };

        Self {
            output,
            sound_dir: sound_dir.into(),
            cache: HashMap::new(),
            missing: HashSet::new(),
            background: None,
            enabled: true,
        }
    }

    pub fn has_output(&self) -> bool {
        self.output.is_some()
    }

    /// Muting also stops the background track.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.stop_looping();
        }
    }

    /// Read every known asset up front so the first play does not touch disk.
    pub fn preload(&mut self) {
        for cue in [Cue::Flap, Cue::Point, Cue::Hit, Cue::Die, Cue::PipeHit] {
            let _ = self.bytes(cue.name());
        }
        let _ = self.bytes(Track::Background.name());
    }

    fn bytes(&mut self, name: &'static str) -> Option<Arc<[u8]>> {
        if let Some(data) = self.cache.get(name) {
            return Some(Arc::clone(data));
        }
        if self.missing.contains(name) {
            return None;
        }

        let path = self.sound_dir.join(format!("{}.wav", name));
        match fs::read(&path) {
            Ok(data) => {
                info!("Loaded sound {} ({} bytes)", path.display(), data.len());
                let data: Arc<[u8]> = data.into();
                self.cache.insert(name, Arc::clone(&data));
                Some(data)
            }
            Err(e) => {
                warn!("Sound {} unavailable: {}", path.display(), e);
                self.missing.insert(name);
                None
            }
        }
    }

    fn new_sink(&self) -> Option<Sink> {
        let (_, handle) = self.output.as_ref()?;
        match Sink::try_new(handle) {
            Ok(sink) => Some(sink),
            Err(e) => {
                warn!("Could not open audio sink: {}", e);
                None
            }
        }
    }
}

impl AudioService for RodioAudio {
    fn play(&mut self, cue: Cue) {
        if !self.enabled || self.output.is_none() {
            return;
        }
        let Some(data) = self.bytes(cue.name()) else {
            return;
        };
        let source = match Decoder::new(Cursor::new(data)) {
            Ok(source) => source,
            Err(e) => {
                warn!("Could not decode sound {}: {}", cue.name(), e);
                self.missing.insert(cue.name());
                self.cache.remove(cue.name());
                return;
            }
        };
        if let Some(sink) = self.new_sink() {
            sink.append(source);
            sink.detach();
        }
    }

    fn play_looping(&mut self, track: Track) {
        self.stop_looping();
        if !self.enabled || self.output.is_none() {
            return;
        }
        let Some(data) = self.bytes(track.name()) else {
            return;
        };
        let source = match Decoder::new_looped(Cursor::new(data)) {
            Ok(source) => source,
            Err(e) => {
                warn!("Could not decode track {}: {}", track.name(), e);
                return;
            }
        };
        if let Some(sink) = self.new_sink() {
            sink.append(source);
            info!("Background music started: {}", track.name());
            self.background = Some(sink);
        }
    }

    fn stop_looping(&mut self) {
        if let Some(sink) = self.background.take() {
            sink.stop();
        }
    }

    fn shutdown(&mut self) {
        self.stop_looping();
        self.cache.clear();
    }
}
