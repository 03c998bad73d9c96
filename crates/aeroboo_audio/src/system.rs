use rodio::{OutputStream, OutputStreamHandle, Sink};

use crate::clip::SoundClip;

/// The default output device. Dropping it silences every sink created from it.
pub struct AudioSystem {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl AudioSystem {
    pub fn new() -> Result<Self, String> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| format!("Failed to open audio output: {e}"))?;
        log::info!("Audio output opened");
        Ok(Self {
            _stream: stream,
            handle,
        })
    }

    /// Fire-and-forget playback of `clip` on its own detached sink.
    pub fn play(&self, clip: &SoundClip) {
        let source = match clip.decoder() {
            Ok(source) => source,
            Err(err) => {
                log::warn!("Failed to decode '{}': {err}", clip.name);
                return;
            }
        };
        match Sink::try_new(&self.handle) {
            Ok(sink) => {
                sink.append(source);
                sink.detach();
            }
            Err(err) => log::warn!("Failed to play '{}': {err}", clip.name),
        }
    }

    pub fn music_channel(&self, volume: f32) -> MusicChannel {
        MusicChannel {
            handle: self.handle.clone(),
            sink: None,
            volume,
        }
    }
}

/// A single looping background track.
///
/// Each `play_looped` starts on a fresh sink; `stop` drops it, which halts
/// playback immediately. Dropping the channel stops the music.
pub struct MusicChannel {
    handle: OutputStreamHandle,
    sink: Option<Sink>,
    volume: f32,
}

impl MusicChannel {
    /// Start `clip` on a fresh looping sink. On failure the channel stays
    /// silent and the error names the clip.
    pub fn play_looped(&mut self, clip: &SoundClip) -> Result<(), String> {
        self.stop();
        let source = clip
            .looped_decoder()
            .map_err(|e| format!("Failed to decode music '{}': {e}", clip.name))?;
        let sink = Sink::try_new(&self.handle)
            .map_err(|e| format!("Failed to start music '{}': {e}", clip.name))?;
        sink.set_volume(self.volume);
        sink.append(source);
        self.sink = Some(sink);
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    /// True while a started track still has queued audio.
    pub fn is_playing(&self) -> bool {
        self.sink.as_ref().is_some_and(|sink| !sink.empty())
    }
}
