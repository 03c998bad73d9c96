use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use rodio::Decoder;

/// An encoded audio file held in memory, verified to decode at load time.
///
/// Playback decodes from a shared byte buffer, so playing the same clip many
/// times never touches the disk again.
#[derive(Clone)]
pub struct SoundClip {
    pub name: String,
    bytes: Arc<[u8]>,
}

impl std::fmt::Debug for SoundClip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundClip")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl SoundClip {
    pub fn load(path: &Path) -> Result<Self, String> {
        let raw = fs::read(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
        let clip = Self {
            name: path.display().to_string(),
            bytes: Arc::from(raw),
        };
        clip.decoder()
            .map_err(|e| format!("Failed to decode {}: {e}", path.display()))?;
        Ok(clip)
    }

    /// Load the first candidate that reads and decodes. Candidates are tried in
    /// order, so list the preferred format first (e.g. `.mp3` before `.wav`).
    pub fn load_first<P: AsRef<Path>>(candidates: &[P]) -> Result<Self, String> {
        let mut failures = Vec::new();
        for candidate in candidates {
            match Self::load(candidate.as_ref()) {
                Ok(clip) => return Ok(clip),
                Err(err) => failures.push(err),
            }
        }
        if failures.is_empty() {
            return Err("No sound file candidates given".to_string());
        }
        Err(failures.join("; "))
    }

    pub(crate) fn decoder(&self) -> Result<Decoder<Cursor<Arc<[u8]>>>, rodio::decoder::DecoderError> {
        Decoder::new(Cursor::new(Arc::clone(&self.bytes)))
    }

    pub(crate) fn looped_decoder(
        &self,
    ) -> Result<rodio::decoder::LoopedDecoder<Cursor<Arc<[u8]>>>, rodio::decoder::DecoderError>
    {
        Decoder::new_looped(Cursor::new(Arc::clone(&self.bytes)))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    pub(crate) fn temp_file_path(name_hint: &str, ext: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "aeroboo_audio_test_{}_{}_{}.{}",
            name_hint,
            std::process::id(),
            nanos,
            ext
        ))
    }

    /// A short 16-bit mono PCM WAV file.
    pub(crate) fn tiny_wav() -> Vec<u8> {
        let sample_rate: u32 = 8_000;
        let samples: Vec<i16> = (0..800).map(|i| ((i % 40) as i16 - 20) * 500).collect();
        let data_len = (samples.len() * 2) as u32;

        let mut out = Vec::with_capacity(44 + data_len as usize);
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes()); // PCM
        out.extend_from_slice(&1u16.to_le_bytes()); // mono
        out.extend_from_slice(&sample_rate.to_le_bytes());
        out.extend_from_slice(&(sample_rate * 2).to_le_bytes());
        out.extend_from_slice(&2u16.to_le_bytes());
        out.extend_from_slice(&16u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        for s in samples {
            out.extend_from_slice(&s.to_le_bytes());
        }
        out
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = temp_file_path("missing", "mp3");
        let err = SoundClip::load(&path).expect_err("file does not exist");
        assert!(err.contains("Failed to read"));
    }

    #[test]
    fn undecodable_file_is_an_error() {
        let path = temp_file_path("garbage", "mp3");
        fs::write(&path, b"definitely not audio").expect("write temp file");
        let err = SoundClip::load(&path).expect_err("garbage should not decode");
        assert!(err.contains("Failed to decode"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn wav_file_loads() {
        let path = temp_file_path("valid", "wav");
        fs::write(&path, tiny_wav()).expect("write temp wav");
        let clip = SoundClip::load(&path).expect("wav should decode");
        assert_eq!(clip.name, path.display().to_string());
        assert!(clip.looped_decoder().is_ok());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_first_falls_back_to_later_candidates() {
        let mp3 = temp_file_path("fallback", "mp3");
        let wav = temp_file_path("fallback", "wav");
        fs::write(&wav, tiny_wav()).expect("write temp wav");

        let clip = SoundClip::load_first(&[&mp3, &wav]).expect("wav fallback should load");
        assert_eq!(clip.name, wav.display().to_string());
        let _ = fs::remove_file(wav);
    }

    #[test]
    fn load_first_prefers_earlier_candidates() {
        let first = temp_file_path("prefer_a", "wav");
        let second = temp_file_path("prefer_b", "wav");
        fs::write(&first, tiny_wav()).expect("write temp wav");
        fs::write(&second, tiny_wav()).expect("write temp wav");

        let clip = SoundClip::load_first(&[&first, &second]).expect("should load");
        assert_eq!(clip.name, first.display().to_string());
        let _ = fs::remove_file(first);
        let _ = fs::remove_file(second);
    }

    #[test]
    fn load_first_reports_every_failure() {
        let a = temp_file_path("none_a", "mp3");
        let b = temp_file_path("none_b", "wav");
        let err = SoundClip::load_first(&[&a, &b]).expect_err("nothing exists");
        assert!(err.contains(&a.display().to_string()));
        assert!(err.contains(&b.display().to_string()));
    }

    #[test]
    fn load_first_with_no_candidates_is_an_error() {
        let empty: [&Path; 0] = [];
        assert!(SoundClip::load_first(&empty).is_err());
    }
}
