//! Loading of images and sounds from the asset directory.
//!
//! Gameplay sprites are drawn on a flat backdrop color and keyed to alpha at
//! load time (see `aeroboo_core::chroma_key`). Screen backgrounds are uploaded
//! as-is. A missing or undecodable file is logged and leaves its slot empty;
//! the game keeps running without that sprite or sound.

use std::path::{Path, PathBuf};

use aeroboo_audio::SoundClip;
use aeroboo_core::chroma_key::{key_out_backdrop, KeyThresholds};
use aeroboo_core::geometry::scale_size;
use aeroboo_render::SpriteTexture;
use image::RgbaImage;

use crate::game::{SpriteId, SpriteMetrics};
use crate::screens::Stage;

pub const SPLASH_IMAGE: &str = "splash.png";
pub const MASCOT_IMAGE: &str = "urubu.png";
pub const BIRD_FRAMES: [&str; 2] = ["bu1.png", "bu2.png"];
pub const CANNON_FRAMES: [&str; 3] = ["cano1.png", "cano2.png", "cano3.png"];
pub const EXPLOSION_IMAGE: &str = "explosion.png";
pub const BANNER_IMAGE: &str = "winner.png";

pub const ENTRY_MUSIC: [&str; 1] = ["stay-with-me-384602.mp3"];
pub const GAME_MUSIC: [&str; 2] = ["vulture.mp3", "vulture.wav"];
pub const CANNON_SOUND: [&str; 2] = ["canon.mp3", "canon.wav"];
pub const EXPLOSION_SOUND: [&str; 2] = ["explosion.mp3", "explosion.wav"];
pub const WIN_SOUND: [&str; 2] = ["win.mp3", "win.wav"];

/// On-screen widths the first bird and cannon frames are scaled to.
pub const BIRD_DISPLAY_WIDTH: f32 = 128.0;
pub const CANNON_DISPLAY_WIDTH: f32 = 96.0;

pub fn decode_image(path: &Path) -> Result<RgbaImage, String> {
    let image =
        image::open(path).map_err(|e| format!("Failed to load image {}: {e}", path.display()))?;
    Ok(image.to_rgba8())
}

/// Decode and key out the backdrop color sampled from the corners.
pub fn load_keyed_image(path: &Path) -> Result<RgbaImage, String> {
    let mut image = decode_image(path)?;
    if key_out_backdrop(&mut image, KeyThresholds::default()).is_none() {
        log::warn!("{} is empty, nothing to key", path.display());
    }
    Ok(image)
}

/// Load and upload one image, logging failures.
pub fn load_sprite(stage: &Stage, root: &Path, name: &str, keyed: bool) -> Option<SpriteTexture> {
    let path = root.join(name);
    let loaded = if keyed {
        load_keyed_image(&path)
    } else {
        decode_image(&path)
    };
    match loaded {
        Ok(image) => Some(stage.upload(&image, name)),
        Err(err) => {
            log::error!("{err}");
            None
        }
    }
}

/// First candidate that loads, or `None` with every failure logged.
pub fn load_sound(root: &Path, candidates: &[&str]) -> Option<SoundClip> {
    let paths: Vec<PathBuf> = candidates.iter().map(|name| root.join(name)).collect();
    match SoundClip::load_first(&paths) {
        Ok(clip) => Some(clip),
        Err(err) => {
            log::warn!("Sound unavailable: {err}");
            None
        }
    }
}

/// Size a sprite is drawn at: its native size scaled so the width becomes
/// `target_width`. Without a native size, a `target_width` square.
pub fn display_size(native: Option<(u32, u32)>, target_width: f32) -> (i32, i32) {
    match native {
        Some((w, h)) if w > 0 => scale_size((w, h), target_width / w as f32),
        _ => {
            let side = target_width as i32;
            (side, side)
        }
    }
}

/// GPU textures for every gameplay sprite.
pub struct GameSprites {
    pub bird: [Option<SpriteTexture>; 2],
    pub cannon: [Option<SpriteTexture>; 3],
    pub explosion: Option<SpriteTexture>,
    pub banner: Option<SpriteTexture>,
}

impl GameSprites {
    pub fn load(stage: &Stage, root: &Path) -> Self {
        let sprites = Self {
            bird: BIRD_FRAMES.map(|name| load_sprite(stage, root, name, true)),
            cannon: CANNON_FRAMES.map(|name| load_sprite(stage, root, name, true)),
            explosion: load_sprite(stage, root, EXPLOSION_IMAGE, true),
            banner: load_sprite(stage, root, BANNER_IMAGE, true),
        };
        log::info!(
            "Loaded {} of 7 gameplay sprites",
            sprites.bird.iter().chain(&sprites.cannon).flatten().count()
                + sprites.explosion.iter().count()
                + sprites.banner.iter().count()
        );
        sprites
    }

    pub fn get(&self, id: SpriteId) -> Option<&SpriteTexture> {
        match id {
            SpriteId::Bird(frame) => self.bird.get(frame)?.as_ref(),
            SpriteId::Cannon(frame) => self.cannon.get(frame)?.as_ref(),
            SpriteId::Explosion => self.explosion.as_ref(),
            SpriteId::Banner => self.banner.as_ref(),
        }
    }

    /// Display sizes from the first bird and cannon frames.
    pub fn metrics(&self) -> SpriteMetrics {
        let first_size = |frame: &Option<SpriteTexture>| frame.as_ref().map(SpriteTexture::size);
        SpriteMetrics {
            bird: display_size(first_size(&self.bird[0]), BIRD_DISPLAY_WIDTH),
            cannon: display_size(first_size(&self.cannon[0]), CANNON_DISPLAY_WIDTH),
        }
    }
}

/// Decoded sound effects and the game's background track.
pub struct GameSounds {
    pub music: Option<SoundClip>,
    pub cannon: Option<SoundClip>,
    pub explosion: Option<SoundClip>,
    pub win: Option<SoundClip>,
}

impl GameSounds {
    pub fn load(root: &Path) -> Self {
        Self {
            music: load_sound(root, &GAME_MUSIC),
            cannon: load_sound(root, &CANNON_SOUND),
            explosion: load_sound(root, &EXPLOSION_SOUND),
            win: load_sound(root, &WIN_SOUND),
        }
    }
}
