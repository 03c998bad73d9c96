//! The three phases the program moves through: splash, entry, game.
//!
//! Each screen owns everything it shows (window, GPU context, textures, music)
//! so dropping it releases those resources. The splash gets a window of its
//! own; the entry screen's window is handed on to the game.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use aeroboo_audio::{AudioSystem, MusicChannel};
use aeroboo_core::geometry::PixelRect;
use aeroboo_core::input::{InputState, Key, MouseBtn};
use aeroboo_core::time::FrameClock;
use aeroboo_platform::window::{create_window, PlatformConfig};
use aeroboo_render::color::{clear_color, srgb_to_linear, WHITE};
use aeroboo_render::{GpuContext, ScreenCamera, SpriteBatch, SpriteRenderer, SpriteTexture};
use image::RgbaImage;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

use crate::assets::{self, GameSounds, GameSprites};
use crate::game::{GameEvent, GameState, GameTuning, SceneItem, SpriteId};

pub const SPLASH_DURATION: Duration = Duration::from_millis(3000);

/// What the driver should do after a screen's frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenFlow {
    Continue,
    /// Move on to the next phase.
    Next,
    /// End the program.
    Quit,
}

/// A window with its GPU context and sprite renderer.
pub struct Stage {
    pub window: Arc<Window>,
    pub gpu: GpuContext,
    pub renderer: SpriteRenderer,
    pub size: (i32, i32),
}

impl Stage {
    pub fn open(event_loop: &ActiveEventLoop, config: &PlatformConfig) -> Result<Self, String> {
        let window = create_window(event_loop, config)?;
        let gpu = GpuContext::new(window.clone())?;
        let (w, h) = config.logical_size();
        let renderer = SpriteRenderer::new(&gpu, &ScreenCamera::new(w, h));
        Ok(Self {
            window,
            gpu,
            renderer,
            size: (config.width as i32, config.height as i32),
        })
    }

    pub fn window_id(&self) -> WindowId {
        self.window.id()
    }

    pub fn upload(&self, image: &RgbaImage, label: &str) -> SpriteTexture {
        self.renderer.upload(&self.gpu, image, label)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
    }

    fn full_screen(&self) -> PixelRect {
        PixelRect::new(0, 0, self.size.0, self.size.1)
    }
}

/// The title image shown in its own window for a fixed time.
pub struct SplashScreen {
    stage: Stage,
    image: SpriteTexture,
    batch: SpriteBatch<()>,
    started: Instant,
    pub input: InputState,
}

impl SplashScreen {
    pub fn open(
        event_loop: &ActiveEventLoop,
        config: &PlatformConfig,
        root: &Path,
    ) -> Result<Self, String> {
        let stage = Stage::open(event_loop, config)?;
        let image = assets::decode_image(&root.join(assets::SPLASH_IMAGE))?;
        let image = stage.upload(&image, assets::SPLASH_IMAGE);
        let mut batch = SpriteBatch::new();
        batch.push_sprite((), stage.full_screen(), WHITE);
        Ok(Self {
            stage,
            image,
            batch,
            started: Instant::now(),
            input: InputState::new(),
        })
    }

    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    pub fn window_id(&self) -> WindowId {
        self.stage.window_id()
    }

    pub fn frame(&mut self) -> ScreenFlow {
        if splash_finished(self.started.elapsed(), self.input.close_requested()) {
            return ScreenFlow::Next;
        }
        self.input.end_frame();
        let image = &self.image;
        self.stage.renderer.render(
            &self.stage.gpu,
            clear_color([0, 0, 0]),
            &self.batch,
            |_| Some(image),
        );
        ScreenFlow::Continue
    }
}

/// A close request ends only the splash; the program carries on.
pub fn splash_finished(elapsed: Duration, close_requested: bool) -> bool {
    close_requested || elapsed >= SPLASH_DURATION
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryLayer {
    Background,
    Mascot,
}

/// Click-to-start screen with the mascot over the title background.
pub struct EntryScreen {
    stage: Stage,
    background: Option<SpriteTexture>,
    mascot: Option<SpriteTexture>,
    batch: SpriteBatch<EntryLayer>,
    _music: Option<MusicChannel>,
    pub input: InputState,
}

impl EntryScreen {
    pub fn new(stage: Stage, audio: Option<&AudioSystem>, root: &Path) -> Self {
        let background = assets::load_sprite(&stage, root, assets::SPLASH_IMAGE, false);
        let mascot = assets::load_sprite(&stage, root, assets::MASCOT_IMAGE, false);

        let mut batch = SpriteBatch::new();
        if background.is_some() {
            batch.push_sprite(EntryLayer::Background, stage.full_screen(), WHITE);
        }
        if let Some(mascot) = &mascot {
            let (w, h) = mascot.size();
            batch.push_sprite(
                EntryLayer::Mascot,
                PixelRect::centered(w as i32, h as i32, stage.size.0, stage.size.1),
                WHITE,
            );
        }

        let music = audio.and_then(|audio| {
            let clip = assets::load_sound(root, &assets::ENTRY_MUSIC)?;
            let mut channel = audio.music_channel(1.0);
            if let Err(err) = channel.play_looped(&clip) {
                log::warn!("{err}");
            }
            Some(channel)
        });

        Self {
            stage,
            background,
            mascot,
            batch,
            _music: music,
            input: InputState::new(),
        }
    }

    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    pub fn window_id(&self) -> WindowId {
        self.stage.window_id()
    }

    /// Hand the window to the next phase. Entry music stops here.
    pub fn into_stage(self) -> Stage {
        self.stage
    }

    pub fn frame(&mut self) -> ScreenFlow {
        let flow = entry_flow(&self.input);
        self.input.end_frame();
        if flow != ScreenFlow::Continue {
            return flow;
        }

        let (background, mascot) = (&self.background, &self.mascot);
        self.stage.renderer.render(
            &self.stage.gpu,
            clear_color([0, 0, 0]),
            &self.batch,
            |layer| match layer {
                EntryLayer::Background => background.as_ref(),
                EntryLayer::Mascot => mascot.as_ref(),
            },
        );
        ScreenFlow::Continue
    }
}

fn entry_flow(input: &InputState) -> ScreenFlow {
    if input.close_requested() {
        ScreenFlow::Quit
    } else if input.any_mouse_just_pressed() {
        ScreenFlow::Next
    } else {
        ScreenFlow::Continue
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicAction {
    Start,
    Stop,
    Keep,
}

pub fn music_action(wants_music: bool, is_playing: bool) -> MusicAction {
    match (wants_music, is_playing) {
        (true, false) => MusicAction::Start,
        (false, true) => MusicAction::Stop,
        _ => MusicAction::Keep,
    }
}

/// Once music has failed to start, no further starts are attempted.
fn latched(action: MusicAction, start_failed: bool) -> MusicAction {
    match action {
        MusicAction::Start if start_failed => MusicAction::Keep,
        other => other,
    }
}

/// One-shot sounds the game plays in response to events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Cannon,
    Explosion,
    Win,
}

/// The sound and music change an event calls for.
pub fn event_response(event: GameEvent) -> (Option<Effect>, MusicAction) {
    match event {
        GameEvent::CannonFired => (Some(Effect::Cannon), MusicAction::Keep),
        GameEvent::BirdHit => (Some(Effect::Explosion), MusicAction::Stop),
        GameEvent::BannerShown => (Some(Effect::Win), MusicAction::Keep),
        GameEvent::RoundReset => (None, MusicAction::Start),
    }
}

/// What the player asked for this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameCommands {
    pub quit: bool,
    pub toggle_pause: bool,
    pub fire: bool,
}

/// Close or Escape quits, Space toggles pause, the left button fires.
pub fn game_commands(input: &InputState) -> GameCommands {
    GameCommands {
        quit: input.close_requested() || input.is_just_pressed(Key::Escape),
        toggle_pause: input.is_just_pressed(Key::Space),
        fire: input.is_mouse_just_pressed(MouseBtn::Left),
    }
}

/// The shooting game: gameplay state plus the textures and sounds it is drawn
/// and heard with.
pub struct GameScreen {
    stage: Stage,
    state: GameState,
    sprites: GameSprites,
    sounds: GameSounds,
    music: Option<MusicChannel>,
    music_failed: bool,
    clock: FrameClock,
    batch: SpriteBatch<SpriteId>,
    pub input: InputState,
}

impl GameScreen {
    pub fn new(stage: Stage, audio: Option<&AudioSystem>, root: PathBuf) -> Self {
        let tuning = GameTuning::default();
        let sprites = GameSprites::load(&stage, &root);
        let metrics = sprites.metrics();
        log::info!(
            "Bird drawn at {}x{}, cannon at {}x{}",
            metrics.bird.0,
            metrics.bird.1,
            metrics.cannon.0,
            metrics.cannon.1
        );
        let sounds = GameSounds::load(&root);
        let music = audio.map(|audio| audio.music_channel(tuning.music_volume));

        Self {
            stage,
            state: GameState::new(tuning, metrics),
            sprites,
            sounds,
            music,
            music_failed: false,
            clock: FrameClock::new(),
            batch: SpriteBatch::new(),
            input: InputState::new(),
        }
    }

    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    pub fn window_id(&self) -> WindowId {
        self.stage.window_id()
    }

    pub fn frame(&mut self, audio: Option<&AudioSystem>) -> ScreenFlow {
        let dt = self.clock.begin_frame();
        let commands = game_commands(&self.input);
        self.input.end_frame();

        if commands.quit {
            log::info!(
                "Leaving game after {} frames, {} birds downed",
                self.clock.frame_count,
                self.state.birds_downed
            );
            return ScreenFlow::Quit;
        }
        if commands.toggle_pause {
            self.state.toggle_pause();
            log::info!("{}", if self.state.paused { "Paused" } else { "Resumed" });
        }
        if commands.fire {
            self.state.fire();
        }

        for event in self.state.update(dt) {
            let (effect, music) = event_response(event);
            if let (Some(effect), Some(audio)) = (effect, audio) {
                self.play_effect(effect, audio);
            }
            self.apply_music(music);
        }
        if !self.state.paused {
            let playing = self.music.as_ref().is_some_and(MusicChannel::is_playing);
            self.apply_music(music_action(self.state.wants_music(), playing));
        }

        self.draw();
        ScreenFlow::Continue
    }

    fn play_effect(&self, effect: Effect, audio: &AudioSystem) {
        let clip = match effect {
            Effect::Cannon => &self.sounds.cannon,
            Effect::Explosion => &self.sounds.explosion,
            Effect::Win => &self.sounds.win,
        };
        if let Some(clip) = clip {
            audio.play(clip);
        }
    }

    fn apply_music(&mut self, action: MusicAction) {
        let (Some(music), Some(clip)) = (&mut self.music, &self.sounds.music) else {
            return;
        };
        match latched(action, self.music_failed) {
            MusicAction::Start => {
                if let Err(err) = music.play_looped(clip) {
                    log::warn!("{err}; game music disabled");
                    self.music_failed = true;
                }
            }
            MusicAction::Stop => music.stop(),
            MusicAction::Keep => {}
        }
    }

    fn draw(&mut self) {
        let banner_size = self.sprites.banner.as_ref().map(SpriteTexture::size);
        self.batch.clear();
        for item in self.state.compose(banner_size) {
            match item {
                SceneItem::Sprite { id, rect } => self.batch.push_sprite(id, rect, WHITE),
                SceneItem::Fill { rect, color } => {
                    self.batch.push_fill(rect, srgb_to_linear(color))
                }
            }
        }

        let sprites = &self.sprites;
        self.stage.renderer.render(
            &self.stage.gpu,
            clear_color(self.state.tuning.sky_color),
            &self.batch,
            |id| sprites.get(*id),
        );
    }
}
