//! Aeroboo -- a one-button arcade shooter.
//!
//! winit drives the event loop via `ApplicationHandler`. The program moves
//! through three phases, each owning its own resources:
//!
//!   1. Splash -- a separate window showing the title image for 3 seconds
//!   2. Entry  -- the main window with the mascot, waiting for a mouse click
//!   3. Game   -- the shooting game until Escape or the window is closed
//!
//! Input events are recorded into the active screen's `InputState`; all work
//! happens in `RedrawRequested`, which is requested every `about_to_wait` and
//! paced by the display (FIFO present). Frame time is measured, not fixed.

mod assets;
mod game;
#[cfg(test)]
mod replay;
mod screens;

use std::path::PathBuf;
use std::process::ExitCode;

use aeroboo_audio::AudioSystem;
use aeroboo_core::input::{InputState, Key, MouseBtn};
use aeroboo_platform::window::PlatformConfig;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowId;

use screens::{EntryScreen, GameScreen, ScreenFlow, SplashScreen, Stage};

enum Phase {
    /// Waiting for the first `resumed`.
    Starting,
    Splash(Box<SplashScreen>),
    Entry(Box<EntryScreen>),
    Game(Box<GameScreen>),
    Finished,
}

impl Phase {
    fn name(&self) -> &'static str {
        match self {
            Phase::Starting => "starting",
            Phase::Splash(_) => "splash",
            Phase::Entry(_) => "entry",
            Phase::Game(_) => "game",
            Phase::Finished => "finished",
        }
    }

    fn window_id(&self) -> Option<WindowId> {
        match self {
            Phase::Splash(s) => Some(s.window_id()),
            Phase::Entry(e) => Some(e.window_id()),
            Phase::Game(g) => Some(g.window_id()),
            Phase::Starting | Phase::Finished => None,
        }
    }

    fn stage_mut(&mut self) -> Option<&mut Stage> {
        match self {
            Phase::Splash(s) => Some(s.stage_mut()),
            Phase::Entry(e) => Some(e.stage_mut()),
            Phase::Game(g) => Some(g.stage_mut()),
            Phase::Starting | Phase::Finished => None,
        }
    }

    fn input_mut(&mut self) -> Option<&mut InputState> {
        match self {
            Phase::Splash(s) => Some(&mut s.input),
            Phase::Entry(e) => Some(&mut e.input),
            Phase::Game(g) => Some(&mut g.input),
            Phase::Starting | Phase::Finished => None,
        }
    }
}

struct App {
    config: PlatformConfig,
    asset_root: PathBuf,
    phase: Phase,
    /// Opened after the splash; `None` means the game runs silently.
    audio: Option<AudioSystem>,
    failed: bool,
}

impl App {
    fn new() -> Self {
        Self {
            config: PlatformConfig::default(),
            asset_root: PathBuf::from("."),
            phase: Phase::Starting,
            audio: None,
            failed: false,
        }
    }

    fn enter(&mut self, phase: Phase) {
        log::info!("Phase: {} -> {}", self.phase.name(), phase.name());
        self.phase = phase;
    }

    fn start_splash(&mut self, event_loop: &ActiveEventLoop) {
        match SplashScreen::open(event_loop, &self.config, &self.asset_root) {
            Ok(splash) => self.enter(Phase::Splash(Box::new(splash))),
            Err(err) => {
                log::warn!("Skipping splash: {err}");
                self.start_entry(event_loop);
            }
        }
    }

    fn start_entry(&mut self, event_loop: &ActiveEventLoop) {
        // The splash window and its GPU context are gone before this point.
        self.phase = Phase::Starting;

        self.audio = match AudioSystem::new() {
            Ok(audio) => Some(audio),
            Err(err) => {
                log::warn!("{err}; continuing without sound");
                None
            }
        };

        match Stage::open(event_loop, &self.config) {
            Ok(stage) => {
                let entry = EntryScreen::new(stage, self.audio.as_ref(), &self.asset_root);
                self.enter(Phase::Entry(Box::new(entry)));
            }
            Err(err) => self.fail(event_loop, &err),
        }
    }

    fn start_game(&mut self, stage: Stage) {
        let game = GameScreen::new(stage, self.audio.as_ref(), self.asset_root.clone());
        self.enter(Phase::Game(Box::new(game)));
    }

    fn finish(&mut self, event_loop: &ActiveEventLoop) {
        self.enter(Phase::Finished);
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: &str) {
        log::error!("{err}");
        self.failed = true;
        self.finish(event_loop);
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let flow = match &mut self.phase {
            Phase::Splash(splash) => splash.frame(),
            Phase::Entry(entry) => entry.frame(),
            Phase::Game(game) => game.frame(self.audio.as_ref()),
            Phase::Starting | Phase::Finished => return,
        };

        match flow {
            ScreenFlow::Continue => {}
            ScreenFlow::Quit => self.finish(event_loop),
            ScreenFlow::Next => match std::mem::replace(&mut self.phase, Phase::Starting) {
                Phase::Splash(splash) => {
                    drop(splash);
                    self.start_entry(event_loop);
                }
                Phase::Entry(entry) => self.start_game(entry.into_stage()),
                other => {
                    self.phase = other;
                    self.finish(event_loop);
                }
            },
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if matches!(self.phase, Phase::Starting) {
            self.start_splash(event_loop);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(stage) = self.phase.stage_mut() {
            stage.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.phase.window_id() != Some(window_id) {
            return;
        }

        match event {
            WindowEvent::Resized(physical_size) => {
                if let Some(stage) = self.phase.stage_mut() {
                    stage.resize(physical_size.width, physical_size.height);
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            other => {
                if let Some(input) = self.phase.input_mut() {
                    record_input(input, &other);
                }
            }
        }
    }
}

fn record_input(input: &mut InputState, event: &WindowEvent) {
    match event {
        WindowEvent::CloseRequested => {
            log::info!("Close requested");
            input.request_close();
        }

        WindowEvent::KeyboardInput { event, .. } => {
            if let PhysicalKey::Code(key_code) = event.physical_key {
                if let Some(key) = map_key(key_code) {
                    match event.state {
                        ElementState::Pressed => input.key_down(key),
                        ElementState::Released => input.key_up(key),
                    }
                }
            }
        }

        WindowEvent::MouseInput { state, button, .. } => {
            if let Some(btn) = map_mouse_button(*button) {
                match state {
                    ElementState::Pressed => input.mouse_down(btn),
                    ElementState::Released => input.mouse_up(btn),
                }
            }
        }

        _ => {}
    }
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::Space => Some(Key::Space),
        _ => None,
    }
}

fn map_mouse_button(button: MouseButton) -> Option<MouseBtn> {
    match button {
        MouseButton::Left => Some(MouseBtn::Left),
        MouseButton::Right => Some(MouseBtn::Right),
        MouseButton::Middle => Some(MouseBtn::Middle),
        _ => None,
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Aeroboo starting...");

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            log::error!("Failed to create event loop: {err}");
            return ExitCode::FAILURE;
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    if let Err(err) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {err}");
        return ExitCode::FAILURE;
    }

    if app.failed {
        ExitCode::FAILURE
    } else {
        log::info!("Goodbye");
        ExitCode::SUCCESS
    }
}
