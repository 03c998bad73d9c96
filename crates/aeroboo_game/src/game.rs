//! The shooting-round state machine.
//!
//! `GameState` owns every entity (bird, cannon, projectile, explosion, winner
//! banner) and advances them by measured frame time. It has no GPU or audio
//! handles: `update` reports what happened as `GameEvent`s for the driver to
//! turn into sounds, and `compose` describes the frame as a list of
//! `SceneItem`s for the driver to draw.
//!
//! A round cycles through two phases:
//!
//! ```text
//!   Flying --(projectile hits bird)--> Downed { explosion 0.5s, banner 2.0s }
//!     ^                                              |
//!     +-------------(banner expires, bird reset)-----+
//! ```
//!
//! The cannon is independent of the round: it can fire in either phase, but a
//! projectile only scores against a flying bird.

use aeroboo_core::animation::{secs_to_us, FrameAnimation, TickResult};
use aeroboo_core::geometry::{fit_to_width, PixelRect, Rect};

/// Fixed gameplay constants.
#[derive(Debug, Clone, Copy)]
pub struct GameTuning {
    pub screen_w: f32,
    pub screen_h: f32,
    /// Bird horizontal speed (px/s, moving left).
    pub bird_speed: f32,
    pub bird_start_y: f32,
    pub bird_frame_us: u64,
    /// Distance past either screen edge where the bird wraps/respawns.
    pub wrap_margin: f32,
    pub cannon_frames: usize,
    pub cannon_frame_us: u64,
    pub cannon_bottom_margin: f32,
    /// Projectile spawn height as a fraction of the cannon height.
    pub muzzle_height: f32,
    pub projectile_speed: f32,
    pub projectile_size: (i32, i32),
    /// How far above the top edge a projectile may travel before it is dropped.
    pub projectile_despawn_margin: f32,
    pub explosion_us: u64,
    pub banner_us: u64,
    pub banner_max_width: u32,
    pub sky_color: [u8; 3],
    pub projectile_color: [u8; 3],
    pub music_volume: f32,
}

impl Default for GameTuning {
    fn default() -> Self {
        Self {
            screen_w: 800.0,
            screen_h: 600.0,
            bird_speed: 180.0,
            bird_start_y: 12.0,
            bird_frame_us: 180_000,
            wrap_margin: 10.0,
            cannon_frames: 3,
            cannon_frame_us: 120_000,
            cannon_bottom_margin: 8.0,
            muzzle_height: 0.15,
            projectile_speed: 600.0,
            projectile_size: (10, 10),
            projectile_despawn_margin: 50.0,
            explosion_us: 500_000,
            banner_us: 2_000_000,
            banner_max_width: 400,
            sky_color: [135, 206, 235],
            projectile_color: [220, 200, 60],
            music_volume: 0.6,
        }
    }
}

/// On-screen sizes of the sprites that take part in gameplay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteMetrics {
    pub bird: (i32, i32),
    pub cannon: (i32, i32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub x: f32,
    pub y: f32,
    pub animation: FrameAnimation,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Explosion {
    pub x: f32,
    pub y: f32,
    pub remaining_us: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RoundPhase {
    /// The bird is crossing the screen and can be hit.
    Flying,
    /// The bird was hit. The explosion and the winner banner run concurrently;
    /// the explosion ends first and the banner's expiry starts the next round.
    Downed {
        explosion: Option<Explosion>,
        banner_remaining_us: u64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum CannonState {
    Idle,
    Firing {
        animation: FrameAnimation,
        projectile_spawned: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
}

/// Things that happened during an update, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// The cannon reached its last frame and launched a projectile.
    CannonFired,
    /// A projectile struck the flying bird.
    BirdHit,
    /// The winner banner went up (always right after `BirdHit`).
    BannerShown,
    /// The banner expired and a fresh bird entered from the right.
    RoundReset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteId {
    Bird(usize),
    Cannon(usize),
    Explosion,
    Banner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneItem {
    Sprite { id: SpriteId, rect: PixelRect },
    Fill { rect: PixelRect, color: [u8; 3] },
}

pub struct GameState {
    pub tuning: GameTuning,
    pub metrics: SpriteMetrics,
    pub bird: Bird,
    pub round: RoundPhase,
    pub cannon: CannonState,
    pub projectile: Option<Projectile>,
    pub paused: bool,
    pub birds_downed: u32,
}

impl GameState {
    pub fn new(tuning: GameTuning, metrics: SpriteMetrics) -> Self {
        Self {
            bird: Bird {
                x: tuning.screen_w + tuning.wrap_margin,
                y: tuning.bird_start_y,
                animation: FrameAnimation::looping(2, tuning.bird_frame_us),
            },
            round: RoundPhase::Flying,
            cannon: CannonState::Idle,
            projectile: None,
            paused: false,
            birds_downed: 0,
            tuning,
            metrics,
        }
    }

    /// Top-left corner of the cannon: centered horizontally, resting just
    /// above the bottom edge.
    pub fn cannon_origin(&self) -> (f32, f32) {
        let (cw, ch) = self.metrics.cannon;
        (
            (self.tuning.screen_w - cw as f32) / 2.0,
            self.tuning.screen_h - ch as f32 - self.tuning.cannon_bottom_margin,
        )
    }

    pub fn bird_rect(&self) -> Rect {
        let (bw, bh) = self.metrics.bird;
        Rect::new(self.bird.x, self.bird.y, bw as f32, bh as f32)
    }

    pub fn projectile_rect(&self, projectile: &Projectile) -> Rect {
        let (pw, ph) = self.tuning.projectile_size;
        Rect::new(projectile.x, projectile.y, pw as f32, ph as f32)
    }

    pub fn is_bird_flying(&self) -> bool {
        matches!(self.round, RoundPhase::Flying)
    }

    pub fn is_banner_active(&self) -> bool {
        matches!(self.round, RoundPhase::Downed { .. })
    }

    pub fn explosion(&self) -> Option<&Explosion> {
        match &self.round {
            RoundPhase::Downed { explosion, .. } => explosion.as_ref(),
            RoundPhase::Flying => None,
        }
    }

    /// Background music plays exactly while a bird is flying.
    pub fn wants_music(&self) -> bool {
        self.is_bird_flying()
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Start the firing animation. Ignored while already firing. Accepted while
    /// paused; the animation only advances once unpaused.
    pub fn fire(&mut self) -> bool {
        if !matches!(self.cannon, CannonState::Idle) {
            return false;
        }
        self.cannon = CannonState::Firing {
            animation: FrameAnimation::once(self.tuning.cannon_frames, self.tuning.cannon_frame_us),
            projectile_spawned: false,
        };
        true
    }

    /// Cannon frame to draw: the animation frame while firing, frame 0 at rest.
    pub fn cannon_frame(&self) -> usize {
        match &self.cannon {
            CannonState::Idle => 0,
            CannonState::Firing { animation, .. } => animation
                .frame_index
                .min(self.tuning.cannon_frames.saturating_sub(1)),
        }
    }

    /// Advance the simulation by `dt` seconds. Does nothing while paused.
    pub fn update(&mut self, dt: f64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.paused {
            return events;
        }
        let dt_us = secs_to_us(dt);
        let dt = dt as f32;

        self.update_bird(dt, dt_us);
        self.update_cannon(dt_us, &mut events);
        self.update_projectile(dt, &mut events);
        self.update_round_timers(dt_us, &mut events);
        events
    }

    fn update_bird(&mut self, dt: f32, dt_us: u64) {
        if !self.is_bird_flying() {
            return;
        }
        let (bw, _) = self.metrics.bird;
        self.bird.x -= self.tuning.bird_speed * dt;
        if self.bird.x < -(bw as f32) - self.tuning.wrap_margin {
            self.bird.x = self.tuning.screen_w + self.tuning.wrap_margin;
        }
        self.bird.animation.tick(dt_us);
    }

    fn update_cannon(&mut self, dt_us: u64, events: &mut Vec<GameEvent>) {
        let mut finished = false;
        let mut spawn = false;
        if let CannonState::Firing {
            animation,
            projectile_spawned,
        } = &mut self.cannon
        {
            if animation.tick(dt_us) == TickResult::Finished {
                finished = true;
            } else if animation.is_last_frame() && !*projectile_spawned {
                *projectile_spawned = true;
                spawn = true;
            }
        }

        if finished {
            self.cannon = CannonState::Idle;
        }
        if spawn {
            let (cx, cy) = self.cannon_origin();
            let (cw, ch) = self.metrics.cannon;
            let (pw, _) = self.tuning.projectile_size;
            // One projectile slot: a new shot replaces any still in flight.
            self.projectile = Some(Projectile {
                x: cx + cw as f32 * 0.5 - pw as f32 * 0.5,
                y: cy + ch as f32 * self.tuning.muzzle_height,
            });
            events.push(GameEvent::CannonFired);
        }
    }

    fn update_projectile(&mut self, dt: f32, events: &mut Vec<GameEvent>) {
        let Some(projectile) = self.projectile.as_mut() else {
            return;
        };
        projectile.y -= self.tuning.projectile_speed * dt;
        let projectile = *projectile;

        let (_, ph) = self.tuning.projectile_size;
        if projectile.y + (ph as f32) < -self.tuning.projectile_despawn_margin {
            self.projectile = None;
            return;
        }

        if self.is_bird_flying() && self.projectile_rect(&projectile).intersects(&self.bird_rect())
        {
            self.projectile = None;
            self.round = RoundPhase::Downed {
                explosion: Some(Explosion {
                    x: self.bird.x,
                    y: self.bird.y,
                    remaining_us: self.tuning.explosion_us,
                }),
                banner_remaining_us: self.tuning.banner_us,
            };
            self.birds_downed += 1;
            log::info!(
                "Bird down at ({:.0}, {:.0}), total {}",
                self.bird.x,
                self.bird.y,
                self.birds_downed
            );
            events.push(GameEvent::BirdHit);
            events.push(GameEvent::BannerShown);
        }
    }

    fn update_round_timers(&mut self, dt_us: u64, events: &mut Vec<GameEvent>) {
        let RoundPhase::Downed {
            explosion,
            banner_remaining_us,
        } = &mut self.round
        else {
            return;
        };

        let explosion_over = explosion.as_mut().is_some_and(|e| {
            e.remaining_us = e.remaining_us.saturating_sub(dt_us);
            e.remaining_us == 0
        });
        if explosion_over {
            *explosion = None;
        }

        *banner_remaining_us = banner_remaining_us.saturating_sub(dt_us);
        if *banner_remaining_us == 0 {
            self.reset_round();
            events.push(GameEvent::RoundReset);
        }
    }

    fn reset_round(&mut self) {
        self.round = RoundPhase::Flying;
        self.bird.x = self.tuning.screen_w + self.tuning.wrap_margin;
        self.bird.animation.reset();
    }

    /// Describe the frame in draw order.
    ///
    /// `banner_size` is the native size of the winner banner image, or `None`
    /// when it failed to load; without it the explosion and cannon stay
    /// visible during the banner period.
    pub fn compose(&self, banner_size: Option<(u32, u32)>) -> Vec<SceneItem> {
        let mut items = Vec::with_capacity(3);

        if let (true, Some(native)) = (self.is_banner_active(), banner_size) {
            let (w, h) = fit_to_width(native, self.tuning.banner_max_width);
            items.push(SceneItem::Sprite {
                id: SpriteId::Banner,
                rect: PixelRect::centered(
                    w,
                    h,
                    self.tuning.screen_w as i32,
                    self.tuning.screen_h as i32,
                ),
            });
            return items;
        }

        if let Some(explosion) = self.explosion() {
            let at = Rect::new(explosion.x, explosion.y, 0.0, 0.0);
            items.push(SceneItem::Sprite {
                id: SpriteId::Explosion,
                rect: at.snapped(self.metrics.bird),
            });
        } else if self.is_bird_flying() {
            items.push(SceneItem::Sprite {
                id: SpriteId::Bird(self.bird.animation.frame_index),
                rect: self.bird_rect().snapped(self.metrics.bird),
            });
        }

        let (cx, cy) = self.cannon_origin();
        items.push(SceneItem::Sprite {
            id: SpriteId::Cannon(self.cannon_frame()),
            rect: Rect::new(cx, cy, 0.0, 0.0).snapped(self.metrics.cannon),
        });

        if let Some(projectile) = &self.projectile {
            items.push(SceneItem::Fill {
                rect: self
                    .projectile_rect(projectile)
                    .snapped(self.tuning.projectile_size),
                color: self.tuning.projectile_color,
            });
        }

        items
    }
}
