use crate::game::{GameEvent, GameState, GameTuning, SpriteMetrics};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_dt")]
    pub dt: f64,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct ReplayFrame {
    #[serde(default)]
    pub click: bool,
    #[serde(default)]
    pub toggle_pause: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

/// Result of driving a `GameState` through a replay.
pub struct ReplayRun {
    pub state: GameState,
    pub events: Vec<(usize, GameEvent)>,
}

impl ReplayRun {
    pub fn count(&self, wanted: GameEvent) -> usize {
        self.events.iter().filter(|(_, e)| *e == wanted).count()
    }
}

impl ReplaySequence {
    /// One entry per simulated frame, `repeat` expanded. Clicks and pause
    /// toggles apply to the first frame of a repeated block only.
    pub fn expanded_frames(&self) -> Vec<ReplayFrame> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for i in 0..frame.repeat.max(1) {
                out.push(ReplayFrame {
                    click: frame.click && i == 0,
                    toggle_pause: frame.toggle_pause && i == 0,
                    repeat: 1,
                });
            }
        }
        out
    }

    /// Feed the frames to `state` the way the game screen does: input first,
    /// then one update.
    pub fn run(&self, mut state: GameState) -> ReplayRun {
        let mut events = Vec::new();
        for (index, frame) in self.expanded_frames().into_iter().enumerate() {
            if frame.toggle_pause {
                state.toggle_pause();
            }
            if frame.click {
                state.fire();
            }
            events.extend(state.update(self.dt).into_iter().map(|e| (index, e)));
        }
        ReplayRun { state, events }
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.dt <= 0.0 {
        return Err("Replay validation failed: dt must be > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_dt() -> f64 {
    0.02
}

const fn default_repeat() -> u32 {
    1
}

pub fn standard_state() -> GameState {
    GameState::new(
        GameTuning::default(),
        SpriteMetrics {
            bird: (128, 96),
            cannon: (96, 96),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "aeroboo_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn load(name_hint: &str, json: &str) -> ReplaySequence {
        let path = temp_file_path(name_hint);
        fs::write(&path, json).expect("write replay file");
        let replay = load_replay_from_path(&path).expect("replay should load");
        let _ = fs::remove_file(path);
        replay
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let replay = load(
            "parse",
            r#"{
              "dt": 0.02,
              "frames": [
                { "repeat": 3 },
                { "click": true, "repeat": 2 }
              ]
            }"#,
        );
        let expanded = replay.expanded_frames();
        assert_eq!(expanded.len(), 5);
        assert!(expanded[3].click);
        assert!(!expanded[4].click);
    }

    #[test]
    fn invalid_replays_are_rejected() {
        let path = temp_file_path("invalid");
        fs::write(&path, r#"{ "dt": 0.0, "frames": [ {} ] }"#).expect("write replay file");
        assert!(load_replay_from_path(&path).is_err());
        fs::write(&path, r#"{ "frames": [] }"#).expect("write replay file");
        assert!(load_replay_from_path(&path).is_err());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_run_is_deterministic() {
        let replay = load(
            "deterministic",
            r#"{
              "dt": 0.02,
              "frames": [
                { "repeat": 60 },
                { "click": true, "repeat": 40 },
                { "toggle_pause": true, "repeat": 10 },
                { "toggle_pause": true, "click": true, "repeat": 200 }
              ]
            }"#,
        );

        let run_a = replay.run(standard_state());
        let run_b = replay.run(standard_state());
        assert_eq!(run_a.events, run_b.events);
        assert_eq!(run_a.state.bird, run_b.state.bird);
        assert_eq!(run_a.state.round, run_b.state.round);
        assert_eq!(run_a.state.projectile, run_b.state.projectile);
    }

    #[test]
    fn one_click_fires_exactly_once() {
        let replay = load(
            "single_shot",
            r#"{
              "dt": 0.02,
              "frames": [
                { "click": true },
                { "repeat": 100 }
              ]
            }"#,
        );
        let run = replay.run(standard_state());
        assert_eq!(run.count(GameEvent::CannonFired), 1);
        // Twelve 20 ms updates reach the last cannon frame at 240 ms.
        assert_eq!(run.events[0], (11, GameEvent::CannonFired));
    }

    #[test]
    fn paused_clicks_fire_after_resume() {
        let replay = load(
            "paused_click",
            r#"{
              "dt": 0.02,
              "frames": [
                { "toggle_pause": true, "click": true, "repeat": 50 },
                { "toggle_pause": true, "repeat": 30 }
              ]
            }"#,
        );
        let run = replay.run(standard_state());
        assert_eq!(run.count(GameEvent::CannonFired), 1);
        assert!(run.events.iter().all(|(frame, _)| *frame >= 50));
    }

    #[test]
    fn well_timed_shot_downs_bird_and_round_resets() {
        // Fired at 2.0 s, the shot leaves the muzzle at 2.24 s and climbs to the
        // bird's row 0.66 s later, when the bird is at x=288 over the cannon.
        let replay = load(
            "hit",
            r#"{
              "dt": 0.02,
              "frames": [
                { "repeat": 100 },
                { "click": true, "repeat": 200 }
              ]
            }"#,
        );
        let run = replay.run(standard_state());
        assert_eq!(run.count(GameEvent::CannonFired), 1);
        assert_eq!(run.count(GameEvent::BirdHit), 1);
        assert_eq!(run.count(GameEvent::BannerShown), 1);
        assert_eq!(run.count(GameEvent::RoundReset), 1);
        assert_eq!(run.state.birds_downed, 1);
        assert!(run.state.is_bird_flying());
    }
}
