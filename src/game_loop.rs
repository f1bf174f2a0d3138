/// The loop driver: owns the one authoritative `GameState` and advances it
/// frame by frame.
///
/// Frames are requested, not pushed.  While the game is playing the driver
/// keeps exactly one `FrameRequest` pending; the front-end waits for its
/// next display frame and hands the request back through `on_frame`, which
/// runs one tick and requests the following frame.  Pausing or losing simply
/// cancels the pending request, so a stale request delivered afterwards is
/// ignored.

use rand::Rng;
use tracing::info;

use crate::compute::{init_state, menu_state, player_shoot, step};
use crate::config::LoopConfig;
use crate::entities::{Bullet, Enemy, Explosion, GameState, GameStatus, Player};
use crate::input::{InputTracker, Key};

/// Handle of the single pending frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameRequest(u64);

/// Read-only copy of everything a renderer needs for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub explosions: Vec<Explosion>,
    pub score: u32,
    pub lives: u32,
    pub level: u32,
    pub status: GameStatus,
}

pub struct GameLoop<R: Rng> {
    state: GameState,
    input: InputTracker,
    rng: R,
    config: LoopConfig,
    /// Timestamp (ms) of the last tick, or of the moment play (re)started.
    last_tick: f64,
    pending: Option<FrameRequest>,
    requests_issued: u64,
}

impl<R: Rng> GameLoop<R> {
    pub fn new(rng: R, config: LoopConfig) -> Self {
        Self {
            state: menu_state(),
            input: InputTracker::new(),
            rng,
            config,
            last_tick: 0.0,
            pending: None,
            requests_issued: 0,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for tests that need to stage a scene.
    #[doc(hidden)]
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn input(&self) -> &InputTracker {
        &self.input
    }

    pub fn pending_frame(&self) -> Option<FrameRequest> {
        self.pending
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            player: self.state.player.clone(),
            enemies: self.state.enemies.clone(),
            bullets: self.state.bullets.clone(),
            explosions: self.state.explosions.clone(),
            score: self.state.score,
            lives: self.state.player.lives,
            level: self.state.level,
            status: self.state.status,
        }
    }

    // ── Control ──────────────────────────────────────────────────────────────

    /// Begin a game from the menu or after a game over.  Returns `false`
    /// (and does nothing) while a game is running or paused.
    pub fn start(&mut self, now: f64) -> bool {
        match self.state.status {
            GameStatus::Menu | GameStatus::GameOver => {
                self.reset(now);
                true
            }
            GameStatus::Playing | GameStatus::Paused => false,
        }
    }

    /// Throw away the current game, whatever its state, and start afresh.
    pub fn restart(&mut self, now: f64) {
        self.reset(now);
    }

    fn reset(&mut self, now: f64) {
        self.cancel();
        self.state = init_state();
        self.last_tick = now;
        self.schedule();
        info!(enemies = self.state.enemies.len(), "game started");
    }

    pub fn toggle_pause(&mut self, now: f64) {
        match self.state.status {
            GameStatus::Playing => {
                self.state.status = GameStatus::Paused;
                self.cancel();
                info!(score = self.state.score, "game paused");
            }
            GameStatus::Paused => {
                self.state.status = GameStatus::Playing;
                // Time spent paused never reaches the simulation.
                self.last_tick = now;
                self.schedule();
                info!("game resumed");
            }
            GameStatus::Menu | GameStatus::GameOver => {}
        }
    }

    /// Drop the pending frame request, if any.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    fn schedule(&mut self) {
        if self.pending.is_none() {
            self.requests_issued += 1;
            self.pending = Some(FrameRequest(self.requests_issued));
        }
    }

    // ── Input ────────────────────────────────────────────────────────────────

    /// Fire and pause act on the key-down that starts a hold; repeats
    /// before the matching `key_up` are ignored.  Movement keys are only
    /// recorded and picked up by the next tick.
    pub fn key_down(&mut self, key: Key, now: f64) {
        if !self.input.press(key) {
            // Still held from an earlier press: a repeat, not a new edge.
            return;
        }
        match key {
            Key::Fire => self.state = player_shoot(&self.state),
            Key::Pause => self.toggle_pause(now),
            Key::Left | Key::Right => {}
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.input.release(key);
    }

    // ── Frames ───────────────────────────────────────────────────────────────

    /// Run one tick for `request` at time `now` (milliseconds).
    ///
    /// Returns `None` without touching the state when `request` is not the
    /// pending one or the game is not playing.
    pub fn on_frame(&mut self, request: FrameRequest, now: f64) -> Option<Snapshot> {
        if self.pending != Some(request) {
            return None;
        }
        self.pending = None;
        if self.state.status != GameStatus::Playing {
            return None;
        }

        let delta = self.config.clamp_delta(now - self.last_tick);
        self.last_tick = now;

        self.state = step(&self.state, self.input.horizontal(), delta, &mut self.rng);

        if self.state.status == GameStatus::Playing {
            self.schedule();
        } else {
            info!(score = self.state.score, "game over");
        }
        Some(self.snapshot())
    }
}
