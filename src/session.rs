//! Frame scheduling around the fixed-step tick
//!
//! The host calls `frame` from its display-refresh callback with a token it
//! got from `request_frame`/`start`. At most one frame is pending at a time,
//! and tokens from before a `stop` are ignored.

use glam::Vec2;

use crate::consts::{MAX_SUBSTEPS, SIM_DT_MS};
use crate::sim::{GameListener, GameState, Snapshot, TickInput, dispatch, tick};

/// Handle for one scheduled frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameToken {
    generation: u32,
}

/// Latest pointer/touch reading, already in field coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerSample {
    pub active: bool,
    pub x: f32,
    pub y: f32,
}

impl PointerSample {
    fn position(&self) -> Option<Vec2> {
        let pos = Vec2::new(self.x, self.y);
        (self.active && pos.is_finite()).then_some(pos)
    }
}

pub struct Session<L: GameListener> {
    state: GameState,
    listener: L,
    generation: u32,
    running: bool,
    pending: bool,
    last_time_ms: Option<u64>,
    accumulator_ms: u64,
    pointer: PointerSample,
    fire: bool,
    pause_requested: bool,
    autopilot: bool,
}

impl<L: GameListener> Session<L> {
    pub fn new(state: GameState, listener: L) -> Self {
        Self {
            state,
            listener,
            generation: 0,
            running: false,
            pending: false,
            last_time_ms: None,
            accumulator_ms: 0,
            pointer: PointerSample::default(),
            fire: false,
            pause_requested: false,
            autopilot: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Record the latest pointer reading; it is read once at the next frame
    pub fn pointer(&mut self, sample: PointerSample) {
        self.pointer = sample;
    }

    pub fn set_fire(&mut self, fire: bool) {
        self.fire = fire;
    }

    /// Toggle pause on the next step
    pub fn request_pause(&mut self) {
        self.pause_requested = true;
    }

    pub fn set_autopilot(&mut self, autopilot: bool) {
        self.autopilot = autopilot;
    }

    pub fn start_game(&mut self) -> bool {
        let started = self.state.start_game();
        self.flush_events();
        started
    }

    pub fn end_game(&mut self) -> bool {
        let ended = self.state.end_game();
        self.flush_events();
        ended
    }

    pub fn reset(&mut self) -> bool {
        let reset = self.state.reset();
        self.flush_events();
        reset
    }

    /// Begin scheduling frames
    pub fn start(&mut self) -> Option<FrameToken> {
        if !self.running {
            self.running = true;
            self.last_time_ms = None;
            self.accumulator_ms = 0;
            log::debug!("Session started (generation {})", self.generation);
        }
        self.request_frame()
    }

    /// Ask for the next frame; `None` while one is already pending
    pub fn request_frame(&mut self) -> Option<FrameToken> {
        if !self.running || self.pending {
            return None;
        }
        self.pending = true;
        Some(FrameToken {
            generation: self.generation,
        })
    }

    /// Stop scheduling; outstanding tokens become stale
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.pending = false;
        self.generation = self.generation.wrapping_add(1);
        log::debug!("Session stopped");
    }

    /// Run one display frame at host time `now_ms`.
    ///
    /// Returns the token for the next frame, or `None` if the token was
    /// stale or the session is stopped.
    pub fn frame(&mut self, token: FrameToken, now_ms: u64) -> Option<FrameToken> {
        if !self.running || !self.pending || token.generation != self.generation {
            return None;
        }
        self.pending = false;

        let elapsed = self
            .last_time_ms
            .map(|last| now_ms.saturating_sub(last))
            .unwrap_or(0);
        self.last_time_ms = Some(now_ms);
        self.accumulator_ms += elapsed;

        let mut input = TickInput {
            pointer: self.pointer.position(),
            fire: self.fire,
            pause: std::mem::take(&mut self.pause_requested),
            autopilot: self.autopilot,
        };

        let mut substeps = 0;
        while self.accumulator_ms >= SIM_DT_MS && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &input, SIM_DT_MS);
            self.accumulator_ms -= SIM_DT_MS;
            substeps += 1;

            // One-shot inputs apply to the first step only
            input.pause = false;
        }

        if self.accumulator_ms >= SIM_DT_MS {
            log::debug!("Dropping {} ms of backlog", self.accumulator_ms);
            self.accumulator_ms %= SIM_DT_MS;
        }

        // A pause request that found no step to run waits for the next frame
        if substeps == 0 && input.pause {
            self.pause_requested = true;
        }

        self.flush_events();
        self.request_frame()
    }

    fn flush_events(&mut self) {
        let events = self.state.take_events();
        dispatch(&events, &mut self.listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GameEvent, GamePhase, MatchSummary};
    use crate::tuning::Tuning;

    #[derive(Default)]
    struct Recorder {
        scores: Vec<u64>,
        game_overs: Vec<MatchSummary>,
        events: usize,
    }

    impl GameListener for Recorder {
        fn on_score_update(&mut self, score: u64) {
            self.scores.push(score);
        }

        fn on_game_over(&mut self, summary: &MatchSummary) {
            self.game_overs.push(*summary);
        }

        fn on_event(&mut self, _event: &GameEvent) {
            self.events += 1;
        }
    }

    fn session() -> Session<Recorder> {
        let state = GameState::new(21, Tuning::default(), Vec::new());
        Session::new(state, Recorder::default())
    }

    #[test]
    fn test_no_duplicate_frames() {
        let mut s = session();
        assert!(s.request_frame().is_none());
        let token = s.start();
        assert!(token.is_some());
        assert!(s.request_frame().is_none());
        assert!(s.start().is_none());
    }

    #[test]
    fn test_stale_token_ignored() {
        let mut s = session();
        s.start_game();
        let old = s.start().unwrap();
        s.stop();
        assert!(s.frame(old, 100).is_none());

        let fresh = s.start().unwrap();
        assert_ne!(old, fresh);
        assert!(s.frame(old, 100).is_none());
        assert!(s.frame(fresh, 100).is_some());
    }

    #[test]
    fn test_frames_drive_fixed_steps() {
        let mut s = session();
        s.start_game();
        let mut token = s.start().unwrap();
        token = s.frame(token, 1_000).unwrap();
        assert_eq!(s.state().clock_ms, 0);

        token = s.frame(token, 1_040).unwrap();
        assert_eq!(s.state().clock_ms, 2 * SIM_DT_MS);

        // Leftover 8 ms carries into the next frame
        s.frame(token, 1_048).unwrap();
        assert_eq!(s.state().clock_ms, 3 * SIM_DT_MS);
    }

    #[test]
    fn test_substeps_capped() {
        let mut s = session();
        s.start_game();
        let token = s.start().unwrap();
        let token = s.frame(token, 0).unwrap();
        s.frame(token, 10_000);
        assert_eq!(s.state().clock_ms, MAX_SUBSTEPS as u64 * SIM_DT_MS);
    }

    #[test]
    fn test_pause_request_toggles_once() {
        let mut s = session();
        s.start_game();
        let token = s.start().unwrap();
        let token = s.frame(token, 0).unwrap();
        s.request_pause();
        let token = s.frame(token, 64).unwrap();
        assert_eq!(s.state().phase, GamePhase::Paused);

        s.frame(token, 128).unwrap();
        assert_eq!(s.state().phase, GamePhase::Paused);
    }

    #[test]
    fn test_pointer_sampled_per_frame() {
        let mut s = session();
        s.start_game();
        let token = s.start().unwrap();
        let token = s.frame(token, 0).unwrap();
        s.pointer(PointerSample {
            active: true,
            x: 10.0,
            y: 10.0,
        });
        s.frame(token, 16).unwrap();
        assert!(s.state().player.target.is_some());

        let inactive = PointerSample::default();
        assert!(inactive.position().is_none());
        let nan = PointerSample {
            active: true,
            x: f32::NAN,
            y: 0.0,
        };
        assert!(nan.position().is_none());
    }

    #[test]
    fn test_listener_sees_game_over_once_per_match() {
        let mut s = session();
        for _ in 0..3 {
            s.start_game();
            s.end_game();
            s.end_game();
        }
        assert_eq!(s.listener().game_overs.len(), 3);
        assert_eq!(s.listener().scores, vec![0, 0, 0]);
        assert!(s.listener().events > 0);
    }
}
