// Frame-stepping harness shared by the match integration tests.
#![allow(dead_code)]

use grenade_duel::view::{HeadlessStage, StageLayout};
use grenade_duel::{CombatState, MatchConfig, MatchController, MatchEvent};

// Host frame delta used by every scenario.
pub const DT: f32 = 1.0 / 60.0;

// Upper bound for any single wait; a turn takes well under ten seconds.
pub const MAX_WAIT_FRAMES: usize = 60 * 30;

// Charge frames that land a Poison grenade next to the enemy with the default layout.
pub const POISON_HIT_FRAMES: usize = 410;

pub struct Harness {
    pub controller: MatchController<HeadlessStage>,
    pub events: Vec<MatchEvent>,
}

impl Harness {
    pub fn new(config: MatchConfig) -> Self {
        let stage = HeadlessStage::new(StageLayout::new(config.world_scale));
        let controller = MatchController::new(config, stage).expect("valid match setup");
        Self {
            controller,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> Option<CombatState> {
        self.controller.state()
    }

    // Run one frame and keep its events.
    pub fn step(&mut self) {
        let events = self.controller.update(DT);
        self.events.extend(events);
    }

    pub fn run_frames(&mut self, frames: usize) {
        for _ in 0..frames {
            self.step();
        }
    }

    // Step until the predicate holds; panics if it never does.
    pub fn run_until(&mut self, what: &str, done: impl Fn(&Self) -> bool) -> usize {
        for frame in 0..MAX_WAIT_FRAMES {
            if done(self) {
                return frame;
            }
            self.step();
        }
        panic!("timed out waiting for {what}, state {:?}", self.state());
    }

    pub fn run_until_state(&mut self, state: CombatState) -> usize {
        self.run_until(&format!("{state:?}"), |h| h.state() == Some(state))
    }

    pub fn press(&mut self) {
        self.controller.press();
        let events = self.controller.drain_events();
        self.events.extend(events);
    }

    pub fn release(&mut self) {
        self.controller.release();
        let events = self.controller.drain_events();
        self.events.extend(events);
    }

    pub fn restart(&mut self) {
        self.controller.restart();
        let events = self.controller.drain_events();
        self.events.extend(events);
    }

    // Hold the throw input for `frames` frames, then let go.
    pub fn charge_and_release(&mut self, frames: usize) {
        assert_eq!(self.state(), Some(CombatState::PlayerTurn));
        self.press();
        self.run_frames(frames);
        self.release();
    }

    // Wait until the turn that follows the current throw has begun.
    pub fn finish_player_throw(&mut self) {
        self.run_until("end of player throw", |h| {
            !matches!(h.state(), Some(CombatState::PlayerThrow))
        });
    }

    pub fn take_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }
}
