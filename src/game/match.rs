//! Match controller and per-frame update

use std::mem;

use tracing::{debug, info, warn};

use crate::config::MatchConfig;
use crate::error::MatchError;
use crate::view::{Presentation, ViewEvent};

use super::ai::{EnemyPlanner, ThrowPlan};
use super::combat::{Combatant, DamageResolver};
use super::events::MatchEvent;
use super::force::ForceModel;
use super::fsm::{StateMachine, StateSpec};
use super::grenade::{launch_velocity, GrenadeEffect, GrenadeId, GrenadeInstance, GrenadeState};
use super::physics::Ballistics;
use super::signal::Topic;
use super::snapshot::{ChargeIndicator, CombatantSnapshot, GrenadeSnapshot, MatchSnapshot};
use super::{CombatState, Side};

/// What a state subscription does when its topic fires
#[derive(Debug, Clone, Copy, PartialEq)]
enum Reaction {
    Enter(CombatState),
    BeginCharge,
    ReleaseCharge,
    Throw(Side),
    ResolveTurn(Side),
    Restart,
}

/// Owns the combatants, the force model and the active grenades, and
/// sequences turns through the combat state machine.
pub struct MatchController<V> {
    config: MatchConfig,
    view: V,
    fsm: StateMachine<CombatState, Reaction>,
    force: ForceModel,
    ballistics: Ballistics,
    resolver: DamageResolver,
    planner: EnemyPlanner,
    enemy_plan: Option<ThrowPlan>,
    combatants: [Combatant; 2],
    grenades: Vec<GrenadeInstance>,
    player_effect: GrenadeEffect,
    winner: Option<Side>,
    tick: u64,
    outbox: Vec<MatchEvent>,
}

impl<V: Presentation> MatchController<V> {
    /// Validate the setup and enter `Init`
    pub fn new(config: MatchConfig, view: V) -> Result<Self, MatchError> {
        config.validate()?;
        for side in Side::ALL {
            let timing = view
                .release_timing(side)
                .ok_or(MatchError::MissingReleaseTiming(side))?;
            timing.validate(side)?;
        }

        let combatants = [
            Combatant::new(
                Side::Player,
                view.combatant_position(Side::Player),
                config.hp_max,
            ),
            Combatant::new(
                Side::Enemy,
                view.combatant_position(Side::Enemy),
                config.hp_max,
            ),
        ];

        let mut fsm = StateMachine::new();
        for state in CombatState::ALL {
            let has_update = state == CombatState::PlayerTurn;
            fsm.add_state(state, StateSpec { has_update });
        }

        info!(
            seed = config.seed,
            hp_max = config.hp_max,
            world_scale = config.world_scale,
            "match created"
        );

        let mut controller = Self {
            force: ForceModel::new(config.charge_max),
            ballistics: Ballistics::from_config(&config),
            resolver: DamageResolver::from_config(&config),
            planner: EnemyPlanner::new(config.seed, config.world_scale),
            player_effect: config.player_effect,
            config,
            view,
            fsm,
            enemy_plan: None,
            combatants,
            grenades: Vec::new(),
            winner: None,
            tick: 0,
            outbox: Vec::new(),
        };
        controller.enter(CombatState::Init);
        Ok(controller)
    }

    /// Advance one frame: state update, then grenades, then the view.
    /// Returns every event raised since the previous call.
    pub fn update(&mut self, dt: f32) -> Vec<MatchEvent> {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.tick += 1;

        self.update_state(dt);
        self.update_grenades(dt);

        let snapshot = self.snapshot();
        for event in self.view.update(dt, &snapshot) {
            self.handle_view_event(event);
        }

        self.drain_events()
    }

    /// Throw input pressed
    pub fn press(&mut self) {
        self.dispatch(Topic::Press);
    }

    /// Throw input released
    pub fn release(&mut self) {
        self.dispatch(Topic::Release);
    }

    /// Start a new match. Only honored in `GameOver`.
    pub fn restart(&mut self) {
        self.dispatch(Topic::Restart);
    }

    /// Deliver a presentation signal immediately
    pub fn handle_view_event(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::SetupComplete => self.dispatch(Topic::SetupComplete),
            ViewEvent::ReleaseTiming(side) => self.dispatch(Topic::ReleaseTiming(side)),
            ViewEvent::AnimationFinished(side) => self.dispatch(Topic::AnimationFinished(side)),
            ViewEvent::ExplosionFinished(id) => self.finish_explosion(id),
        }
    }

    pub fn set_player_effect(&mut self, effect: GrenadeEffect) {
        self.player_effect = effect;
    }

    pub fn player_effect(&self) -> GrenadeEffect {
        self.player_effect
    }

    pub fn state(&self) -> Option<CombatState> {
        self.fsm.current()
    }

    pub fn combatant(&self, side: Side) -> &Combatant {
        &self.combatants[side.index()]
    }

    pub fn grenades(&self) -> &[GrenadeInstance] {
        &self.grenades
    }

    pub fn force(&self) -> &ForceModel {
        &self.force
    }

    /// force / max force, for a progress bar
    pub fn charge_progress(&self) -> f32 {
        self.force.progress()
    }

    pub fn charge_indicator(&self) -> ChargeIndicator {
        ChargeIndicator {
            progress: self.charge_progress(),
            visible: self.state() == Some(CombatState::PlayerTurn),
        }
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Events raised outside `update` (input, restart, direct view signals)
    pub fn drain_events(&mut self) -> Vec<MatchEvent> {
        mem::take(&mut self.outbox)
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            tick: self.tick,
            state: self.state(),
            charge: self.charge_indicator(),
            combatants: self.combatants.iter().map(CombatantSnapshot::from).collect(),
            grenades: self.grenades.iter().map(GrenadeSnapshot::from).collect(),
            winner: self.winner,
        }
    }

    fn dispatch(&mut self, topic: Topic) {
        let pending = self.fsm.pending(topic);
        if pending.is_empty() {
            debug!(?topic, state = ?self.state(), "signal ignored");
            return;
        }
        for id in pending {
            match self.fsm.deliver(id) {
                Some(reaction) => self.react(reaction),
                None => debug!(?topic, "subscription dropped before delivery"),
            }
        }
    }

    fn react(&mut self, reaction: Reaction) {
        match reaction {
            Reaction::Enter(state) => self.enter(state),
            Reaction::BeginCharge => {
                self.force.reset();
                self.force.set_charging(true);
                self.outbox.push(MatchEvent::ChargeStarted);
                self.fsm.on_once(Topic::Release, Reaction::ReleaseCharge);
            }
            Reaction::ReleaseCharge => self.release_charge(),
            Reaction::Throw(side) => {
                self.throw_grenade(side);
                self.fsm
                    .on_once(Topic::GrenadeDestroyed, Reaction::ResolveTurn(side));
            }
            Reaction::ResolveTurn(side) => self.resolve_turn(side),
            Reaction::Restart => {
                self.reset_match();
                self.enter(CombatState::PlayerTurn);
            }
        }
    }

    fn enter(&mut self, state: CombatState) {
        let mut next = Some(state);
        while let Some(state) = next.take() {
            let Some(transition) = self.fsm.start_state(state) else {
                return;
            };
            info!(from = ?transition.from, to = ?state, "turn changed");
            self.outbox.push(MatchEvent::TurnChanged { state });
            next = self.on_enter(state);
        }
    }

    /// Entry action. Returns a state to chain into immediately.
    fn on_enter(&mut self, state: CombatState) -> Option<CombatState> {
        match state {
            CombatState::Init => {
                self.view.play_intro();
                self.fsm.on_once(
                    Topic::SetupComplete,
                    Reaction::Enter(CombatState::PlayerTurn),
                );
                None
            }
            CombatState::PlayerTurn => {
                self.force.reset();
                self.fsm.on_once(Topic::Press, Reaction::BeginCharge);
                None
            }
            CombatState::PlayerThrow => {
                self.force.set_charging(false);
                self.view.play_throw_animation(Side::Player);
                self.fsm.on_once(
                    Topic::ReleaseTiming(Side::Player),
                    Reaction::Throw(Side::Player),
                );
                None
            }
            CombatState::EnemyTurn => {
                let plan = self.planner.plan();
                debug!(effect = ?plan.effect, speed = plan.speed, "enemy picked a throw");
                self.enemy_plan = Some(plan);
                Some(CombatState::EnemyThrow)
            }
            CombatState::EnemyThrow => {
                self.view.play_throw_animation(Side::Enemy);
                self.fsm.on_once(
                    Topic::ReleaseTiming(Side::Enemy),
                    Reaction::Throw(Side::Enemy),
                );
                None
            }
            CombatState::GameOver => {
                match self.winner {
                    Some(winner) => {
                        info!(winner = ?winner, tick = self.tick, "game over");
                        self.view.play_defeat_animation(winner.opponent());
                        self.outbox.push(MatchEvent::GameOver { winner });
                    }
                    None => warn!("game over without a winner"),
                }
                self.fsm.on_once(Topic::Restart, Reaction::Restart);
                None
            }
        }
    }

    fn update_state(&mut self, dt: f32) {
        if !self.fsm.has_update() {
            return;
        }
        if self.state() == Some(CombatState::PlayerTurn) {
            self.force.tick(dt);
            if self.force.is_charging() && self.force.is_full() {
                info!(force = self.force.current_force(), "charge maxed, auto-release");
                self.release_charge();
            }
        }
    }

    fn release_charge(&mut self) {
        self.force.set_charging(false);
        debug!(
            force = self.force.current_force(),
            progress = self.force.progress(),
            "charge released"
        );
        self.enter(CombatState::PlayerThrow);
    }

    fn throw_grenade(&mut self, side: Side) {
        let (effect, speed) = match side {
            Side::Player => {
                let effect = self.player_effect;
                let tuning = effect.tuning().scaled(self.config.world_scale);
                (effect, self.force.release_speed(&tuning))
            }
            Side::Enemy => {
                let plan = self.enemy_plan.take().unwrap_or_else(|| self.planner.plan());
                (plan.effect, plan.speed)
            }
        };

        let position = self.view.combatant_position(side);
        self.combatants[side.index()].position = position;
        let origin = self.config.release_point(position, side.facing());
        let velocity = launch_velocity(side, speed);

        let grenade =
            GrenadeInstance::new(effect, side, origin, velocity, self.config.world_scale);
        self.view.spawn_grenade_visual(grenade.id, effect, origin);

        info!(
            grenade_id = %grenade.id,
            owner = ?side,
            effect = ?effect,
            speed,
            "grenade thrown"
        );
        self.outbox.push(MatchEvent::GrenadeThrown {
            grenade_id: grenade.id,
            owner: side,
            effect,
            origin,
            velocity,
        });
        self.grenades.push(grenade);
    }

    fn update_grenades(&mut self, dt: f32) {
        let mut landed = Vec::new();
        for grenade in self.grenades.iter_mut() {
            if self.ballistics.advance(grenade, dt).is_some() {
                landed.push(grenade.id);
            }
        }
        for id in landed {
            self.detonate(id);
        }

        let (destroyed, active): (Vec<_>, Vec<_>) = mem::take(&mut self.grenades)
            .into_iter()
            .partition(|g| g.state == GrenadeState::Destroyed);
        self.grenades = active;

        for grenade in destroyed {
            debug!(grenade_id = %grenade.id, "grenade removed");
            self.outbox.push(MatchEvent::GrenadeDestroyed {
                grenade_id: grenade.id,
                owner: grenade.owner,
            });
            self.dispatch(Topic::GrenadeDestroyed);
        }
    }

    /// Resolve damage for a grenade that just landed and start its explosion
    fn detonate(&mut self, id: GrenadeId) {
        let Some(grenade) = self.grenades.iter().find(|g| g.id == id) else {
            return;
        };
        let defender_position = self.view.combatant_position(grenade.owner.opponent());

        let [player, enemy] = &mut self.combatants;
        let (attacker, defender) = match grenade.owner {
            Side::Player => (&*player, enemy),
            Side::Enemy => (&*enemy, player),
        };
        defender.position = defender_position;

        let event = self.resolver.resolve_impact(grenade, attacker, defender);
        self.view.trigger_explosion_visual(id);
        self.outbox.push(MatchEvent::Damage(event));
    }

    fn finish_explosion(&mut self, id: GrenadeId) {
        let Some(grenade) = self.grenades.iter_mut().find(|g| g.id == id) else {
            debug!(grenade_id = %id, "explosion finished for unknown grenade");
            return;
        };
        if !grenade.finish_explosion() {
            warn!(grenade_id = %id, state = ?grenade.state, "explosion finished out of order");
        }
    }

    fn resolve_turn(&mut self, thrower: Side) {
        let defender = thrower.opponent();
        if self.combatant(defender).is_alive() {
            let next = match thrower {
                Side::Player => CombatState::EnemyTurn,
                Side::Enemy => CombatState::PlayerTurn,
            };
            self.enter(next);
        } else {
            self.winner = Some(thrower);
            self.enter(CombatState::GameOver);
        }
    }

    fn reset_match(&mut self) {
        for side in Side::ALL {
            let position = self.view.combatant_position(side);
            self.combatants[side.index()].respawn(position);
        }
        self.grenades.clear();
        self.force.reset();
        self.enemy_plan = None;
        self.winner = None;
        self.view.reset();

        info!(tick = self.tick, "match restarted");
        self.outbox.push(MatchEvent::MatchRestarted);
    }
}
