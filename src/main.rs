//! Grenade Duel headless host
//!
//! Drives a match at a fixed frame rate against the headless stage with a
//! scripted pilot standing in for the player's input, and logs every match
//! event as JSON.

use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use grenade_duel::util::time::{frame_duration, tick_delta};
use grenade_duel::view::{HeadlessStage, StageLayout};
use grenade_duel::{CombatState, Config, MatchController, MatchEvent};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(&config.log_level, config.log_json);

    info!(
        tick_rate = config.tick_rate,
        hold_secs = config.demo_hold_secs,
        matches = config.demo_matches,
        "Starting Grenade Duel"
    );

    let stage = HeadlessStage::new(StageLayout::new(config.match_config.world_scale));
    let mut controller = MatchController::new(config.match_config.clone(), stage)?;

    tokio::select! {
        finished = run(&mut controller, &config) => {
            info!(matches = finished, "Demo finished");
        }
        _ = shutdown_signal() => {
            info!("Received Ctrl+C, stopping");
        }
    }

    Ok(())
}

/// Frame loop. Returns the number of finished matches.
async fn run(controller: &mut MatchController<HeadlessStage>, config: &Config) -> u32 {
    let dt = tick_delta(config.tick_rate);
    let mut frame_interval = interval(frame_duration(config.tick_rate));
    frame_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut pilot = Pilot::new(config.demo_hold_secs);
    let mut finished = 0;

    loop {
        frame_interval.tick().await;

        pilot.drive(controller, dt);
        let mut events = controller.update(dt);
        events.extend(controller.drain_events());

        for event in &events {
            log_event(event);
            if matches!(event, MatchEvent::GameOver { .. }) {
                finished += 1;
            }
        }

        if controller.state() == Some(CombatState::GameOver) {
            if finished >= config.demo_matches {
                return finished;
            }
            controller.restart();
            for event in controller.drain_events() {
                log_event(&event);
            }
        }
    }
}

/// Scripted stand-in for the input layer
struct Pilot {
    hold_secs: f32,
    held_for: Option<f32>,
}

impl Pilot {
    fn new(hold_secs: f32) -> Self {
        Self {
            hold_secs,
            held_for: None,
        }
    }

    fn drive(&mut self, controller: &mut MatchController<HeadlessStage>, dt: f32) {
        if controller.state() != Some(CombatState::PlayerTurn) {
            self.held_for = None;
            return;
        }

        match self.held_for.as_mut() {
            None => {
                controller.press();
                self.held_for = Some(0.0);
            }
            Some(held) => {
                *held += dt;
                if *held >= self.hold_secs {
                    controller.release();
                }
            }
        }
    }
}

fn log_event(event: &MatchEvent) {
    match serde_json::to_string(event) {
        Ok(json) => info!(event = %json, "match event"),
        Err(err) => warn!(error = %err, "failed to serialize match event"),
    }
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str, json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}
