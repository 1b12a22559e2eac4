//! Per-frame simulation tick
//!
//! Drives every component in a fixed order so that a seed plus an input
//! sequence always replays the same run.

use super::hit::{advance_hit_timers, on_obstacle_contact, on_token_contact};
use super::obstacles::{advance_spawn_timer, in_vertical_band};
use super::physics::{Contact, ContactSide, detect_overlaps, step_obstacles, step_player};
use super::state::{GameState, PlayerPose};
use super::track::{extend_track_if_needed, on_platform_landing};
use crate::consts::*;

/// Horizontal movement request for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveIntent {
    #[default]
    None,
    Left,
    Right,
}

impl MoveIntent {
    fn direction(&self) -> f32 {
        match self {
            MoveIntent::None => 0.0,
            MoveIntent::Left => -1.0,
            MoveIntent::Right => 1.0,
        }
    }
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub intent: MoveIntent,
    /// Contacts reported by a host physics engine, resolved after our own
    pub contacts: Vec<Contact>,
    /// Demo mode: steer toward the next reachable platform
    pub autopilot: bool,
}

/// Advance the game state by `dt_ms` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    if state.is_over() {
        return;
    }

    state.time_ticks += 1;
    state.clock_ms += f64::from(dt_ms);

    advance_hit_timers(state, dt_ms);

    let intent = if input.autopilot {
        autopilot_intent(state)
    } else {
        input.intent
    };
    apply_intent(state, intent);

    step_obstacles(state, dt_ms);
    let mut contacts = step_player(state, dt_ms);
    contacts.extend(detect_overlaps(state));
    contacts.extend(input.contacts.iter().copied());
    for contact in contacts {
        resolve_contact(state, contact);
    }

    advance_struck_obstacles(state, dt_ms);

    if let Some(remaining) = state.pending_game_over_ms {
        let remaining = remaining - dt_ms;
        if remaining <= 0.0 {
            state.end_run();
            return;
        }
        state.pending_game_over_ms = Some(remaining);
    }

    if state.player.pos.y > GAME_HEIGHT {
        log::info!("Player fell off at x={:.0}", state.player.pos.x);
        state.end_run();
        return;
    }

    let player_x = state.player.pos.x;
    extend_track_if_needed(state, player_x);
    advance_spawn_timer(state, dt_ms);
    state.camera.follow(player_x);
    cull(state);

    state.normalize_order();
}

fn apply_intent(state: &mut GameState, intent: MoveIntent) {
    let player = &mut state.player;
    if state.hits.is_stunned() {
        player.vel.x = 0.0;
        player.pose = PlayerPose::Hit;
        return;
    }
    player.vel.x = intent.direction() * PLAYER_SPEED;
    player.pose = match intent {
        MoveIntent::None => PlayerPose::Idle,
        MoveIntent::Left => PlayerPose::MoveLeft,
        MoveIntent::Right => PlayerPose::MoveRight,
    };
}

fn resolve_contact(state: &mut GameState, contact: Contact) {
    match contact {
        Contact::Platform {
            id,
            side: ContactSide::Top,
        } => {
            on_platform_landing(state, id);
        }
        Contact::Platform { .. } => {}
        Contact::Token { id } => {
            on_token_contact(state, id);
        }
        Contact::Obstacle { id } => {
            on_obstacle_contact(state, id);
        }
    }
}

/// Run down strike animations and drop obstacles whose animation finished
fn advance_struck_obstacles(state: &mut GameState, dt_ms: f32) {
    for obstacle in &mut state.obstacles {
        if let Some(ms) = obstacle.struck_ms.as_mut() {
            *ms -= dt_ms;
        }
    }
    state
        .obstacles
        .retain(|o| o.struck_ms.is_none_or(|ms| ms > 0.0));
}

/// Remove everything behind the camera or outside the vertical band
fn cull(state: &mut GameState) {
    let edge = state.camera.trailing_edge(state.tuning.cull_distance);
    state.platforms.retain(|p| p.pos.x >= edge);
    state.tokens.retain(|t| t.pos.x >= edge);
    state.obstacles.retain(in_vertical_band);
}

/// Steer toward the platform below that sits a little ahead of the player
pub fn autopilot_intent(state: &GameState) -> MoveIntent {
    let player = &state.player;
    let feet = player.bounds().max.y;
    let aim_x = player.pos.x + PLAYER_SIZE * 1.5;

    let target = state
        .platforms
        .iter()
        .filter(|p| p.top() >= feet - 4.0)
        .min_by(|a, b| {
            let da = (a.pos.x - aim_x).abs();
            let db = (b.pos.x - aim_x).abs();
            da.total_cmp(&db)
        });

    match target {
        Some(p) if p.pos.x > player.pos.x + 8.0 => MoveIntent::Right,
        Some(p) if p.pos.x < player.pos.x - 8.0 => MoveIntent::Left,
        Some(_) => MoveIntent::None,
        None => MoveIntent::Right,
    }
}
