//! Obstacle spawner
//!
//! Hazards appear on a fixed timer anywhere across the visible window,
//! independent of the track, and drift straight up or down.

use glam::Vec2;

use super::state::{GameEvent, GameState, Obstacle};
use crate::consts::{GAME_HEIGHT, OBSTACLE_MARGIN, VIEWPORT_WIDTH};

/// Spawn one obstacle inside the camera window starting at `scroll_x`
pub fn spawn_obstacle(state: &mut GameState, scroll_x: f32) -> u32 {
    let x = scroll_x + state.rng.between_f(0, VIEWPORT_WIDTH as i32);
    let climbing = state.rng.coin_flip();
    let speed = state.tuning.obstacle_speed;
    let (y, vel_y) = if climbing {
        (GAME_HEIGHT + OBSTACLE_MARGIN, -speed)
    } else {
        (-OBSTACLE_MARGIN, speed)
    };

    let id = state.next_entity_id();
    state.obstacles.push(Obstacle {
        id,
        pos: Vec2::new(x, y),
        vel_y,
        struck_ms: None,
    });
    state.push_event(GameEvent::ObstacleSpawned { id, climbing });
    id
}

/// Accumulate frame time and fire the spawn timer for every full interval.
///
/// A non-positive interval (unvalidated tuning) disables spawning.
pub fn advance_spawn_timer(state: &mut GameState, dt_ms: f32) -> usize {
    let interval = state.tuning.obstacle_interval_ms;
    if interval <= 0.0 {
        return 0;
    }
    state.spawn_timer_ms += dt_ms;
    let mut spawned = 0;
    while state.spawn_timer_ms >= interval {
        state.spawn_timer_ms -= interval;
        let scroll_x = state.camera.scroll_x;
        spawn_obstacle(state, scroll_x);
        spawned += 1;
    }
    spawned
}

/// Inside the visible band plus the spawn margin
pub fn in_vertical_band(obstacle: &Obstacle) -> bool {
    (-OBSTACLE_MARGIN..=GAME_HEIGHT + OBSTACLE_MARGIN).contains(&obstacle.pos.y)
}
