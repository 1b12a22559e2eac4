//! Platform track generation and platform wear
//!
//! The track is built left to right. `Frontier` remembers the rightmost
//! platform; each placement zig-zags vertically from it so consecutive
//! platforms stay within jump reach without any path search.

use glam::Vec2;

use super::state::{GameEvent, GameState, Platform, PlatformSize, PlatformWear};
use super::tokens::place_tokens_for;
use crate::consts::VIEWPORT_WIDTH;

/// Lay out the platform under the player plus enough track to fill the screen
pub fn generate_initial_track(state: &mut GameState) {
    let first_pos = state.player.pos + Vec2::new(0.0, state.tuning.first_platform_offset);
    let id = state.next_entity_id();
    state
        .platforms
        .push(Platform::new(id, first_pos, PlatformSize::Medium));
    state.frontier.last_platform_y = first_pos.y;
    state.push_event(GameEvent::PlatformPlaced {
        id,
        x: first_pos.x,
        y: first_pos.y,
        size: PlatformSize::Medium,
    });

    let (min_dx, max_dx) = (state.tuning.min_spacing_x, state.tuning.max_spacing_x);
    let mut cursor = state.player.pos.x + state.tuning.track_start_offset;
    for _ in 1..state.tuning.max_visible_platforms {
        place_platform(state, cursor);
        cursor += state.rng.between_f(min_dx, max_dx);
    }
    state.frontier.last_platform_x = cursor;
}

/// Add one platform past the frontier when the player gets close to it.
///
/// Returns the new platform's id, or `None` if no extension was needed or
/// the placement gave up.
pub fn extend_track_if_needed(state: &mut GameState, player_x: f32) -> Option<u32> {
    let threshold = state.frontier.last_platform_x - state.tuning.track_lookahead * VIEWPORT_WIDTH;
    if player_x <= threshold {
        return None;
    }
    let step = state
        .rng
        .between_f(state.tuning.min_spacing_x, state.tuning.max_spacing_x);
    let target_x = state.frontier.last_platform_x + step;
    place_platform(state, target_x)
}

/// Sample a zig-zag Y from the frontier in the given direction
fn sample_platform_y(state: &mut GameState, up: bool) -> f32 {
    let step = state
        .rng
        .between_f(state.tuning.vertical_step_min, state.tuning.vertical_step_max);
    let y = if up {
        state.frontier.last_platform_y - step
    } else {
        state.frontier.last_platform_y + step
    };
    y.clamp(state.tuning.min_platform_y, state.tuning.max_platform_y)
}

/// Place a platform near `target_x`, avoiding overlap with every live platform.
///
/// Overlapping candidates are re-rolled (new Y in the same direction, X nudged
/// forward) up to `max_placement_attempts` times; after that the platform is
/// skipped and the frontier stays where it was.
pub fn place_platform(state: &mut GameState, target_x: f32) -> Option<u32> {
    state.frontier.last_direction_up = !state.frontier.last_direction_up;
    let up = state.frontier.last_direction_up;

    let mut y = sample_platform_y(state, up);
    let size = state
        .rng
        .pick(&PlatformSize::ALL)
        .copied()
        .unwrap_or(PlatformSize::Medium);

    let buffer = state.tuning.overlap_buffer;
    let (nudge_min, nudge_max) = (state.tuning.nudge_min_x, state.tuning.nudge_max_x);
    let mut x = target_x;

    for attempt in 1..=state.tuning.max_placement_attempts {
        let candidate = Platform::new(0, Vec2::new(x, y), size).padded_bounds(buffer);
        let blocked = state
            .platforms
            .iter()
            .any(|p| p.padded_bounds(buffer).intersects(&candidate));

        if !blocked {
            let id = state.next_entity_id();
            state.platforms.push(Platform::new(id, Vec2::new(x, y), size));
            if x > state.frontier.last_platform_x {
                state.frontier.last_platform_x = x;
                state.frontier.last_platform_y = y;
            }
            log::debug!("Platform {id} ({size:?}) at ({x:.0}, {y:.0}) after {attempt} attempt(s)");
            state.push_event(GameEvent::PlatformPlaced { id, x, y, size });
            place_tokens_for(state, id);
            return Some(id);
        }

        y = sample_platform_y(state, up);
        x += state.rng.between_f(nudge_min, nudge_max);
    }

    log::debug!(
        "Failed to place platform near ({x:.0}, {y:.0}) after {} attempts",
        state.tuning.max_placement_attempts
    );
    state.push_event(GameEvent::PlacementFailed { x, y });
    None
}

/// The player landed on top of a platform: wear it down.
///
/// Wear is suspended while invincible. Returns the platform's wear after the
/// landing, or `None` if nothing changed.
pub fn on_platform_landing(state: &mut GameState, platform_id: u32) -> Option<PlatformWear> {
    if state.hits.is_invincible() {
        return None;
    }
    let (threshold, step) = (state.tuning.wear_threshold, state.tuning.wear_step);
    let platform = state.platforms.iter_mut().find(|p| p.id == platform_id)?;
    let wear = platform.land(threshold, step);
    let alpha = platform.alpha;

    match wear {
        PlatformWear::Destroyed => {
            state.platforms.retain(|p| p.id != platform_id);
            log::debug!("Platform {platform_id} worn through");
            state.push_event(GameEvent::PlatformDestroyed { id: platform_id });
        }
        PlatformWear::Decaying => {
            state.push_event(GameEvent::PlatformWorn {
                id: platform_id,
                alpha,
            });
        }
        PlatformWear::Fresh | PlatformWear::Worn => {}
    }
    Some(wear)
}
