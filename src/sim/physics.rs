//! Arcade physics and contact detection
//!
//! A minimal stand-in for an engine's arcade physics. The player falls under
//! gravity and is pushed out of platforms along the shallowest axis, while
//! obstacles drift at constant speed. Every touch is reported as a `Contact`
//! for the hit state machine to resolve.

use super::state::GameState;
use crate::consts::{GRAVITY, JUMP_SPEED};

/// Which face of a platform the player touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactSide {
    /// Landed on the top face
    Top,
    /// Bumped the underside
    Bottom,
    /// Ran into the left or right face
    Side,
}

/// A discrete player contact, from this module or injected by a host engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Platform { id: u32, side: ContactSide },
    Token { id: u32 },
    Obstacle { id: u32 },
}

/// Move obstacles along their vertical velocity (gravity is cancelled out)
pub fn step_obstacles(state: &mut GameState, dt_ms: f32) {
    let dt = dt_ms / 1000.0;
    for obstacle in &mut state.obstacles {
        obstacle.pos.y += obstacle.vel_y * dt;
    }
}

/// Integrate the player and separate it from any platform it sinks into.
///
/// Top contact launches the player at jump speed and bottom contact sends it
/// back down. Side contact stops horizontal motion.
pub fn step_player(state: &mut GameState, dt_ms: f32) -> Vec<Contact> {
    let dt = dt_ms / 1000.0;
    let player = &mut state.player;
    player.vel.y += GRAVITY * dt;
    player.pos += player.vel * dt;

    let mut contacts = Vec::new();
    for platform in &state.platforms {
        let body = player.bounds();
        let bounds = platform.bounds();
        if !body.overlaps(&bounds) {
            continue;
        }
        let pen = body.penetration(&bounds);

        let side = if pen.y <= pen.x {
            if player.pos.y < platform.pos.y {
                player.pos.y -= pen.y;
                player.vel.y = -JUMP_SPEED;
                ContactSide::Top
            } else {
                player.pos.y += pen.y;
                player.vel.y = player.vel.y.abs();
                ContactSide::Bottom
            }
        } else {
            let dir = if player.pos.x < platform.pos.x { -1.0 } else { 1.0 };
            player.pos.x += dir * pen.x;
            player.vel.x = 0.0;
            ContactSide::Side
        };
        contacts.push(Contact::Platform {
            id: platform.id,
            side,
        });
    }
    contacts
}

/// Tokens and live obstacles currently overlapping the player
pub fn detect_overlaps(state: &GameState) -> Vec<Contact> {
    let body = state.player.bounds();
    let tokens = state
        .tokens
        .iter()
        .filter(|t| body.overlaps(&t.bounds()))
        .map(|t| Contact::Token { id: t.id });
    let obstacles = state
        .obstacles
        .iter()
        .filter(|o| !o.is_struck() && body.overlaps(&o.bounds()))
        .map(|o| Contact::Obstacle { id: o.id });
    tokens.chain(obstacles).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use crate::sim::state::{Character, Obstacle, Platform, PlatformSize, Token, TokenKind};
    use crate::tuning::Tuning;

    fn state() -> GameState {
        GameState::empty(2, Character::Geartickler, Tuning::default())
    }

    #[test]
    fn test_falls_under_gravity() {
        let mut state = state();
        let y0 = state.player.pos.y;
        for _ in 0..60 {
            assert!(step_player(&mut state, 1000.0 / 60.0).is_empty());
        }
        assert!((state.player.vel.y - 300.0).abs() < 0.01);
        assert!(state.player.pos.y > y0 + 140.0);
    }

    #[test]
    fn test_landing_bounces_up() {
        let mut state = state();
        // Platform top at 450 + 24 + 2 (just under the player's feet after a short fall)
        state.platforms.push(Platform::new(
            9,
            Vec2::new(400.0, 490.0),
            PlatformSize::Medium,
        ));
        let mut landed = Vec::new();
        for _ in 0..60 {
            landed.extend(step_player(&mut state, 1000.0 / 60.0));
            if !landed.is_empty() {
                break;
            }
        }
        assert_eq!(
            landed,
            vec![Contact::Platform {
                id: 9,
                side: ContactSide::Top
            }]
        );
        assert_eq!(state.player.vel.y, -330.0);
        assert!(state.player.bounds().max.y <= state.platforms[0].top() + 0.001);
    }

    #[test]
    fn test_side_contact_stops_run() {
        let mut state = state();
        state.platforms.push(Platform::new(
            3,
            Vec2::new(470.0, 450.0),
            PlatformSize::Large,
        ));
        state.player.pos = Vec2::new(400.0, 450.0);
        state.player.vel = Vec2::new(160.0, 0.0);
        let contacts = step_player(&mut state, 1000.0 / 60.0);
        assert_eq!(
            contacts,
            vec![Contact::Platform {
                id: 3,
                side: ContactSide::Side
            }]
        );
        assert_eq!(state.player.vel.x, 0.0);
        assert!(state.player.bounds().max.x <= state.platforms[0].bounds().min.x + 0.001);
    }

    #[test]
    fn test_overlap_detection_skips_struck_obstacles() {
        let mut state = state();
        let at = state.player.pos;
        state.tokens.push(Token {
            id: 1,
            kind: TokenKind::Basic,
            pos: at + Vec2::new(10.0, 0.0),
            platform_id: 0,
        });
        state.obstacles.push(Obstacle {
            id: 2,
            pos: at,
            vel_y: 150.0,
            struck_ms: None,
        });
        state.obstacles.push(Obstacle {
            id: 3,
            pos: at,
            vel_y: 0.0,
            struck_ms: Some(100.0),
        });
        assert_eq!(
            detect_overlaps(&state),
            vec![Contact::Token { id: 1 }, Contact::Obstacle { id: 2 }]
        );
    }

    #[test]
    fn test_obstacles_drift() {
        let mut state = state();
        state.obstacles.push(Obstacle {
            id: 1,
            pos: Vec2::new(0.0, 650.0),
            vel_y: -150.0,
            struck_ms: None,
        });
        step_obstacles(&mut state, 1000.0);
        assert_eq!(state.obstacles[0].pos.y, 500.0);
    }
}
