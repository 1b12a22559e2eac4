//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only enters through `tick`'s `dt_ms`
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or network dependencies

pub mod geom;
pub mod hit;
pub mod obstacles;
pub mod physics;
pub mod rng;
pub mod state;
pub mod tick;
pub mod tokens;
pub mod track;

pub use geom::Aabb;
pub use hit::HitOutcome;
pub use physics::{Contact, ContactSide};
pub use rng::SimRng;
pub use state::{
    Animations, Camera, Character, Frontier, GameEvent, GamePhase, GameState, HitTracker,
    Obstacle, Platform, PlatformSize, PlatformWear, Player, PlayerPose, PlayerStatus,
    SpriteVariant, Token, TokenKind,
};
pub use tick::{MoveIntent, TickInput, autopilot_intent, tick};
