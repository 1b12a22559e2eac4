//! Game state and core simulation types
//!
//! Everything a run needs lives in `GameState`; components take it by `&mut`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Aabb;
use super::rng::SimRng;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended (lives depleted or fell off the screen)
    GameOver,
}

/// Selectable characters (sprite choice is up to the renderer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Character {
    #[default]
    Geartickler,
    Kyle,
}

impl Character {
    pub fn as_str(&self) -> &'static str {
        match self {
            Character::Geartickler => "geartickler",
            Character::Kyle => "kyle",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "geartickler" | "gear" => Some(Character::Geartickler),
            "kyle" => Some(Character::Kyle),
            _ => None,
        }
    }
}

/// Platform size classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformSize {
    Small,
    Medium,
    Large,
}

impl PlatformSize {
    pub const ALL: [PlatformSize; 3] = [Self::Small, Self::Medium, Self::Large];

    /// Body width and height
    pub fn footprint(&self) -> Vec2 {
        match self {
            PlatformSize::Small => Vec2::new(64.0, 24.0),
            PlatformSize::Medium => Vec2::new(96.0, 28.0),
            PlatformSize::Large => Vec2::new(128.0, 32.0),
        }
    }
}

/// Wear stage of a platform, derived from its landing count and alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformWear {
    Fresh,
    Worn,
    Decaying,
    Destroyed,
}

/// An immovable, gravity-free platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    /// Centre position
    pub pos: Vec2,
    pub size: PlatformSize,
    /// Landings on the top face
    pub hit_count: u32,
    /// Opacity, 1.0 fresh down to 0.0 destroyed
    pub alpha: f32,
}

impl Platform {
    pub fn new(id: u32, pos: Vec2, size: PlatformSize) -> Self {
        Self {
            id,
            pos,
            size,
            hit_count: 0,
            alpha: 1.0,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size.footprint())
    }

    /// Bounds grown by half of `overlap_buffer` on every side
    pub fn padded_bounds(&self, overlap_buffer: f32) -> Aabb {
        self.bounds().padded(overlap_buffer / 2.0)
    }

    /// Y of the top face
    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.size.footprint().y / 2.0
    }

    pub fn wear(&self) -> PlatformWear {
        if self.alpha <= 0.0 {
            PlatformWear::Destroyed
        } else if self.hit_count == 0 {
            PlatformWear::Fresh
        } else if self.alpha >= 1.0 {
            PlatformWear::Worn
        } else {
            PlatformWear::Decaying
        }
    }

    /// Register a landing on the top face and return the resulting wear
    pub fn land(&mut self, wear_threshold: u32, wear_step: f32) -> PlatformWear {
        self.hit_count += 1;
        if self.hit_count >= wear_threshold {
            self.alpha = (self.alpha - wear_step).max(0.0);
        }
        self.wear()
    }
}

/// Collectible kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// +1 score
    Basic,
    /// +3 score
    Bonus,
    /// Grants timed invincibility
    Invincibility,
}

impl TokenKind {
    pub const ALL: [TokenKind; 3] = [Self::Basic, Self::Bonus, Self::Invincibility];
}

/// A hovering collectible attached to the platform it spawned on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub id: u32,
    pub kind: TokenKind,
    pub pos: Vec2,
    pub platform_id: u32,
}

impl Token {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::splat(TOKEN_SIZE))
    }
}

/// A vertically drifting hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub pos: Vec2,
    /// Negative climbs, positive falls
    pub vel_y: f32,
    /// Remaining hit-animation time once the player has struck it
    pub struck_ms: Option<f32>,
}

impl Obstacle {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::splat(OBSTACLE_SIZE))
    }

    pub fn is_climbing(&self) -> bool {
        self.vel_y < 0.0
    }

    pub fn is_struck(&self) -> bool {
        self.struck_ms.is_some()
    }

    /// Freeze in place and start the hit animation
    pub fn strike(&mut self, animation_ms: f32) {
        self.vel_y = 0.0;
        self.struck_ms = Some(animation_ms);
    }
}

/// Animation the renderer should show for the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerPose {
    #[default]
    Idle,
    MoveLeft,
    MoveRight,
    Hit,
}

/// Which sprite set is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpriteVariant {
    #[default]
    Normal,
    Invincible,
}

impl SpriteVariant {
    pub fn scale(&self) -> f32 {
        match self {
            SpriteVariant::Normal => 1.0,
            SpriteVariant::Invincible => INVINCIBLE_SCALE,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            SpriteVariant::Normal => SpriteVariant::Invincible,
            SpriteVariant::Invincible => SpriteVariant::Normal,
        }
    }
}

/// The player body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Centre position
    pub pos: Vec2,
    pub vel: Vec2,
    pub pose: PlayerPose,
    pub sprite: SpriteVariant,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            vel: Vec2::ZERO,
            pose: PlayerPose::Idle,
            sprite: SpriteVariant::Normal,
        }
    }
}

impl Player {
    /// Body grows with the invincible sprite
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::splat(PLAYER_SIZE * self.sprite.scale()))
    }
}

/// Derived hit/invincibility state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerStatus {
    Normal,
    /// Post-hit recovery, movement locked
    Stunned,
    Invincible,
    /// Final stretch of invincibility, sprite toggling
    InvincibleFlashing,
}

/// Timers behind the hit/invincibility state machine (all milliseconds)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HitTracker {
    /// Remaining stun; > 0 means stunned
    pub stun_ms: f32,
    /// Remaining time before another obstacle hit may register
    pub cooldown_ms: f32,
    /// Sim clock at the last registered obstacle hit
    pub last_hit_at_ms: Option<f64>,
    /// Remaining invincibility; > 0 means invincible
    pub invincible_ms: f32,
    /// Time since the last sprite toggle while flashing
    pub flash_ms: f32,
    pub flashing: bool,
}

impl HitTracker {
    pub fn is_stunned(&self) -> bool {
        self.stun_ms > 0.0
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_ms > 0.0
    }

    pub fn status(&self, flash_start_ms: f32) -> PlayerStatus {
        if self.is_stunned() {
            PlayerStatus::Stunned
        } else if self.is_invincible() && self.invincible_ms <= flash_start_ms {
            PlayerStatus::InvincibleFlashing
        } else if self.is_invincible() {
            PlayerStatus::Invincible
        } else {
            PlayerStatus::Normal
        }
    }

    /// True while inside the debounce window of the last hit
    pub fn within_debounce(&self, now_ms: f64, window_ms: f32) -> bool {
        self.last_hit_at_ms
            .is_some_and(|last| now_ms - last < f64::from(window_ms))
    }
}

/// Rightmost extent of the generated track
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Frontier {
    pub last_platform_x: f32,
    pub last_platform_y: f32,
    /// Zig-zag flag, flipped on every placement
    pub last_direction_up: bool,
}

/// Horizontal camera window
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Camera {
    /// Left edge of the visible window
    pub scroll_x: f32,
}

impl Camera {
    /// Ease toward centring `target_x`, clamped to the world
    pub fn follow(&mut self, target_x: f32) {
        let desired = target_x - VIEWPORT_WIDTH / 2.0;
        let next = crate::lerp(self.scroll_x, desired, CAMERA_LERP);
        self.scroll_x = next.clamp(0.0, WORLD_WIDTH - VIEWPORT_WIDTH);
    }

    /// Entities left of this X are behind the camera and get culled
    pub fn trailing_edge(&self, cull_distance: f32) -> f32 {
        self.scroll_x - VIEWPORT_WIDTH * cull_distance
    }
}

/// Which hit animations the host was able to load
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Animations {
    pub obstacle_hit: bool,
    pub player_stun: bool,
}

impl Default for Animations {
    fn default() -> Self {
        Self {
            obstacle_hit: true,
            player_stun: true,
        }
    }
}

/// Discrete notifications for the render/audio collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PlatformPlaced {
        id: u32,
        x: f32,
        y: f32,
        size: PlatformSize,
    },
    /// Overlap search gave up; no platform this time
    PlacementFailed { x: f32, y: f32 },
    PlatformWorn { id: u32, alpha: f32 },
    PlatformDestroyed { id: u32 },
    TokenSpawned { id: u32, kind: TokenKind },
    TokenCollected { kind: TokenKind, score: u32 },
    ObstacleSpawned { id: u32, climbing: bool },
    ObstacleStruck { id: u32, while_invincible: bool },
    PlayerStunned { score: u32, lives: u8 },
    StunRecovered,
    LifeGained { lives: u8 },
    MaxLivesReached,
    InvincibilityStarted,
    SpriteChanged { sprite: SpriteVariant },
    InvincibilityEnded,
    GameOver { score: u32 },
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: SimRng,
    pub tuning: Tuning,
    pub character: Character,
    pub phase: GamePhase,
    /// Sum of all tick deltas
    pub clock_ms: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub score: u32,
    pub lives: u8,
    pub player: Player,
    pub hits: HitTracker,
    pub frontier: Frontier,
    pub camera: Camera,
    /// Live platforms (sorted by id)
    pub platforms: Vec<Platform>,
    /// Live tokens (sorted by id)
    pub tokens: Vec<Token>,
    /// Live obstacles (sorted by id)
    pub obstacles: Vec<Obstacle>,
    /// Time accumulated toward the next obstacle spawn
    pub spawn_timer_ms: f32,
    /// Countdown to game over after the last life is lost
    pub pending_game_over_ms: Option<f32>,
    pub animations: Animations,
    /// Undrained notifications for the host
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Start a run with default tuning
    pub fn new(seed: u64, character: Character) -> Self {
        Self::with_tuning(seed, character, Tuning::default())
    }

    /// Start a run and lay out the initial track
    pub fn with_tuning(seed: u64, character: Character, tuning: Tuning) -> Self {
        let mut state = Self::empty(seed, character, tuning);
        super::track::generate_initial_track(&mut state);
        log::info!(
            "Run started: seed={seed}, character={character:?}, {} platforms",
            state.platforms.len()
        );
        state
    }

    /// A run with no track laid out (tests and hosts that build their own)
    pub fn empty(seed: u64, character: Character, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: SimRng::new(seed),
            lives: tuning.starting_lives,
            tuning,
            character,
            phase: GamePhase::Playing,
            clock_ms: 0.0,
            time_ticks: 0,
            score: 0,
            player: Player::default(),
            hits: HitTracker::default(),
            frontier: Frontier::default(),
            camera: Camera::default(),
            platforms: Vec::new(),
            tokens: Vec::new(),
            obstacles: Vec::new(),
            spawn_timer_ms: 0.0,
            pending_game_over_ms: None,
            animations: Animations::default(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn status(&self) -> PlayerStatus {
        self.hits.status(self.tuning.flash_start_ms)
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Live tokens of one kind
    pub fn token_count(&self, kind: TokenKind) -> usize {
        self.tokens.iter().filter(|t| t.kind == kind).count()
    }

    pub fn platform(&self, id: u32) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.id == id)
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Hand pending notifications to the host
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.platforms.sort_by_key(|p| p.id);
        self.tokens.sort_by_key(|t| t.id);
        self.obstacles.sort_by_key(|o| o.id);
    }

    /// Tear the run down: cancel timers, drop entities, reset hit state
    pub fn end_run(&mut self) {
        if self.is_over() {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.spawn_timer_ms = 0.0;
        self.pending_game_over_ms = None;
        self.hits = HitTracker::default();
        self.frontier = Frontier::default();
        self.platforms.clear();
        self.tokens.clear();
        self.obstacles.clear();
        self.player.vel = Vec2::ZERO;
        self.player.sprite = SpriteVariant::Normal;
        self.player.pose = PlayerPose::Idle;
        log::info!("Game over: score={}, ticks={}", self.score, self.time_ticks);
        self.push_event(GameEvent::GameOver { score: self.score });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_wear_progression() {
        let mut p = Platform::new(1, Vec2::new(0.0, 300.0), PlatformSize::Medium);
        assert_eq!(p.wear(), PlatformWear::Fresh);
        assert_eq!(p.land(2, 0.25), PlatformWear::Worn);
        assert_eq!(p.alpha, 1.0);
        assert_eq!(p.land(2, 0.25), PlatformWear::Decaying);
        assert_eq!(p.alpha, 0.75);
        p.land(2, 0.25);
        p.land(2, 0.25);
        assert_eq!(p.alpha, 0.25);
        assert_eq!(p.land(2, 0.25), PlatformWear::Destroyed);
        assert_eq!(p.hit_count, 5);
    }

    #[test]
    fn test_platform_geometry() {
        let p = Platform::new(1, Vec2::new(100.0, 300.0), PlatformSize::Large);
        assert_eq!(p.top(), 284.0);
        let padded = p.padded_bounds(20.0);
        assert_eq!(padded.width(), 148.0);
        assert_eq!(padded.height(), 52.0);
    }

    #[test]
    fn test_status_derivation() {
        let mut hits = HitTracker::default();
        assert_eq!(hits.status(2000.0), PlayerStatus::Normal);
        hits.invincible_ms = 2500.0;
        assert_eq!(hits.status(2000.0), PlayerStatus::Invincible);
        hits.invincible_ms = 2000.0;
        assert_eq!(hits.status(2000.0), PlayerStatus::InvincibleFlashing);
        hits.stun_ms = 10.0;
        assert_eq!(hits.status(2000.0), PlayerStatus::Stunned);
    }

    #[test]
    fn test_debounce_window() {
        let mut hits = HitTracker::default();
        assert!(!hits.within_debounce(0.0, 100.0));
        hits.last_hit_at_ms = Some(1000.0);
        assert!(hits.within_debounce(1050.0, 100.0));
        assert!(!hits.within_debounce(1100.0, 100.0));
    }

    #[test]
    fn test_camera_clamps_to_world() {
        let mut cam = Camera::default();
        cam.follow(0.0);
        assert_eq!(cam.scroll_x, 0.0);
        for _ in 0..200 {
            cam.follow(2000.0);
        }
        assert!((cam.scroll_x - 1600.0).abs() < 1.0);
        assert_eq!(cam.trailing_edge(1.5), cam.scroll_x - 1200.0);
    }

    #[test]
    fn test_end_run_emits_once() {
        let mut state = GameState::new(5, Character::Kyle);
        state.end_run();
        state.end_run();
        let overs = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
        assert!(state.platforms.is_empty());
        assert!(state.is_over());
    }

    #[test]
    fn test_character_names() {
        assert_eq!(Character::from_name("Kyle"), Some(Character::Kyle));
        assert_eq!(Character::from_name(" GEAR "), Some(Character::Geartickler));
        assert_eq!(Character::from_name("bob"), None);
        for c in [Character::Geartickler, Character::Kyle] {
            assert_eq!(Character::from_name(c.as_str()), Some(c));
        }
    }
}
