//! Browser bindings
//!
//! The page owns rendering, audio and the animation-frame loop; it feeds
//! frame deltas and key state into `WebGame` and reads back a JSON snapshot
//! plus the drained event queue each frame.

use wasm_bindgen::prelude::*;

use crate::consts::*;
use crate::leaderboard::LeaderboardClient;
use crate::sim::{Character, Contact, ContactSide, GameState, MoveIntent, TickInput, tick};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
    }
    log::info!("Junker Run core loaded");
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// One run, driven by the page's frame loop
#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    input: TickInput,
    accumulator: f32,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32, character: &str) -> WebGame {
        let character = Character::from_name(character).unwrap_or_else(|| {
            log::warn!("Unknown character {character:?}, using default");
            Character::default()
        });
        WebGame {
            state: GameState::with_tuning(u64::from(seed), character, Tuning::load()),
            input: TickInput::default(),
            accumulator: 0.0,
        }
    }

    /// Start over with a fresh track; tuning and character carry over
    pub fn restart(&mut self, seed: u32) {
        let tuning = self.state.tuning.clone();
        let animations = self.state.animations;
        self.state = GameState::with_tuning(u64::from(seed), self.state.character, tuning);
        self.state.animations = animations;
        self.input = TickInput::default();
        self.accumulator = 0.0;
    }

    /// -1 left, 1 right, 0 none
    pub fn set_intent(&mut self, direction: i32) {
        self.input.intent = match direction.signum() {
            -1 => MoveIntent::Left,
            1 => MoveIntent::Right,
            _ => MoveIntent::None,
        };
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.input.autopilot = enabled;
    }

    /// Tell the sim which hit animations failed to load
    pub fn set_animations(&mut self, obstacle_hit: bool, player_stun: bool) {
        self.state.animations.obstacle_hit = obstacle_hit;
        self.state.animations.player_stun = player_stun;
    }

    /// Queue a landing reported by the page's own physics
    pub fn report_landing(&mut self, platform_id: u32) {
        self.input.contacts.push(Contact::Platform {
            id: platform_id,
            side: ContactSide::Top,
        });
    }

    pub fn report_token(&mut self, token_id: u32) {
        self.input.contacts.push(Contact::Token { id: token_id });
    }

    pub fn report_obstacle(&mut self, obstacle_id: u32) {
        self.input.contacts.push(Contact::Obstacle { id: obstacle_id });
    }

    /// Run fixed-step ticks for `dt_ms` of wall time
    pub fn update(&mut self, dt_ms: f32) {
        let dt_ms = dt_ms.min(100.0);
        self.accumulator += dt_ms;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT_MS && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT_MS);
            self.accumulator -= SIM_DT_MS;
            substeps += 1;

            // Reported contacts are one-shot
            self.input.contacts.clear();
        }
    }

    /// Full state as JSON for the renderer
    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state).map_err(js_err)
    }

    /// Pending events as a JSON array
    pub fn drain_events(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.drain_events()).map_err(js_err)
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn lives(&self) -> u8 {
        self.state.lives
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    pub fn status(&self) -> String {
        format!("{:?}", self.state.status())
    }

    pub fn camera_x(&self) -> f32 {
        self.state.camera.scroll_x
    }

    pub fn tuning_json(&self) -> Result<String, JsValue> {
        self.state.tuning.to_json().map_err(js_err)
    }
}

/// Validate and persist tuning for the next run
#[wasm_bindgen]
pub fn save_tuning(json: &str) -> Result<(), JsValue> {
    let tuning = Tuning::from_json(json).map_err(js_err)?;
    tuning.save();
    Ok(())
}

/// Top 10 as a JSON array; failures come back empty
#[wasm_bindgen]
pub async fn fetch_leaderboard() -> Result<String, JsValue> {
    let board = LeaderboardClient::default().fetch_top().await;
    serde_json::to_string(&board.entries).map_err(js_err)
}

/// Submit a finished run; rejects on bad initials or HTTP failure
#[wasm_bindgen]
pub async fn submit_score(initials: String, score: u32) -> Result<String, JsValue> {
    let entry = LeaderboardClient::default()
        .submit(&initials, score)
        .await
        .map_err(js_err)?;
    serde_json::to_string(&entry).map_err(js_err)
}
