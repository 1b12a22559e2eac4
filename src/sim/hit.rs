//! Hit and invincibility state machine
//!
//! Transitions are driven by two inputs: contact events (player vs obstacle,
//! player vs token) and elapsed frame time. The states themselves are derived
//! from `HitTracker` timers, see `PlayerStatus`.

use super::state::{GameEvent, GameState, PlayerPose, SpriteVariant, TokenKind};

/// What an obstacle contact did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Cooldown, debounce, unknown or already-struck obstacle
    Ignored,
    /// Hit animation missing: obstacle removed, state reset, nothing else
    Discarded,
    /// Invincible: obstacle smashed, maybe a life gained
    Absorbed { life_gained: bool },
    /// Normal hit: stunned, score and a life lost
    Damaged { game_over_pending: bool },
}

/// Advance every hit-related timer by one frame
pub fn advance_hit_timers(state: &mut GameState, dt_ms: f32) {
    if state.hits.stun_ms > 0.0 {
        state.hits.stun_ms = (state.hits.stun_ms - dt_ms).max(0.0);
        if state.hits.stun_ms == 0.0 {
            clear_stun(state);
        }
    }

    if state.hits.cooldown_ms > 0.0 {
        state.hits.cooldown_ms = (state.hits.cooldown_ms - dt_ms).max(0.0);
    }

    advance_invincibility(state, dt_ms);
}

/// Count invincibility down, flashing the sprite in its final stretch
pub fn advance_invincibility(state: &mut GameState, dt_ms: f32) {
    if !state.hits.is_invincible() {
        return;
    }
    let flash_start = state.tuning.flash_start_ms;
    let flash_interval = state.tuning.flash_interval_ms;

    state.hits.invincible_ms -= dt_ms;

    if state.hits.invincible_ms > flash_start {
        set_sprite(state, SpriteVariant::Invincible);
    }

    if state.hits.invincible_ms <= 0.0 {
        state.hits.invincible_ms = 0.0;
        state.hits.flashing = false;
        state.hits.flash_ms = 0.0;
        set_sprite(state, SpriteVariant::Normal);
        if !state.hits.is_stunned() {
            state.player.pose = PlayerPose::Idle;
        }
        log::info!("Invincibility expired");
        state.push_event(GameEvent::InvincibilityEnded);
    } else if state.hits.invincible_ms <= flash_start {
        state.hits.flashing = true;
        state.hits.flash_ms += dt_ms;
        if state.hits.flash_ms >= flash_interval {
            state.hits.flash_ms = 0.0;
            let next = state.player.sprite.toggled();
            set_sprite(state, next);
        }
    }
}

fn set_sprite(state: &mut GameState, sprite: SpriteVariant) {
    if state.player.sprite != sprite {
        state.player.sprite = sprite;
        state.push_event(GameEvent::SpriteChanged { sprite });
    }
}

fn clear_stun(state: &mut GameState) {
    state.hits.stun_ms = 0.0;
    state.player.pose = PlayerPose::Idle;
    state.push_event(GameEvent::StunRecovered);
}

/// The player touched an obstacle
pub fn on_obstacle_contact(state: &mut GameState, obstacle_id: u32) -> HitOutcome {
    let Some(index) = state
        .obstacles
        .iter()
        .position(|o| o.id == obstacle_id && !o.is_struck())
    else {
        return HitOutcome::Ignored;
    };

    let now = state.clock_ms;
    if state.hits.cooldown_ms > 0.0
        || state
            .hits
            .within_debounce(now, state.tuning.hit_debounce_ms)
    {
        return HitOutcome::Ignored;
    }

    if !state.animations.obstacle_hit {
        log::error!("Obstacle hit animation missing; destroying obstacle {obstacle_id}");
        state.hits.cooldown_ms = state.tuning.hit_cooldown_ms;
        state.hits.last_hit_at_ms = Some(now);
        state.obstacles.remove(index);
        if state.hits.is_stunned() {
            clear_stun(state);
        }
        return HitOutcome::Discarded;
    }

    let strike_ms = state.tuning.obstacle_strike_ms;

    if state.hits.is_invincible() && !state.hits.is_stunned() {
        state.hits.last_hit_at_ms = Some(now);
        state.obstacles[index].strike(strike_ms);
        state.push_event(GameEvent::ObstacleStruck {
            id: obstacle_id,
            while_invincible: true,
        });

        let life_gained = state.lives < state.tuning.max_lives;
        if life_gained {
            state.lives += 1;
            state.push_event(GameEvent::LifeGained { lives: state.lives });
        } else {
            state.push_event(GameEvent::MaxLivesReached);
        }
        return HitOutcome::Absorbed { life_gained };
    }

    state.hits.cooldown_ms = state.tuning.hit_cooldown_ms;
    state.hits.last_hit_at_ms = Some(now);
    if state.animations.player_stun {
        state.hits.stun_ms = state.tuning.stun_ms;
        state.player.pose = PlayerPose::Hit;
        state.player.vel.x = 0.0;
    } else {
        log::warn!("Player stun animation missing; skipping stun");
    }

    state.score = state.score.saturating_sub(1);
    state.lives = state.lives.saturating_sub(1);
    state.obstacles[index].strike(strike_ms);
    state.push_event(GameEvent::ObstacleStruck {
        id: obstacle_id,
        while_invincible: false,
    });
    state.push_event(GameEvent::PlayerStunned {
        score: state.score,
        lives: state.lives,
    });

    let game_over_pending = state.lives == 0;
    if game_over_pending && state.pending_game_over_ms.is_none() {
        log::info!("Lives depleted; game over in {}ms", state.tuning.game_over_delay_ms);
        state.pending_game_over_ms = Some(state.tuning.game_over_delay_ms);
    }
    HitOutcome::Damaged { game_over_pending }
}

/// The player touched a token. Returns true if it was collected.
pub fn on_token_contact(state: &mut GameState, token_id: u32) -> bool {
    let Some(index) = state.tokens.iter().position(|t| t.id == token_id) else {
        return false;
    };
    let kind = state.tokens[index].kind;

    match kind {
        TokenKind::Basic | TokenKind::Bonus => {
            if state.hits.is_stunned() {
                return false;
            }
            let value = match kind {
                TokenKind::Basic => state.tuning.basic_value,
                _ => state.tuning.bonus_value,
            };
            state.tokens.remove(index);
            state.score = state.score.saturating_add(value);
        }
        TokenKind::Invincibility => {
            state.tokens.remove(index);
            start_invincibility(state);
        }
    }

    state.push_event(GameEvent::TokenCollected {
        kind,
        score: state.score,
    });
    true
}

/// Enter (or refresh) the invincible state
pub fn start_invincibility(state: &mut GameState) {
    state.hits.invincible_ms = state.tuning.invincibility_ms;
    state.hits.flash_ms = 0.0;
    state.hits.flashing = false;
    if state.hits.is_stunned() {
        clear_stun(state);
    }
    set_sprite(state, SpriteVariant::Invincible);
    log::info!(
        "Invincibility activated for {}ms",
        state.tuning.invincibility_ms
    );
    state.push_event(GameEvent::InvincibilityStarted);
}
