//! Token placement policy
//!
//! Each new platform gets at most one token. Kinds are tried in a fixed
//! order (Basic, then Invincibility, then Bonus), each gated on its own
//! concurrent cap and an independent percent roll.

use glam::Vec2;

use super::state::{GameEvent, GameState, Token, TokenKind};

/// Evaluation order for the per-platform rolls
const PLACEMENT_ORDER: [TokenKind; 3] = [
    TokenKind::Basic,
    TokenKind::Invincibility,
    TokenKind::Bonus,
];

/// Cap check first, then the roll (the RNG is only consumed under the cap)
fn roll_for(state: &mut GameState, kind: TokenKind) -> bool {
    state.token_count(kind) < state.tuning.cap_for(kind)
        && state.rng.chance(state.tuning.chance_for(kind))
}

/// Maybe attach a token to a freshly placed platform.
///
/// Returns the kind spawned, if any.
pub fn place_tokens_for(state: &mut GameState, platform_id: u32) -> Option<TokenKind> {
    let (center_x, top) = {
        let platform = state.platform(platform_id)?;
        (platform.pos.x, platform.top())
    };

    let kind = PLACEMENT_ORDER
        .into_iter()
        .find(|kind| roll_for(state, *kind))?;

    let jitter = state.tuning.token_jitter;
    let x = center_x + state.rng.between_f(-jitter, jitter);
    let y = top - state.tuning.token_lift;

    let id = state.next_entity_id();
    state.tokens.push(Token {
        id,
        kind,
        pos: Vec2::new(x, y),
        platform_id,
    });
    log::debug!("{kind:?} token {id} on platform {platform_id}");
    state.push_event(GameEvent::TokenSpawned { id, kind });
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Character, Platform, PlatformSize};
    use crate::sim::track::extend_track_if_needed;
    use crate::tuning::Tuning;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn state_with_platform(tuning: Tuning) -> (GameState, u32) {
        let mut state = GameState::empty(77, Character::Kyle, tuning);
        let id = state.next_entity_id();
        state
            .platforms
            .push(Platform::new(id, Vec2::new(1000.0, 400.0), PlatformSize::Medium));
        (state, id)
    }

    fn always() -> Tuning {
        Tuning {
            basic_chance: 100,
            bonus_chance: 100,
            invincibility_chance: 100,
            ..Default::default()
        }
    }

    #[test]
    fn test_token_position() {
        let (mut state, pid) = state_with_platform(always());
        assert_eq!(place_tokens_for(&mut state, pid), Some(TokenKind::Basic));
        let token = &state.tokens[0];
        assert!((980.0..=1020.0).contains(&token.pos.x));
        // Medium is 28 tall: top at 386, token 25 above
        assert_eq!(token.pos.y, 361.0);
        assert_eq!(token.platform_id, pid);
    }

    #[test]
    fn test_order_falls_through_as_caps_fill() {
        let (mut state, pid) = state_with_platform(always());
        let mut spawned = Vec::new();
        for _ in 0..20 {
            spawned.push(place_tokens_for(&mut state, pid));
        }
        let expect: Vec<Option<TokenKind>> = std::iter::repeat_n(Some(TokenKind::Basic), 12)
            .chain(std::iter::once(Some(TokenKind::Invincibility)))
            .chain(std::iter::repeat_n(Some(TokenKind::Bonus), 2))
            .chain(std::iter::repeat_n(None, 5))
            .collect();
        assert_eq!(spawned, expect);
    }

    #[test]
    fn test_invincibility_and_bonus_are_exclusive() {
        let tuning = Tuning {
            basic_chance: 0,
            ..always()
        };
        let (mut state, pid) = state_with_platform(tuning);
        assert_eq!(
            place_tokens_for(&mut state, pid),
            Some(TokenKind::Invincibility)
        );
        assert_eq!(state.tokens.len(), 1);
    }

    #[test]
    fn test_nothing_when_all_rolls_fail() {
        let tuning = Tuning {
            basic_chance: 0,
            bonus_chance: 0,
            invincibility_chance: 0,
            ..Default::default()
        };
        let (mut state, pid) = state_with_platform(tuning);
        assert_eq!(place_tokens_for(&mut state, pid), None);
        assert!(state.tokens.is_empty());
    }

    #[test]
    fn test_unknown_platform() {
        let (mut state, _) = state_with_platform(always());
        assert_eq!(place_tokens_for(&mut state, 9999), None);
    }

    proptest! {
        #[test]
        fn prop_caps_and_one_per_platform(seed in any::<u64>()) {
            let mut state = GameState::new(seed, Character::Geartickler);
            for i in 0..150 {
                extend_track_if_needed(&mut state, 400.0 + i as f32 * 60.0);
                for kind in TokenKind::ALL {
                    prop_assert!(state.token_count(kind) <= state.tuning.cap_for(kind));
                }
            }
            let mut per_platform: HashMap<u32, usize> = HashMap::new();
            for token in &state.tokens {
                *per_platform.entry(token.platform_id).or_default() += 1;
            }
            prop_assert!(per_platform.values().all(|n| *n <= 1));
        }
    }
}
