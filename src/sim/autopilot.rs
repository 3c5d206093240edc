//! Idle/demo mode - picks movement keys from the current state
//!
//! Dodging always wins over coin chasing. The policy only reads state, so the
//! tick stays exactly the same as for a human player.

use super::state::{FallingObject, GameState, ObjectKind, PlayArea};
use super::tick::TickInput;

/// How far above the player an enemy starts to count as a threat (pixels)
const THREAT_LOOKAHEAD: f32 = 160.0;
/// Extra horizontal clearance kept around the player when judging threats
const THREAT_MARGIN: f32 = 12.0;

/// Choose the keys to hold this tick
pub fn autopilot_input(state: &GameState, area: PlayArea, player_speed: f32) -> TickInput {
    let player = &state.player;
    let center = player.pos.x + player.size / 2.0;

    if let Some(enemy) = most_threatening_enemy(state) {
        let enemy_center = enemy.pos.x + enemy.size / 2.0;
        let at_left_wall = player.pos.x <= player_speed;
        let at_right_wall = player.pos.x + player.size >= area.width - player_speed;

        let go_left = if at_left_wall {
            false
        } else if at_right_wall {
            true
        } else {
            enemy_center >= center
        };
        return TickInput {
            left: go_left,
            right: !go_left,
        };
    }

    let Some(coin) = nearest_coin(state) else {
        return TickInput::default();
    };
    let target = coin.pos.x + coin.size / 2.0;
    let offset = target - center;
    if offset.abs() <= player_speed / 2.0 {
        TickInput::default()
    } else {
        TickInput {
            left: offset < 0.0,
            right: offset > 0.0,
        }
    }
}

/// The lowest enemy that is about to land on the player
fn most_threatening_enemy(state: &GameState) -> Option<&FallingObject> {
    let player = &state.player;
    let left = player.pos.x - THREAT_MARGIN;
    let right = player.pos.x + player.size + THREAT_MARGIN;

    state
        .objects
        .iter()
        .filter(|o| o.kind == ObjectKind::Enemy)
        .filter(|o| o.pos.x < right && o.pos.x + o.size > left)
        .filter(|o| {
            o.pos.y + o.size >= player.pos.y - THREAT_LOOKAHEAD
                && o.pos.y < player.pos.y + player.size
        })
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
}

/// The coin closest to landing that the player can still reach
fn nearest_coin(state: &GameState) -> Option<&FallingObject> {
    let player_bottom = state.player.pos.y + state.player.size;
    state
        .objects
        .iter()
        .filter(|o| o.kind == ObjectKind::Coin && o.pos.y < player_bottom)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Player;
    use glam::Vec2;

    fn state_with(player_x: f32, objects: &[(ObjectKind, f32, f32)]) -> GameState {
        let mut state = GameState::new(48.0);
        state.player = Player {
            pos: Vec2::new(player_x, 242.0),
            size: 48.0,
        };
        for &(kind, x, y) in objects {
            let id = state.next_object_id();
            state.objects.push(FallingObject {
                id,
                kind,
                pos: Vec2::new(x, y),
                size: 36.0,
                spawned_at_ms: 0.0,
            });
        }
        state
    }

    fn area() -> PlayArea {
        PlayArea::new(400.0, 300.0)
    }

    #[test]
    fn test_idle_without_objects() {
        let state = state_with(176.0, &[]);
        assert_eq!(autopilot_input(&state, area(), 7.0), TickInput::default());
    }

    #[test]
    fn test_dodges_away_from_enemy() {
        // Enemy slightly right of centre, coming down
        let state = state_with(176.0, &[(ObjectKind::Enemy, 190.0, 150.0)]);
        let input = autopilot_input(&state, area(), 7.0);
        assert!(input.left && !input.right);
    }

    #[test]
    fn test_dodges_inward_when_pinned_to_wall() {
        let state = state_with(0.0, &[(ObjectKind::Enemy, 0.0, 150.0)]);
        let input = autopilot_input(&state, area(), 7.0);
        assert!(input.right && !input.left);
    }

    #[test]
    fn test_ignores_distant_enemy_and_chases_coin() {
        let state = state_with(
            176.0,
            &[(ObjectKind::Enemy, 180.0, -30.0), (ObjectKind::Coin, 330.0, 100.0)],
        );
        let input = autopilot_input(&state, area(), 7.0);
        assert!(input.right && !input.left);
    }

    #[test]
    fn test_holds_still_under_coin() {
        let state = state_with(176.0, &[(ObjectKind::Coin, 182.0, 100.0)]);
        assert_eq!(autopilot_input(&state, area(), 7.0), TickInput::default());
    }
}
