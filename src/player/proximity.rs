//! Picks the philosopher the player can talk to.
use bevy::prelude::*;

use crate::npc::roaming::RoamingAgent;

/// Index of the first philosopher, in roster order, within interaction range of `player`.
///
/// Ties between several in-range philosophers go to the earlier entry rather than the closest.
pub fn find_nearby_philosopher(player: Vec2, philosophers: &[RoamingAgent]) -> Option<usize> {
    philosophers
        .iter()
        .position(|agent| agent.is_player_nearby(player))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::npc::{config::default_roster, roaming::INTERACTION_RADIUS};

    fn agents(positions: &[Vec2]) -> Vec<RoamingAgent> {
        default_roster()
            .iter()
            .zip(positions)
            .enumerate()
            .map(|(index, (config, origin))| RoamingAgent::new(config, *origin, index as u64))
            .collect()
    }

    #[test]
    fn nobody_in_range() {
        let roster = agents(&[Vec2::new(0.0, 0.0), Vec2::new(500.0, 0.0)]);
        assert_eq!(find_nearby_philosopher(Vec2::new(250.0, 0.0), &roster), None);
    }

    #[test]
    fn first_in_roster_wins_over_closer() {
        let roster = agents(&[Vec2::new(0.0, 0.0), Vec2::new(60.0, 0.0)]);
        // 40 from the first, 20 from the second.
        assert_eq!(find_nearby_philosopher(Vec2::new(40.0, 0.0), &roster), Some(0));
    }

    #[test]
    fn range_boundary_is_inclusive() {
        let roster = agents(&[Vec2::new(0.0, 0.0)]);
        assert_eq!(
            find_nearby_philosopher(Vec2::new(INTERACTION_RADIUS, 0.0), &roster),
            Some(0)
        );
        assert_eq!(
            find_nearby_philosopher(Vec2::new(INTERACTION_RADIUS + 0.5, 0.0), &roster),
            None
        );
    }
}
