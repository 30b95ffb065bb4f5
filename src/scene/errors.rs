//! Non-fatal problems found while building the scene from configuration and map data.
use std::fmt;

use crate::npc::components::PhilosopherId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneSetupError {
    /// No object in the spawn layer matches the philosopher's name or id.
    MissingSpawnPoint { id: PhilosopherId, name: String },
    /// A second roster entry reused an id already placed in the scene.
    DuplicatePhilosopher { id: PhilosopherId },
}

impl fmt::Display for SceneSetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSpawnPoint { id, name } => write!(
                f,
                "spawn point not found for \"{}\" (id {}); check the map's \"Objects\" layer",
                name, id
            ),
            Self::DuplicatePhilosopher { id } => {
                write!(f, "philosopher id {} is configured more than once", id)
            }
        }
    }
}

impl std::error::Error for SceneSetupError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_philosopher() {
        let missing = SceneSetupError::MissingSpawnPoint {
            id: PhilosopherId::new("krishna"),
            name: "Krishna".into(),
        };
        assert!(missing.to_string().contains("\"Krishna\""));
        assert!(missing.to_string().contains("krishna"));

        let duplicate = SceneSetupError::DuplicatePhilosopher {
            id: PhilosopherId::new("buddha"),
        };
        assert!(duplicate.to_string().contains("buddha"));
    }
}
