//! Rooms and the exit graph.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Why a move was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("you are already there")]
    AlreadyThere,
    #[error("that is too far away")]
    TooFar,
}

/// A node in the location graph. Exits are the room ids reachable from
/// here; the relation is directed, though the seeder links rooms both ways.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Room {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Free-form room category; `"start"` marks the spawn room.
    pub kind: String,
    pub exits: Vec<Uuid>,
}

impl Room {
    /// Check whether a living standing in this room may move to
    /// `destination`.
    pub fn can_move_to(&self, destination: Uuid) -> Result<(), MoveError> {
        if destination == self.id {
            return Err(MoveError::AlreadyThere);
        }
        if !self.exits.contains(&destination) {
            return Err(MoveError::TooFar);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room_with_exit(exit: Uuid) -> Room {
        Room {
            id: Uuid::new_v4(),
            name: "Docking Bay".to_string(),
            description: "Rows of battered shuttles.".to_string(),
            kind: "start".to_string(),
            exits: vec![exit],
        }
    }

    #[test]
    fn test_move_to_adjacent_room_is_allowed() {
        let dest = Uuid::new_v4();
        let room = room_with_exit(dest);
        assert_eq!(room.can_move_to(dest), Ok(()));
    }

    #[test]
    fn test_move_to_current_room_is_refused() {
        let room = room_with_exit(Uuid::new_v4());
        assert_eq!(room.can_move_to(room.id), Err(MoveError::AlreadyThere));
    }

    #[test]
    fn test_move_to_unconnected_room_is_refused() {
        let room = room_with_exit(Uuid::new_v4());
        assert_eq!(room.can_move_to(Uuid::new_v4()), Err(MoveError::TooFar));
    }
}
