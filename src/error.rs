//! Errors raised while building vehicles and boards, parsing maps, or replaying paths.
//!
//! Search outcomes ("no solution", "canceled") are not errors: they are
//! variants of [`crate::search::SearchResult`].

use std::io;

use thiserror::Error;

use crate::state::Move;
use crate::vehicle::VehicleId;

#[derive(Debug, Error)]
pub enum PuzzleError {
    /// A vehicle's geometry, length, orientation or id is not acceptable on a 6x6 board.
    #[error("invalid vehicle {id:?}: {reason}")]
    InvalidVehicle { id: String, reason: String },

    /// Two vehicles claim the same cell.
    #[error("vehicles {first} and {second} overlap at ({row}, {col})")]
    Overlap {
        first: VehicleId,
        second: VehicleId,
        row: usize,
        col: usize,
    },

    #[error("vehicle id {0} is used more than once")]
    DuplicateVehicle(VehicleId),

    #[error("the puzzle has no target vehicle")]
    MissingTarget,

    #[error("the puzzle has more than one target vehicle: {first} and {second}")]
    MultipleTargets { first: VehicleId, second: VehicleId },

    /// A map line could not be read. `line` is 1-based.
    #[error("map line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Step `step` (0-based) of a replayed path is not legal in the state it is applied to.
    #[error("step {step}: move {mv} is not legal")]
    IllegalMove { step: usize, mv: Move },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl PuzzleError {
    pub(crate) fn invalid_vehicle(id: impl Into<String>, reason: impl Into<String>) -> Self {
        PuzzleError::InvalidVehicle {
            id: id.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        PuzzleError::Parse {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T, E = PuzzleError> = std::result::Result<T, E>;
