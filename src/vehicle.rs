//! Vehicles and the directions they slide in.

use std::fmt;
use std::str::FromStr;

use arrayvec::ArrayString;
use serde::{Deserialize, Serialize};

use crate::error::{PuzzleError, Result};

/// Width and height of the board.
pub const BOARD_SIZE: usize = 6;

/// Longest accepted vehicle id, in bytes.
pub const MAX_ID_LEN: usize = 8;

/// A one-cell slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Row and column delta of a one-cell slide.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// The only orientation whose vehicles may slide this way.
    pub fn axis(&self) -> Orientation {
        match self {
            Direction::Up | Direction::Down => Orientation::Vertical,
            Direction::Left | Direction::Right => Orientation::Horizontal,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// The two directions a vehicle with this orientation can slide in.
    pub fn directions(&self) -> [Direction; 2] {
        match self {
            Orientation::Horizontal => [Direction::Left, Direction::Right],
            Orientation::Vertical => [Direction::Up, Direction::Down],
        }
    }
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "H" | "h" => Ok(Orientation::Horizontal),
            "V" | "v" => Ok(Orientation::Vertical),
            other => Err(format!("orientation must be 'H' or 'V', got {other:?}")),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Orientation::Horizontal => "H",
            Orientation::Vertical => "V",
        })
    }
}

/// Short printable identifier of a vehicle, unique within a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VehicleId(ArrayString<MAX_ID_LEN>);

impl VehicleId {
    pub fn new(id: &str) -> Result<Self> {
        if id.is_empty() {
            return Err(PuzzleError::invalid_vehicle(id, "id must not be empty"));
        }
        if !id.chars().all(|c| c.is_ascii_graphic()) {
            return Err(PuzzleError::invalid_vehicle(
                id,
                "id must be printable ASCII without spaces",
            ));
        }
        ArrayString::from(id).map(VehicleId).map_err(|_| {
            PuzzleError::invalid_vehicle(id, format!("id is longer than {MAX_ID_LEN} bytes"))
        })
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for VehicleId {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self> {
        VehicleId::new(s)
    }
}

impl TryFrom<String> for VehicleId {
    type Error = PuzzleError;

    fn try_from(s: String) -> Result<Self> {
        VehicleId::new(&s)
    }
}

impl From<VehicleId> for String {
    fn from(id: VehicleId) -> String {
        id.as_str().to_owned()
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One vehicle's placement and shape.
///
/// Vehicles are plain values: sliding one produces a new `Vehicle` and every
/// constructor re-checks that the vehicle lies entirely on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Vehicle {
    id: VehicleId,
    row: u8,
    col: u8,
    length: u8,
    orientation: Orientation,
    is_target: bool,
}

impl Vehicle {
    /// Build a vehicle anchored at its top-left cell.
    ///
    /// # Errors
    ///
    /// [`PuzzleError::InvalidVehicle`] when the anchor is negative or off the
    /// board, the length is below 2, or the body runs past the board edge.
    pub fn new(
        id: VehicleId,
        row: i32,
        col: i32,
        length: i32,
        orientation: Orientation,
        is_target: bool,
    ) -> Result<Self> {
        let size = BOARD_SIZE as i32;
        let invalid = |reason: String| PuzzleError::invalid_vehicle(id.as_str(), reason);

        if row < 0 || col < 0 {
            return Err(invalid(format!(
                "position cannot be negative: row={row}, col={col}"
            )));
        }
        if row >= size || col >= size {
            return Err(invalid(format!(
                "position out of bounds: row={row}, col={col}, board is {size}x{size}"
            )));
        }
        if length < 2 {
            return Err(invalid(format!(
                "vehicle length must be at least 2, got {length}"
            )));
        }
        if length > size {
            return Err(invalid(format!(
                "vehicle length must be at most {size}, got {length}"
            )));
        }
        let end = match orientation {
            Orientation::Horizontal => col + length,
            Orientation::Vertical => row + length,
        };
        if end > size {
            return Err(invalid(format!(
                "{orientation} vehicle of length {length} at ({row}, {col}) extends beyond the board"
            )));
        }

        Ok(Self {
            id,
            row: row as u8,
            col: col as u8,
            length: length as u8,
            orientation,
            is_target,
        })
    }

    pub fn id(&self) -> VehicleId {
        self.id
    }

    pub fn row(&self) -> usize {
        self.row.into()
    }

    pub fn col(&self) -> usize {
        self.col.into()
    }

    pub fn length(&self) -> usize {
        self.length.into()
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn is_target(&self) -> bool {
        self.is_target
    }

    /// Cells covered by the vehicle, from the anchor outwards.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let (row, col) = (self.row(), self.col());
        let orientation = self.orientation;
        (0..self.length()).map(move |i| match orientation {
            Orientation::Horizontal => (row, col + i),
            Orientation::Vertical => (row + i, col),
        })
    }

    /// Whether a one-cell slide stays on the board. Other vehicles are not considered.
    pub fn can_move(&self, direction: Direction) -> bool {
        if direction.axis() != self.orientation {
            return false;
        }
        match direction {
            Direction::Left => self.col > 0,
            Direction::Right => self.col() + self.length() < BOARD_SIZE,
            Direction::Up => self.row > 0,
            Direction::Down => self.row() + self.length() < BOARD_SIZE,
        }
    }

    /// The vehicle slid one cell in `direction`.
    ///
    /// # Errors
    ///
    /// [`PuzzleError::InvalidVehicle`] if the slide is across the vehicle's axis
    /// or would leave the board.
    pub fn moved(&self, direction: Direction) -> Result<Self> {
        if direction.axis() != self.orientation {
            return Err(PuzzleError::invalid_vehicle(
                self.id.as_str(),
                format!("{} vehicle cannot move {direction}", self.orientation),
            ));
        }
        let (dr, dc) = direction.as_offset();
        Vehicle::new(
            self.id,
            self.row as i32 + dr as i32,
            self.col as i32 + dc as i32,
            self.length.into(),
            self.orientation,
            self.is_target,
        )
    }

    /// Directions along the vehicle's axis that keep it on the board.
    pub fn possible_move_directions(&self) -> impl Iterator<Item = Direction> {
        let vehicle = *self;
        self.orientation
            .directions()
            .into_iter()
            .filter(move |&d| vehicle.can_move(d))
    }
}
