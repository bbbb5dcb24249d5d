//! Board states: an arrangement of vehicles plus its occupancy grid.

use std::fmt;
use std::hash::{Hash, Hasher};

use log::trace;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{PuzzleError, Result};
use crate::vehicle::{Direction, Orientation, Vehicle, VehicleId, BOARD_SIZE};

/// Row the target vehicle leaves the board through (off the right edge).
pub const EXIT_ROW: usize = 2;

/// The target is out once its rightmost cell reaches this column.
pub const EXIT_THRESHOLD: usize = 4;

type Grid = [[Option<u8>; BOARD_SIZE]; BOARD_SIZE];

/// Slide one vehicle one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub vehicle: VehicleId,
    pub direction: Direction,
}

impl Move {
    pub fn new(vehicle: VehicleId, direction: Direction) -> Self {
        Self { vehicle, direction }
    }

    /// The move that undoes this one.
    pub fn reversed(&self) -> Self {
        Self {
            vehicle: self.vehicle,
            direction: self.direction.opposite(),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.vehicle, self.direction)
    }
}

/// Order-independent identity of a state: `(id, row, col)` per vehicle, sorted by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey(SmallVec<[(VehicleId, u8, u8); 16]>);

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (id, row, col)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            write!(f, "{id}:{row},{col}")?;
        }
        Ok(())
    }
}

/// An immutable arrangement of vehicles.
///
/// Vehicles are kept sorted by id, which makes move generation deterministic
/// and the canonical key independent of the order the vehicles were supplied in.
/// The occupancy grid is rebuilt from scratch for every new state.
#[derive(Debug, Clone)]
pub struct State {
    vehicles: Vec<Vehicle>,
    grid: Grid,
    target: usize,
}

impl State {
    /// Build a state, validating the arrangement as a whole.
    ///
    /// # Errors
    ///
    /// - [`PuzzleError::DuplicateVehicle`] if two vehicles share an id.
    /// - [`PuzzleError::MissingTarget`] / [`PuzzleError::MultipleTargets`] unless
    ///   exactly one vehicle is the target.
    /// - [`PuzzleError::Overlap`] if two vehicles cover the same cell.
    pub fn new(mut vehicles: Vec<Vehicle>) -> Result<Self> {
        vehicles.sort_by_key(|v| v.id());
        if let Some(pair) = vehicles.windows(2).find(|w| w[0].id() == w[1].id()) {
            return Err(PuzzleError::DuplicateVehicle(pair[0].id()));
        }

        let mut targets = vehicles.iter().enumerate().filter(|(_, v)| v.is_target());
        let target = match (targets.next(), targets.next()) {
            (None, _) => return Err(PuzzleError::MissingTarget),
            (Some((i, _)), None) => i,
            (Some((_, first)), Some((_, second))) => {
                return Err(PuzzleError::MultipleTargets {
                    first: first.id(),
                    second: second.id(),
                })
            }
        };

        let grid = Self::build_grid(&vehicles)?;
        Ok(Self {
            vehicles,
            grid,
            target,
        })
    }

    fn build_grid(vehicles: &[Vehicle]) -> Result<Grid> {
        let mut grid: Grid = [[None; BOARD_SIZE]; BOARD_SIZE];
        for (i, vehicle) in vehicles.iter().enumerate() {
            for (row, col) in vehicle.occupied_cells() {
                if let Some(other) = grid[row][col] {
                    return Err(PuzzleError::Overlap {
                        first: vehicles[usize::from(other)].id(),
                        second: vehicle.id(),
                        row,
                        col,
                    });
                }
                // At most 18 vehicles fit on the board without overlapping.
                grid[row][col] = Some(i as u8);
            }
        }
        Ok(grid)
    }

    /// Vehicles sorted by id.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn target(&self) -> &Vehicle {
        &self.vehicles[self.target]
    }

    pub fn get_vehicle(&self, id: &VehicleId) -> Option<&Vehicle> {
        self.index_of(id).map(|i| &self.vehicles[i])
    }

    fn index_of(&self, id: &VehicleId) -> Option<usize> {
        self.vehicles.binary_search_by_key(id, |v| v.id()).ok()
    }

    /// The vehicle covering a cell, if any.
    pub fn occupant(&self, row: usize, col: usize) -> Option<&Vehicle> {
        self.grid
            .get(row)
            .and_then(|cells| cells.get(col))
            .copied()
            .flatten()
            .map(|i| &self.vehicles[usize::from(i)])
    }

    /// The target is horizontal on the exit row with its front at or past the threshold.
    pub fn is_goal(&self) -> bool {
        let target = self.target();
        target.orientation() == Orientation::Horizontal
            && target.row() == EXIT_ROW
            && target.col() + target.length() - 1 >= EXIT_THRESHOLD
    }

    // The vehicle at `index` slid one cell, if it stays on the board and clear of the others.
    fn slide(&self, index: usize, direction: Direction) -> Option<Vehicle> {
        let vehicle = &self.vehicles[index];
        if !vehicle.can_move(direction) {
            return None;
        }
        let moved = vehicle.moved(direction).ok()?;
        let clear = moved.occupied_cells().all(|(row, col)| {
            self.grid[row][col].map_or(true, |other| usize::from(other) == index)
        });
        clear.then_some(moved)
    }

    /// Every move that is legal right now, vehicles in id order.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        for (i, vehicle) in self.vehicles.iter().enumerate() {
            for direction in vehicle.possible_move_directions() {
                if self.slide(i, direction).is_some() {
                    moves.push(Move::new(vehicle.id(), direction));
                }
            }
        }
        moves
    }

    pub fn is_legal(&self, mv: &Move) -> bool {
        self.index_of(&mv.vehicle)
            .and_then(|i| self.slide(i, mv.direction))
            .is_some()
    }

    /// The state after `mv`, or `None` if `mv` is not legal here.
    pub fn apply(&self, mv: &Move) -> Option<State> {
        let Some(index) = self.index_of(&mv.vehicle) else {
            trace!("rejecting {mv}: no such vehicle");
            return None;
        };
        let Some(moved) = self.slide(index, mv.direction) else {
            trace!("rejecting {mv}: blocked or off the board");
            return None;
        };

        let mut vehicles = self.vehicles.clone();
        vehicles[index] = moved;
        let grid = Self::build_grid(&vehicles).ok()?;
        Some(State {
            vehicles,
            grid,
            target: self.target,
        })
    }

    /// Price of a move: the length of the vehicle being moved.
    pub fn move_cost(&self, mv: &Move) -> Option<u32> {
        self.get_vehicle(&mv.vehicle).map(|v| v.length() as u32)
    }

    pub fn canonical_key(&self) -> StateKey {
        let mut key: SmallVec<[(VehicleId, u8, u8); 16]> = self
            .vehicles
            .iter()
            .map(|v| (v.id(), v.row() as u8, v.col() as u8))
            .collect();
        key.sort_unstable();
        StateKey(key)
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.vehicles == other.vehicles
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.vehicles.hash(state);
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .vehicles
            .iter()
            .map(|v| v.id().as_str().len())
            .max()
            .unwrap_or(1);

        write!(f, " ")?;
        for col in 0..BOARD_SIZE {
            write!(f, " {:>width$}", col)?;
        }
        writeln!(f)?;

        for row in 0..BOARD_SIZE {
            write!(f, "{row}")?;
            for col in 0..BOARD_SIZE {
                match self.occupant(row, col) {
                    Some(v) => write!(f, " {:>width$}", v.id().as_str())?,
                    None => write!(f, " {:>width$}", ".")?,
                }
            }
            if row == EXIT_ROW {
                write!(f, " >")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
