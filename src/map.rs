//! Plain-text puzzle maps.
//!
//! One vehicle per line, as `id, row, col, length, orientation, is_target`.
//! The tuple form written by the map editor is accepted as well:
//!
//! ```text
//! # target first
//! ("X", 2, 0, 2, "H", 1)
//! ("A", 1, 4, 2, "V", 0)
//! B, 3, 4, 3, V, 0
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. Nothing else is
//! skipped: a malformed line fails the whole map.

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{PuzzleError, Result};
use crate::state::State;
use crate::vehicle::{Orientation, Vehicle, VehicleId};

/// One map line, before any geometry checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub id: String,
    pub row: i32,
    pub col: i32,
    pub length: i32,
    pub orientation: Orientation,
    pub is_target: bool,
}

impl VehicleRecord {
    pub fn to_vehicle(&self) -> Result<Vehicle> {
        Vehicle::new(
            VehicleId::new(&self.id)?,
            self.row,
            self.col,
            self.length,
            self.orientation,
            self.is_target,
        )
    }
}

impl From<&Vehicle> for VehicleRecord {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            id: vehicle.id().as_str().to_owned(),
            row: vehicle.row() as i32,
            col: vehicle.col() as i32,
            length: vehicle.length() as i32,
            orientation: vehicle.orientation(),
            is_target: vehicle.is_target(),
        }
    }
}

fn parse_int(line: usize, name: &str, field: &str) -> Result<i32> {
    field
        .parse()
        .map_err(|_| PuzzleError::parse(line, format!("{name} must be an integer, got {field:?}")))
}

fn parse_line(line: usize, text: &str) -> Result<VehicleRecord> {
    let inner = text
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(')')
        .trim();
    let fields: Vec<&str> = inner
        .split(',')
        .map(|f| f.trim().trim_matches(|c| c == '"' || c == '\''))
        .collect();

    let [id, row, col, length, orientation, target] = fields.as_slice() else {
        return Err(PuzzleError::parse(
            line,
            format!("expected 6 fields, got {}", fields.len()),
        ));
    };

    let orientation: Orientation = orientation
        .parse()
        .map_err(|msg: String| PuzzleError::parse(line, msg))?;
    let is_target = match *target {
        "1" => true,
        "0" => false,
        other => {
            return Err(PuzzleError::parse(
                line,
                format!("target flag must be 0 or 1, got {other:?}"),
            ))
        }
    };

    Ok(VehicleRecord {
        id: (*id).to_owned(),
        row: parse_int(line, "row", row)?,
        col: parse_int(line, "col", col)?,
        length: parse_int(line, "length", length)?,
        orientation,
        is_target,
    })
}

/// Read every vehicle record of a map, in file order.
pub fn parse_records(text: &str) -> Result<Vec<VehicleRecord>> {
    text.lines()
        .enumerate()
        .filter(|(_, l)| {
            let l = l.trim();
            !l.is_empty() && !l.starts_with('#')
        })
        .map(|(i, l)| parse_line(i + 1, l))
        .collect()
}

/// Parse and validate a whole map.
pub fn parse_map(text: &str) -> Result<State> {
    let records = parse_records(text)?;
    State::from_records(&records)
}

/// Read a map file from disk.
pub fn load_map(path: impl AsRef<Path>) -> Result<State> {
    let path = path.as_ref();
    debug!("Loading map {}", path.display());
    let text = fs::read_to_string(path)?;
    let state = parse_map(&text)?;
    debug!(
        "Loaded {} vehicles from {}, target {}",
        state.vehicles().len(),
        path.display(),
        state.target().id()
    );
    Ok(state)
}

impl State {
    pub fn from_records(records: &[VehicleRecord]) -> Result<Self> {
        let vehicles = records
            .iter()
            .map(VehicleRecord::to_vehicle)
            .collect::<Result<Vec<_>>>()?;
        State::new(vehicles)
    }

    /// The state as map records, vehicles in id order.
    pub fn records(&self) -> Vec<VehicleRecord> {
        self.vehicles().iter().map(VehicleRecord::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_line_forms() {
        let records = parse_records(
            "# comment\n\n(\"X\", 2, 0, 2, \"H\", 1)\n  B, 3, 4, 3, v, 0  \n('C', 0, 0, 3, 'H', 0)\n",
        )
        .unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(
            records[0],
            VehicleRecord {
                id: "X".into(),
                row: 2,
                col: 0,
                length: 2,
                orientation: Orientation::Horizontal,
                is_target: true,
            }
        );
        assert_eq!(records[1].orientation, Orientation::Vertical);
        assert_eq!(records[2].id, "C");
    }

    #[test]
    fn reports_the_offending_line() {
        let err = parse_records("X, 2, 0, 2, H, 1\nA, 1, four, 2, V, 0\n").unwrap_err();
        match err {
            PuzzleError::Parse { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("col"), "{message}");
            }
            other => panic!("unexpected error {other:?}"),
        }

        assert!(matches!(
            parse_records("X, 2, 0, 2, H"),
            Err(PuzzleError::Parse { line: 1, .. })
        ));
        assert!(matches!(
            parse_records("X, 2, 0, 2, D, 1"),
            Err(PuzzleError::Parse { line: 1, .. })
        ));
        assert!(matches!(
            parse_records("X, 2, 0, 2, H, 2"),
            Err(PuzzleError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn map_level_validation() {
        assert!(matches!(
            parse_map("X, 2, 0, 2, H, 1\nA, 2, 1, 2, V, 0"),
            Err(PuzzleError::Overlap { .. })
        ));
        assert!(matches!(
            parse_map("X, 2, -1, 2, H, 1"),
            Err(PuzzleError::InvalidVehicle { .. })
        ));
        assert!(matches!(
            parse_map("X, 2, 5, 2, H, 1"),
            Err(PuzzleError::InvalidVehicle { .. })
        ));
        assert!(matches!(
            parse_map("X, 2, 1, 2147483647, H, 1"),
            Err(PuzzleError::InvalidVehicle { .. })
        ));
        assert!(matches!(
            parse_map("A, 0, 0, 2, H, 0"),
            Err(PuzzleError::MissingTarget)
        ));
        assert!(matches!(
            parse_map("X, 2, 0, 2, H, 1\nY, 4, 0, 2, H, 1"),
            Err(PuzzleError::MultipleTargets { .. })
        ));
    }

    #[test]
    fn records_describe_the_state() {
        let state = parse_map("X, 2, 0, 2, H, 1\nA, 0, 5, 3, V, 0").unwrap();
        let again = State::from_records(&state.records()).unwrap();
        assert_eq!(again.canonical_key(), state.canonical_key());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_map("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, PuzzleError::Io(_)));
    }
}
