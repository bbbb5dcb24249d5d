//! Built-in puzzle layouts.

use crate::error::Result;
use crate::map::parse_map;
use crate::state::State;

/// A named map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Puzzle {
    pub name: &'static str,
    pub description: &'static str,
    pub map: &'static str,
}

impl Puzzle {
    pub fn state(&self) -> Result<State> {
        parse_map(self.map)
    }
}

static PUZZLES: [Puzzle; 4] = [
    Puzzle {
        name: "solved",
        description: "Target already at the exit",
        map: r#"
("X", 2, 4, 2, "H", 1)
("A", 0, 0, 3, "V", 0)
("B", 4, 2, 3, "H", 0)
"#,
    },
    Puzzle {
        name: "one-blocker",
        description: "A single car stands between the target and the exit",
        map: r#"
# Moving A up once clears the exit lane.
("X", 2, 0, 2, "H", 1)
("A", 1, 4, 2, "V", 0)
("B", 3, 4, 3, "V", 0)
("C", 0, 0, 3, "H", 0)
("D", 3, 0, 2, "V", 0)
("E", 4, 1, 2, "H", 0)
"#,
    },
    Puzzle {
        name: "gridlock",
        description: "The target can never pass the car in its lane",
        map: r#"
("X", 2, 0, 2, "H", 1)
("Y", 2, 4, 2, "H", 0)
"#,
    },
    Puzzle {
        name: "classic",
        description: "Six vehicles, 25 moves at best",
        map: r#"
("X", 2, 0, 2, "H", 1)
("A", 3, 1, 2, "V", 0)
("B", 0, 2, 3, "V", 0)
("C", 4, 2, 2, "H", 0)
("D", 3, 4, 3, "V", 0)
("E", 1, 5, 2, "V", 0)
"#,
    },
];

pub fn catalogue() -> &'static [Puzzle] {
    &PUZZLES
}

pub fn by_name(name: &str) -> Option<&'static Puzzle> {
    PUZZLES.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_map_is_valid() {
        for puzzle in catalogue() {
            let state = puzzle.state().unwrap_or_else(|e| panic!("{}: {e}", puzzle.name));
            assert_eq!(state.target().id().as_str(), "X", "{}", puzzle.name);
        }
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(by_name("Classic").map(|p| p.name), Some("classic"));
        assert!(by_name("nope").is_none());
        assert!(by_name("solved").unwrap().state().unwrap().is_goal());
    }
}
