//! The six cardinal face directions used by cuboid elements.

use serde::Deserialize;

/// One of the six named faces of a cuboid element. Case-sensitive names
/// match the JSON schema (`north`, `south`, `east`, `west`, `up`, `down`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    South,
    East,
    West,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::Up,
        Direction::Down,
    ];

    /// Pre-rotation face normal, per the fixed face table.
    pub fn normal(self) -> [f32; 3] {
        match self {
            Direction::North => [0.0, 0.0, -1.0],
            Direction::South => [0.0, 0.0, 1.0],
            Direction::East => [1.0, 0.0, 0.0],
            Direction::West => [-1.0, 0.0, 0.0],
            Direction::Up => [0.0, 1.0, 0.0],
            Direction::Down => [0.0, -1.0, 0.0],
        }
    }

    /// Corner indices (into the 8-corner cuboid table) forming this face's
    /// quad, in winding order.
    pub fn corner_indices(self) -> [usize; 4] {
        match self {
            Direction::North => [1, 0, 3, 2],
            Direction::South => [4, 5, 6, 7],
            Direction::East => [5, 1, 2, 6],
            Direction::West => [0, 4, 7, 3],
            Direction::Up => [3, 7, 6, 2],
            Direction::Down => [0, 1, 5, 4],
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Direction> {
        match s {
            "north" => Some(Direction::North),
            "south" => Some(Direction::South),
            "east" => Some(Direction::East),
            "west" => Some(Direction::West),
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn north_face_table_matches_fixed_convention() {
        assert_eq!(Direction::North.corner_indices(), [1, 0, 3, 2]);
        assert_eq!(Direction::North.normal(), [0.0, 0.0, -1.0]);
    }

    #[test]
    fn all_six_directions_have_distinct_normals() {
        let mut normals: Vec<[f32; 3]> = Direction::ALL.iter().map(|d| d.normal()).collect();
        normals.sort_by(|a, b| a.partial_cmp(b).unwrap());
        normals.dedup();
        assert_eq!(normals.len(), 6);
    }

    #[test]
    fn unknown_name_is_none() {
        assert_eq!(Direction::from_str_opt("northeast"), None);
    }
}
