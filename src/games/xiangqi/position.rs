//! Board coordinates for Chinese chess.
//!
//! Coordinates follow the red player's view of the board: file `x` runs
//! 1-9 from left to right, rank `y` runs 1-10 from the black baseline down
//! to the red baseline. The river lies between rank 5 and rank 6.

use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// Number of files on the board.
pub const FILES: i8 = 9;

/// Number of ranks on the board.
pub const RANKS: i8 = 10;

/// A point on the board.
///
/// Points can only be constructed inside the board, so every `Point`
/// value is a valid square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "(i8, i8)", into = "(i8, i8)")]
pub struct Point {
    x: i8,
    y: i8,
}

impl Point {
    /// Creates a point, or `None` when the coordinate lies off the board.
    pub fn new(x: i8, y: i8) -> Option<Self> {
        if (1..=FILES).contains(&x) && (1..=RANKS).contains(&y) {
            Some(Self { x, y })
        } else {
            None
        }
    }

    /// File (1-9).
    pub fn x(&self) -> i8 {
        self.x
    }

    /// Rank (1-10).
    pub fn y(&self) -> i8 {
        self.y
    }

    /// Shifts the point by the given delta, staying on the board.
    pub fn offset(&self, dx: i8, dy: i8) -> Option<Self> {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Steps one square in the given direction.
    pub fn step(&self, direction: Direction) -> Option<Self> {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }

    /// Iterates every point of the board, rank by rank.
    pub fn all() -> impl Iterator<Item = Point> {
        (1..=RANKS).flat_map(|y| (1..=FILES).map(move |x| Point { x, y }))
    }
}

impl TryFrom<(i8, i8)> for Point {
    type Error = String;

    fn try_from((x, y): (i8, i8)) -> Result<Self, Self::Error> {
        Self::new(x, y).ok_or_else(|| format!("point ({x}, {y}) is off the board"))
    }
}

impl From<Point> for (i8, i8) {
    fn from(point: Point) -> Self {
        (point.x, point.y)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four orthogonal directions on the board.
///
/// `Up` points toward rank 1 (the black baseline).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Direction {
    /// Toward rank 1.
    Up,
    /// Toward rank 10.
    Down,
    /// Toward file 1.
    Left,
    /// Toward file 9.
    Right,
}

impl Direction {
    /// Unit step for this direction.
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Direction of `to` as seen from `from`, if both share a file or rank.
    pub fn between(from: Point, to: Point) -> Option<Self> {
        match (to.x - from.x, to.y - from.y) {
            (0, dy) if dy < 0 => Some(Direction::Up),
            (0, dy) if dy > 0 => Some(Direction::Down),
            (dx, 0) if dx < 0 => Some(Direction::Left),
            (dx, 0) if dx > 0 => Some(Direction::Right),
            _ => None,
        }
    }

    /// Number of steps from `from` to `to` along this direction.
    ///
    /// Only meaningful when `Direction::between(from, to) == Some(self)`.
    pub fn distance(self, from: Point, to: Point) -> i8 {
        match self {
            Direction::Up | Direction::Down => (to.y - from.y).abs(),
            Direction::Left | Direction::Right => (to.x - from.x).abs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_bounds() {
        assert!(Point::new(1, 1).is_some());
        assert!(Point::new(9, 10).is_some());
        assert!(Point::new(0, 5).is_none());
        assert!(Point::new(10, 5).is_none());
        assert!(Point::new(5, 11).is_none());
    }

    #[test]
    fn test_offset_clips_to_board() {
        let corner = Point::new(1, 10).unwrap();
        assert_eq!(corner.offset(-1, 0), None);
        assert_eq!(corner.offset(1, -1), Point::new(2, 9));
    }

    #[test]
    fn test_direction_between() {
        let origin = Point::new(5, 5).unwrap();
        assert_eq!(Direction::between(origin, Point::new(5, 1).unwrap()), Some(Direction::Up));
        assert_eq!(Direction::between(origin, Point::new(9, 5).unwrap()), Some(Direction::Right));
        assert_eq!(Direction::between(origin, Point::new(6, 6).unwrap()), None);
        assert_eq!(Direction::between(origin, origin), None);
    }

    #[test]
    fn test_point_rejects_off_board_json() {
        let parsed: Result<Point, _> = serde_json::from_str("[0, 3]");
        assert!(parsed.is_err());
        let parsed: Point = serde_json::from_str("[4, 3]").unwrap();
        assert_eq!(parsed, Point::new(4, 3).unwrap());
    }

    #[test]
    fn test_all_points() {
        assert_eq!(Point::all().count(), 90);
    }
}
