use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::ops::{Add, Neg, Sub};

pub const API_VERSION: &str = "1";

/// Grid position or offset. The y axis grows downwards.
#[derive(Serialize, Deserialize, Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Vec2D {
    pub x: i16,
    pub y: i16,
}

#[inline]
pub const fn v2(x: i16, y: i16) -> Vec2D {
    Vec2D { x, y }
}

impl Vec2D {
    pub const fn new(x: i16, y: i16) -> Vec2D {
        Vec2D { x, y }
    }

    pub fn apply(self, d: Direction) -> Vec2D {
        self + d.into()
    }

    pub fn manhattan(&self) -> u32 {
        self.x.unsigned_abs() as u32 + self.y.unsigned_abs() as u32
    }

    /// Manhattan distance between two positions.
    pub fn distance(self, other: Vec2D) -> u32 {
        (self - other).manhattan()
    }

    pub fn within(&self, width: usize, height: usize) -> bool {
        0 <= self.x && (self.x as usize) < width && 0 <= self.y && (self.y as usize) < height
    }
}

impl From<(i16, i16)> for Vec2D {
    fn from(val: (i16, i16)) -> Self {
        Vec2D::new(val.0, val.1)
    }
}

impl From<Direction> for Vec2D {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Up => Vec2D::new(0, -1),
            Direction::Right => Vec2D::new(1, 0),
            Direction::Down => Vec2D::new(0, 1),
            Direction::Left => Vec2D::new(-1, 0),
        }
    }
}

impl Add for Vec2D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Sub for Vec2D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl Neg for Vec2D {
    type Output = Vec2D;

    fn neg(self) -> Self::Output {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Hash, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub fn iter() -> impl Iterator<Item = Direction> {
        [
            Direction::Up,
            Direction::Right,
            Direction::Down,
            Direction::Left,
        ]
        .into_iter()
    }

    pub fn invert(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// Both directions travel along the same axis.
    pub fn same_axis(self, other: Direction) -> bool {
        self.is_vertical() == other.is_vertical()
    }
}

/// Converts a unit offset into its direction.
/// The offset is expected to be non-zero.
impl From<Vec2D> for Direction {
    fn from(p: Vec2D) -> Direction {
        if p.x < 0 {
            Direction::Left
        } else if p.x > 0 {
            Direction::Right
        } else if p.y < 0 {
            Direction::Up
        } else {
            Direction::Down
        }
    }
}

/// Body request of `POST /input`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct InputRequest {
    pub direction: Direction,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InputResponse {
    /// `false` if the turn was ignored
    pub accepted: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

/// Per snake part of the [Snapshot].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SnakeData {
    pub name: String,
    /// head to tail
    pub body: Vec<Vec2D>,
    pub score: u32,
    pub boosted: bool,
    pub heading: Option<Direction>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub width: usize,
    pub height: usize,
    pub fruits: Vec<Vec2D>,
    pub power_ups: Vec<Vec2D>,
    pub shrinks: Vec<Vec2D>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum PhaseData {
    Running,
    Ended { winner: String, cause: String },
}

/// Read-only state handed to the presentation layer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub apiversion: String,
    pub board: Board,
    pub human: SnakeData,
    pub ai: SnakeData,
    pub win_score: u32,
    #[serde(flatten)]
    pub phase: PhaseData,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn direction_offsets() {
        assert_eq!(v2(3, 3).apply(Direction::Up), v2(3, 2));
        assert_eq!(v2(3, 3).apply(Direction::Down), v2(3, 4));
        assert_eq!(v2(3, 3).apply(Direction::Left), v2(2, 3));
        assert_eq!(v2(3, 3).apply(Direction::Right), v2(4, 3));
        for d in Direction::iter() {
            assert_eq!(Direction::from(Vec2D::from(d)), d);
            assert_eq!(Vec2D::from(d.invert()), -Vec2D::from(d));
            assert!(d.same_axis(d.invert()));
        }
        assert!(!Direction::Up.same_axis(Direction::Left));
    }

    #[test]
    fn distances() {
        assert_eq!(v2(0, 0).distance(v2(9, 9)), 18);
        assert_eq!(v2(4, 1).distance(v2(1, 5)), 7);
        assert!(v2(0, 0).within(1, 1));
        assert!(!v2(-1, 0).within(5, 5));
        assert!(!v2(5, 0).within(5, 5));
    }

    #[test]
    fn input_request() {
        let input: InputRequest = serde_json::from_str(r#"{"direction":"left"}"#).unwrap();
        assert_eq!(input.direction, Direction::Left);
        assert!(serde_json::from_str::<InputRequest>(r#"{"direction":"north"}"#).is_err());
    }
}
