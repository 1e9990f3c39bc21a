use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::MapError;

/// Bits used by each axis inside a packed cell id.
pub const AXIS_BITS: u32 = 15;
/// Smallest representable value on either axis.
pub const AXIS_MIN: i32 = -(1 << (AXIS_BITS - 1));
/// Largest representable value on either axis.
pub const AXIS_MAX: i32 = (1 << (AXIS_BITS - 1)) - 1;
/// Every valid cell id is strictly lower than this.
pub const CELL_ID_LIMIT: u32 = 1 << (2 * AXIS_BITS);

const AXIS_BIAS: i32 = -AXIS_MIN;
const AXIS_MASK: u32 = (1 << AXIS_BITS) - 1;

/// A world coordinate.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Deserialize, Serialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn is_valid(&self) -> bool {
        (AXIS_MIN..=AXIS_MAX).contains(&self.x) && (AXIS_MIN..=AXIS_MAX).contains(&self.y)
    }

    /// Packs the coordinate into the id used by the game server.
    ///
    /// `y` goes into the high 15 bits and `x` into the low 15 bits, both shifted
    /// by +16384 so negative values never touch a sign bit. The result equals
    /// `536887296 + x + 32768 * y`.
    pub fn to_cell_id(&self) -> Result<CellId, MapError> {
        if !self.is_valid() {
            return Err(MapError::CoordinateOutOfRange {
                x: self.x as i64,
                y: self.y as i64,
            });
        }

        let x = (self.x + AXIS_BIAS) as u32;
        let y = (self.y + AXIS_BIAS) as u32;
        Ok(CellId((y << AXIS_BITS) | x))
    }

    pub fn from_cell_id(id: CellId) -> Self {
        let raw = id.as_u32();
        Self {
            x: (raw & AXIS_MASK) as i32 - AXIS_BIAS,
            y: (raw >> AXIS_BITS) as i32 - AXIS_BIAS,
        }
    }

    /// Euclidean distance between two points.
    pub fn distance(&self, position: &Position) -> f64 {
        let x_diff = self.x as f64 - position.x as f64;
        let y_diff = self.y as f64 - position.y as f64;

        ((x_diff * x_diff) + (y_diff * y_diff)).sqrt()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}|{})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Scalar identifier of a single map cell.
///
/// Only ids below [`CELL_ID_LIMIT`] can be built, so decoding a `CellId` back
/// into a [`Position`] never fails.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct CellId(u32);

impl CellId {
    pub fn new(raw: u32) -> Result<Self, MapError> {
        if raw >= CELL_ID_LIMIT {
            return Err(MapError::InvalidCellId(raw as i64));
        }
        Ok(Self(raw))
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    pub fn position(&self) -> Position {
        Position::from_cell_id(*self)
    }
}

impl TryFrom<i64> for CellId {
    type Error = MapError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        u32::try_from(raw)
            .map_err(|_| MapError::InvalidCellId(raw))
            .and_then(CellId::new)
    }
}

impl FromStr for CellId {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: i64 = s
            .trim()
            .parse()
            .map_err(|_| MapError::MalformedCellId(s.to_string()))?;
        CellId::try_from(raw)
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for CellId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CellId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(i64),
            Text(String),
        }

        match RawId::deserialize(deserializer)? {
            RawId::Number(n) => CellId::try_from(n),
            RawId::Text(s) => s.parse(),
        }
        .map_err(serde::de::Error::custom)
    }
}

/// Converts a coordinate into its cell id.
pub fn cell_id(x: i32, y: i32) -> Result<CellId, MapError> {
    Position::new(x, y).to_cell_id()
}

/// Converts a raw cell id back into its coordinate.
pub fn reverse_id(id: i64) -> Result<Position, MapError> {
    CellId::try_from(id).map(Position::from_cell_id)
}

pub fn distance(source: &Position, target: &Position) -> f64 {
    source.distance(target)
}
