use std::fmt;
use std::str::FromStr;

use sf_nbt::BlockPos;

use crate::error::{CommandError, CommandResult};

/// One axis of a position or rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coordinate {
    /// A world coordinate.
    Absolute(f64),
    /// `~offset`, relative to the execution position.
    Relative(f64),
    /// `^offset`, along the execution rotation.
    Local(f64),
}

fn write_number(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        write!(f, "{}", value as i64)
    } else {
        write!(f, "{value}")
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (prefix, value) = match *self {
            Coordinate::Absolute(v) => return write_number(f, v),
            Coordinate::Relative(v) => ("~", v),
            Coordinate::Local(v) => ("^", v),
        };
        f.write_str(prefix)?;
        if value != 0.0 {
            write_number(f, value)?;
        }
        Ok(())
    }
}

impl FromStr for Coordinate {
    type Err = CommandError;

    fn from_str(s: &str) -> CommandResult<Self> {
        let invalid = || CommandError::InvalidCoordinate(s.to_string());
        let offset = |rest: &str| -> CommandResult<f64> {
            if rest.is_empty() {
                Ok(0.0)
            } else {
                rest.parse().map_err(|_| invalid())
            }
        };
        if let Some(rest) = s.strip_prefix('~') {
            Ok(Coordinate::Relative(offset(rest)?))
        } else if let Some(rest) = s.strip_prefix('^') {
            Ok(Coordinate::Local(offset(rest)?))
        } else {
            s.parse().map(Coordinate::Absolute).map_err(|_| invalid())
        }
    }
}

// ---------------------------------------------------------------------------
// Positions
// ---------------------------------------------------------------------------

/// A three-axis position. Local coordinates are all-or-nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// X axis (or left for local).
    pub x: Coordinate,
    /// Y axis (or up for local).
    pub y: Coordinate,
    /// Z axis (or forward for local).
    pub z: Coordinate,
}

impl Coordinates {
    /// Validate three axes.
    pub fn new(x: Coordinate, y: Coordinate, z: Coordinate) -> CommandResult<Self> {
        let locals = [x, y, z]
            .iter()
            .filter(|c| matches!(c, Coordinate::Local(_)))
            .count();
        let coords = Self { x, y, z };
        if locals == 0 || locals == 3 {
            Ok(coords)
        } else {
            Err(CommandError::MixedCoordinates(coords.to_string()))
        }
    }

    /// The absolute position of a block.
    pub fn block(pos: BlockPos) -> Self {
        Self {
            x: Coordinate::Absolute(f64::from(pos.x)),
            y: Coordinate::Absolute(f64::from(pos.y)),
            z: Coordinate::Absolute(f64::from(pos.z)),
        }
    }

    /// `x y z` in world space.
    pub fn absolute(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: Coordinate::Absolute(x),
            y: Coordinate::Absolute(y),
            z: Coordinate::Absolute(z),
        }
    }

    /// `~ ~ ~`
    pub fn here() -> Self {
        Self::relative(0.0, 0.0, 0.0)
    }

    /// `~x ~y ~z`
    pub fn relative(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: Coordinate::Relative(x),
            y: Coordinate::Relative(y),
            z: Coordinate::Relative(z),
        }
    }
}

impl From<BlockPos> for Coordinates {
    fn from(pos: BlockPos) -> Self {
        Self::block(pos)
    }
}

impl FromStr for Coordinates {
    type Err = CommandError;

    fn from_str(s: &str) -> CommandResult<Self> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        match parts.as_slice() {
            [x, y, z] => Self::new(x.parse()?, y.parse()?, z.parse()?),
            _ => Err(CommandError::InvalidCoordinate(s.to_string())),
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z)
    }
}

/// A yaw/pitch pair, as used by `rotated`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    /// Horizontal angle.
    pub yaw: Coordinate,
    /// Vertical angle.
    pub pitch: Coordinate,
}

impl Rotation {
    /// Absolute angles in degrees.
    pub fn degrees(yaw: f64, pitch: f64) -> Self {
        Self {
            yaw: Coordinate::Absolute(yaw),
            pitch: Coordinate::Absolute(pitch),
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.yaw, self.pitch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_kinds() {
        assert_eq!(Coordinates::block(BlockPos::new(1, -2, 3)).to_string(), "1 -2 3");
        assert_eq!(Coordinates::here().to_string(), "~ ~ ~");
        assert_eq!(Coordinates::relative(0.0, 1.5, -1.0).to_string(), "~ ~1.5 ~-1");
    }

    #[test]
    fn parse_mixed_relative_and_absolute() {
        let c: Coordinates = "10 ~2 ~".parse().unwrap();
        assert_eq!(c.x, Coordinate::Absolute(10.0));
        assert_eq!(c.y, Coordinate::Relative(2.0));
        assert_eq!(c.to_string(), "10 ~2 ~");
    }

    #[test]
    fn local_cannot_mix() {
        assert!("^ ^ ^1".parse::<Coordinates>().is_ok());
        assert!(matches!(
            "^ ~ ^".parse::<Coordinates>(),
            Err(CommandError::MixedCoordinates(_))
        ));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!("1 2".parse::<Coordinates>().is_err());
        assert!("a b c".parse::<Coordinates>().is_err());
    }

    #[test]
    fn rotation_renders() {
        assert_eq!(Rotation::degrees(90.0, -45.5).to_string(), "90 -45.5");
    }
}
