//! Wall-normal stabilization
//!
//! Scanned rooms are noisy: two clicks on the "same" wall rarely report the
//! same triangle normal. Snapping to one of four horizontal directions makes
//! repeated placements on a wall line up exactly, and the up-component test
//! keeps stickers off floors and ceilings.

use serde::{Deserialize, Serialize};

use crate::core::config::PlacementConfig;
use crate::foundation::math::{UnitVec3, Vec3};
use super::PlacementError;

/// Below this the horizontal projection has no usable direction
const DEGENERATE_EPSILON: f64 = 1e-6;

/// The four wall directions a stabilized normal can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardinalDirection {
    /// +X
    PosX,
    /// -X
    NegX,
    /// +Z
    PosZ,
    /// -Z
    NegZ,
}

impl CardinalDirection {
    /// All four directions
    pub const ALL: [CardinalDirection; 4] = [Self::PosX, Self::NegX, Self::PosZ, Self::NegZ];

    /// Unit vector for this direction
    pub fn vector(self) -> Vec3 {
        match self {
            Self::PosX => Vec3::x(),
            Self::NegX => -Vec3::x(),
            Self::PosZ => Vec3::z(),
            Self::NegZ => -Vec3::z(),
        }
    }

    /// Unit vector, typed as such
    pub fn unit_vector(self) -> UnitVec3 {
        UnitVec3::new_unchecked(self.vector())
    }

    /// Exact inverse of [`CardinalDirection::vector`]; `None` for anything else
    pub fn from_vector(v: &Vec3) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.vector() == *v)
    }
}

/// Zero the up component of a normal
pub fn project_horizontal(normal: &Vec3) -> Vec3 {
    Vec3::new(normal.x, 0.0, normal.z)
}

/// Pick the dominant horizontal axis and keep its sign
///
/// Ties go to X. Returns `None` when neither component is usable.
pub fn snap_to_cardinal(x: f64, z: f64) -> Option<CardinalDirection> {
    let (ax, az) = (x.abs(), z.abs());
    if !(ax.is_finite() && az.is_finite()) || (ax < DEGENERATE_EPSILON && az < DEGENERATE_EPSILON) {
        return None;
    }

    let direction = if ax >= az {
        if x >= 0.0 { CardinalDirection::PosX } else { CardinalDirection::NegX }
    } else if z >= 0.0 {
        CardinalDirection::PosZ
    } else {
        CardinalDirection::NegZ
    };
    Some(direction)
}

/// Snaps raw surface normals to wall directions
#[derive(Debug, Clone)]
pub struct WallNormalStabilizer {
    wall_threshold: f64,
    fallback: CardinalDirection,
}

impl WallNormalStabilizer {
    /// Create a stabilizer with an explicit threshold and fallback
    pub fn new(wall_threshold: f64, fallback: CardinalDirection) -> Self {
        Self { wall_threshold, fallback }
    }

    /// Create a stabilizer from configuration
    pub fn from_config(config: &PlacementConfig) -> Self {
        Self::new(config.wall_threshold, config.fallback_normal)
    }

    /// Threshold above which |up| means floor/ceiling
    pub fn wall_threshold(&self) -> f64 {
        self.wall_threshold
    }

    /// Whether a normal belongs to a wall (`|up| <= threshold`)
    pub fn is_wall(&self, normal: &Vec3) -> bool {
        let unit = normal.try_normalize(0.0).unwrap_or(*normal);
        unit.y.abs() <= self.wall_threshold
    }

    /// Snap a world-space normal to a wall direction
    ///
    /// Rejects with [`PlacementError::NonWallHit`] when the surface is too
    /// horizontal. A normal with no horizontal component resolves to the
    /// configured fallback direction instead of producing NaN.
    pub fn stabilize(&self, normal: &Vec3) -> Result<CardinalDirection, PlacementError> {
        let unit = normal.try_normalize(0.0).unwrap_or(*normal);

        if unit.y.abs() > self.wall_threshold {
            log::debug!("Rejected non-wall normal {:?}", normal);
            return Err(PlacementError::NonWallHit { up_component: unit.y });
        }

        let horizontal = project_horizontal(&unit);
        match snap_to_cardinal(horizontal.x, horizontal.z) {
            Some(direction) => {
                log::trace!("Stabilized {:?} -> {:?}", normal, direction);
                Ok(direction)
            }
            None => {
                log::warn!("Degenerate normal {:?}, using fallback {:?}", normal, self.fallback);
                Ok(self.fallback)
            }
        }
    }
}

impl Default for WallNormalStabilizer {
    fn default() -> Self {
        Self::from_config(&PlacementConfig::default())
    }
}
