//! Serde remote definitions for glam types.
//!
//! Vectors serialize as `{ "x": .., "y": .., "z": .. }` so config files stay
//! readable. Use with `#[serde(with = "Vec3Def")]`.

use glam::{UVec3, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
#[serde(remote = "Vec3")]
pub struct Vec3Def {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Per-axis counts
#[derive(Serialize, Deserialize)]
#[serde(remote = "UVec3")]
pub struct UVec3Def {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}
