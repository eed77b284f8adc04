//! Identified input points.
//!
//! The geometric engines own sets of [`Point`]s: plain 2-D coordinates plus
//! a stable [`PointId`]. Derived structures (triangles, cells, edges)
//! reference points by id or carry coordinate copies; they are recomputed
//! from the point set on every mutation, never patched, so those references
//! denote membership rather than ownership.

use crate::core::util::make_uuid;
use crate::geometry::vector::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Error raised when a point cannot be constructed.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PointError {
    /// One or both coordinates are NaN or infinite.
    #[error("non-finite coordinates ({x}, {y})")]
    NonFinite {
        /// Offending x coordinate.
        x: f64,
        /// Offending y coordinate.
        y: f64,
    },
}

/// Stable identity of an engine-owned point.
///
/// Ids survive coordinate mutation: dragging a point to new coordinates
/// keeps its id, so derived-structure references and UI selections remain
/// meaningful across moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointId(Uuid);

impl PointId {
    /// Generates a fresh unique id.
    #[must_use]
    pub fn fresh() -> Self {
        Self(make_uuid())
    }

    /// The underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An input point: 2-D coordinates with a stable id.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Stable identity, assigned at creation.
    pub id: PointId,
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a point with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`PointError::NonFinite`] if either coordinate is NaN or
    /// infinite; engines reject such input up front rather than letting it
    /// poison derived geometry.
    pub fn try_new(x: f64, y: f64) -> Result<Self, PointError> {
        if !Vec2::new(x, y).is_finite() {
            return Err(PointError::NonFinite { x, y });
        }
        Ok(Self {
            id: PointId::fresh(),
            x,
            y,
        })
    }

    /// The point's coordinates as a bare [`Vec2`].
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Euclidean distance to another point.
    #[inline]
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        self.position().distance(other.position())
    }
}
