use serde::{Deserialize, Serialize};

use super::arc::Arc2;
use super::core::Point2;

/// Classification of the piece of a chain between two consecutive vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentKind {
    Line,
    Arc,
    /// Both vertices sit on the same point; the segment has no direction.
    Coincident,
}

/// A single chain segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Segment {
    Line { start: Point2, end: Point2 },
    Arc(Arc2),
}

impl Segment {
    #[must_use]
    pub const fn line(start: Point2, end: Point2) -> Self {
        Self::Line { start, end }
    }

    #[must_use]
    pub fn start_point(&self) -> Point2 {
        match self {
            Self::Line { start, .. } => *start,
            Self::Arc(arc) => arc.start_point(),
        }
    }

    #[must_use]
    pub fn end_point(&self) -> Point2 {
        match self {
            Self::Line { end, .. } => *end,
            Self::Arc(arc) => arc.end_point(),
        }
    }

    /// Bulge of the vertex that starts this segment.
    #[must_use]
    pub fn bulge(&self) -> f64 {
        match self {
            Self::Line { .. } => 0.0,
            Self::Arc(arc) => arc.bulge(),
        }
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        match self {
            Self::Line { start, end } => start.distance_to(*end),
            Self::Arc(arc) => arc.length(),
        }
    }

    #[must_use]
    pub const fn as_arc(&self) -> Option<&Arc2> {
        match self {
            Self::Arc(arc) => Some(arc),
            Self::Line { .. } => None,
        }
    }
}
