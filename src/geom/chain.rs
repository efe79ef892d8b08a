//! Bulge-encoded polyline chains.
//!
//! A chain stores vertices only; the segment leaving vertex `i` is a straight
//! line when its bulge is zero and a circular arc otherwise. Because every
//! segment is spanned by two stored vertices, consecutive segments always
//! share their endpoint.

use serde::{Deserialize, Serialize};

use super::arc::{Arc2, tessellate_arc};
use super::core::{Point2, Tolerance};
use super::segment::{Segment, SegmentKind};

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ChainError {
    #[error("chain needs at least one segment")]
    Empty,

    #[error("segment {index} ends {gap} away from the start of the next segment")]
    Discontinuous { index: usize, gap: f64 },

    #[error("segment {index} is an arc with a degenerate radius")]
    DegenerateArc { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub point: Point2,
    /// `tan(θ/4)` of the segment starting at this vertex.
    pub bulge: f64,
    #[serde(default)]
    pub start_width: f64,
    #[serde(default)]
    pub end_width: f64,
}

impl Vertex {
    #[must_use]
    pub const fn new(point: Point2, bulge: f64) -> Self {
        Self {
            point,
            bulge,
            start_width: 0.0,
            end_width: 0.0,
        }
    }

    #[must_use]
    pub const fn with_widths(mut self, start_width: f64, end_width: f64) -> Self {
        self.start_width = start_width;
        self.end_width = end_width;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chain {
    vertices: Vec<Vertex>,
    closed: bool,
}

impl Chain {
    #[must_use]
    pub fn new(vertices: Vec<Vertex>, closed: bool) -> Self {
        Self { vertices, closed }
    }

    /// Chain of straight segments through `points`.
    #[must_use]
    pub fn from_points(points: &[Point2], closed: bool) -> Self {
        let vertices = points.iter().map(|&p| Vertex::new(p, 0.0)).collect();
        Self { vertices, closed }
    }

    /// Build a chain from segment geometry, checking that consecutive segments touch.
    pub fn from_segments(
        segments: &[Segment],
        closed: bool,
        tol: Tolerance,
    ) -> Result<Self, ChainError> {
        let (Some(first), Some(last)) = (segments.first(), segments.last()) else {
            return Err(ChainError::Empty);
        };

        for (index, segment) in segments.iter().enumerate() {
            if let Segment::Arc(arc) = segment {
                if !arc.radius.is_finite() || arc.radius <= tol.eps {
                    return Err(ChainError::DegenerateArc { index });
                }
            }
        }

        for (index, pair) in segments.windows(2).enumerate() {
            let gap = pair[0].end_point().distance_to(pair[1].start_point());
            if gap > tol.eps {
                return Err(ChainError::Discontinuous { index, gap });
            }
        }
        if closed {
            let gap = last.end_point().distance_to(first.start_point());
            if gap > tol.eps {
                return Err(ChainError::Discontinuous {
                    index: segments.len() - 1,
                    gap,
                });
            }
        }

        let mut vertices = Vec::with_capacity(segments.len() + 1);
        vertices.extend(
            segments
                .iter()
                .map(|segment| Vertex::new(segment.start_point(), segment.bulge())),
        );
        if !closed {
            vertices.push(Vertex::new(last.end_point(), 0.0));
        }

        Ok(Self { vertices, closed })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[must_use]
    pub fn vertex(&self, index: usize) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    #[must_use]
    pub fn points(&self) -> Vec<Point2> {
        self.vertices.iter().map(|v| v.point).collect()
    }

    /// `N` segments when closed, `N - 1` when open.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        if self.closed {
            self.vertices.len()
        } else {
            self.vertices.len().saturating_sub(1)
        }
    }

    /// Index of the vertex before `index`, wrapping on closed chains.
    #[must_use]
    pub fn prev_index(&self, index: usize) -> Option<usize> {
        let n = self.vertices.len();
        if index >= n {
            return None;
        }
        match index {
            0 if self.closed => Some(n - 1),
            0 => None,
            _ => Some(index - 1),
        }
    }

    /// Index of the vertex after `index`, wrapping on closed chains.
    #[must_use]
    pub fn next_index(&self, index: usize) -> Option<usize> {
        let n = self.vertices.len();
        if index >= n {
            return None;
        }
        if index + 1 < n {
            Some(index + 1)
        } else if self.closed {
            Some(0)
        } else {
            None
        }
    }

    #[must_use]
    pub fn segment_kind_at(&self, index: usize, tol: Tolerance) -> Option<SegmentKind> {
        if index >= self.segment_count() {
            return None;
        }
        let start = self.vertices[index];
        let end = self.vertices[self.next_index(index)?];
        if tol.approx_eq_point2(start.point, end.point) {
            Some(SegmentKind::Coincident)
        } else if tol.approx_zero_f64(start.bulge) {
            Some(SegmentKind::Line)
        } else {
            Some(SegmentKind::Arc)
        }
    }

    /// Geometry of the segment leaving vertex `index`.
    ///
    /// Returns `None` when out of range or when the segment is coincident.
    #[must_use]
    pub fn segment_at(&self, index: usize, tol: Tolerance) -> Option<Segment> {
        let start = self.vertices[..self.segment_count()].get(index)?;
        let end = self.vertices[self.next_index(index)?];
        match self.segment_kind_at(index, tol)? {
            SegmentKind::Line => Some(Segment::line(start.point, end.point)),
            SegmentKind::Arc => {
                Arc2::from_bulge(start.point, end.point, start.bulge, tol).map(Segment::Arc)
            }
            SegmentKind::Coincident => None,
        }
    }

    /// All non-coincident segments in chain order.
    #[must_use]
    pub fn segments(&self, tol: Tolerance) -> Vec<Segment> {
        (0..self.segment_count())
            .filter_map(|index| self.segment_at(index, tol))
            .collect()
    }

    /// Insert `vertex` before position `index`; later vertices shift by one.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert_vertex(&mut self, index: usize, vertex: Vertex) {
        self.vertices.insert(index, vertex);
    }

    /// Move an existing vertex, keeping its bulge and widths.
    ///
    /// Returns `false` when `index` is out of range.
    pub fn set_point(&mut self, index: usize, point: Point2) -> bool {
        match self.vertices.get_mut(index) {
            Some(vertex) => {
                vertex.point = point;
                true
            }
            None => false,
        }
    }

    /// Append an arc flattened into `segments` straight pieces.
    ///
    /// The first sample is dropped when it coincides with the current last vertex.
    pub fn push_arc_points(&mut self, arc: &Arc2, segments: usize, tol: Tolerance) {
        let points = tessellate_arc(arc, segments);
        let skip_first = self
            .vertices
            .last()
            .zip(points.first())
            .is_some_and(|(last, first)| tol.approx_eq_point2(last.point, *first));
        let start = usize::from(skip_first);
        self.vertices
            .extend(points[start..].iter().map(|&p| Vertex::new(p, 0.0)));
    }
}
