mod arc;
mod chain;
mod core;
mod fillet;
mod segment;

pub use arc::{Arc2, ArcError, DEFAULT_ARC_SUBDIVISIONS, arc_bulge, tessellate_arc};
pub use chain::{Chain, ChainError, Vertex};
pub use core::{Point2, Tolerance, Vec2, normalize_angle, orientation};
pub use fillet::{
    FilletChainDiagnostics, FilletError, FilletKind, FilletOutcome, FilletReport, Infeasibility,
    apply_fillet, apply_fillet_with_tolerance, fillet_chain,
};
pub use segment::{Segment, SegmentKind};

#[cfg(test)]
mod tests;
