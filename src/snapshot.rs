//! Deterministic text snapshots of chains and fillet results.
//!
//! Numbers are quantized to `1e-6` and printed with six decimals so that
//! snapshots stay stable across platforms and `-0.0` never shows up.

use std::fmt::Write as _;

use crate::geom::{Chain, FilletChainDiagnostics, FilletReport, Point2};

pub const SNAPSHOT_QUANTIZE: f64 = 1e-6;
pub const SNAPSHOT_DECIMALS: usize = 6;

/// Build a snapshot: header, caller sections, then the chain itself.
pub fn chain_snapshot(op: &str, chain: &Chain, sections: impl FnOnce(&mut String)) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# fillet-engine snapshot v1");
    let _ = writeln!(out, "op {op}");
    let _ = writeln!(out, "quantize {SNAPSHOT_QUANTIZE:.1e}");
    sections(&mut out);
    write_chain(&mut out, chain);
    normalize_snapshot_text(&out)
}

#[must_use]
pub fn quantize_f64(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let q = (value / SNAPSHOT_QUANTIZE).round() * SNAPSHOT_QUANTIZE;
    if q == 0.0 { 0.0 } else { q }
}

pub fn write_f64(out: &mut String, value: f64) {
    let value = quantize_f64(value);
    let _ = write!(out, "{value:.SNAPSHOT_DECIMALS$}");
}

fn write_point(out: &mut String, p: Point2) {
    write_f64(out, p.x);
    out.push(' ');
    write_f64(out, p.y);
}

pub fn write_chain(out: &mut String, chain: &Chain) {
    let _ = writeln!(out, "chain.closed {}", chain.is_closed());
    let _ = writeln!(out, "chain.vertex_count {}", chain.len());
    for (idx, vertex) in chain.vertices().iter().enumerate() {
        let _ = write!(out, "chain.v.{idx} ");
        write_point(out, vertex.point);
        out.push(' ');
        write_f64(out, vertex.bulge);
        out.push('\n');
    }
}

pub fn write_fillet_report(out: &mut String, report: &FilletReport) {
    let _ = writeln!(out, "fillet.kind {:?}", report.kind);
    let _ = writeln!(out, "fillet.vertex_index {}", report.vertex_index);
    let _ = writeln!(out, "fillet.inserted_index {}", report.inserted_index);
    let _ = write!(out, "fillet.prev_tangent ");
    write_point(out, report.prev_tangent);
    out.push('\n');
    let _ = write!(out, "fillet.next_tangent ");
    write_point(out, report.next_tangent);
    out.push('\n');
    let _ = write!(out, "fillet.bulge ");
    write_f64(out, report.bulge);
    out.push('\n');
}

pub fn write_fillet_chain_diagnostics(out: &mut String, diag: &FilletChainDiagnostics) {
    let _ = writeln!(out, "fillet_diag.input_vertex_count {}", diag.input_vertex_count);
    let _ = writeln!(out, "fillet_diag.output_vertex_count {}", diag.output_vertex_count);
    let _ = writeln!(out, "fillet_diag.corner_count {}", diag.corner_count);
    let _ = writeln!(
        out,
        "fillet_diag.filleted_corner_count {}",
        diag.filleted_corner_count
    );
    let _ = writeln!(
        out,
        "fillet_diag.skipped_corner_count {}",
        diag.skipped_corner_count
    );
    let _ = writeln!(out, "fillet_diag.warning_count {}", diag.warnings.len());
    for (idx, warning) in diag.warnings.iter().enumerate() {
        let _ = writeln!(out, "fillet_diag.warning.{idx} {warning}");
    }
}

/// Unix line endings and exactly one trailing newline.
#[must_use]
pub fn normalize_snapshot_text(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n");
    let trimmed = normalized.trim_end_matches('\n');
    format!("{trimmed}\n")
}
