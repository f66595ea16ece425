use crate::error::{GlideError, GtResult};
use crate::input::{Point, ResampledTrajectory};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Consecutive points closer than this (pixels) count as duplicates in
/// [`ResamplingMode::Merge`]. Touch drivers routinely report micro-jitter
/// bursts while the finger rests, and near-zero-length segments destabilize
/// the arc-length interpolation below.
pub const MERGE_EPSILON: f32 = 1e-3;

/// Degenerate-run handling applied before arc-length resampling.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Display,
    EnumString,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ResamplingMode {
    /// Collapse near-duplicate consecutive points first. Production default.
    #[default]
    Merge,
    /// Feed the trajectory through untouched.
    Keep,
}

/// Resample a variable-rate trajectory into exactly `target_count` points
/// spaced evenly along the path's arc length, linearly interpolating between
/// the two nearest original points at each target fraction.
///
/// Never partially fails: the result is a full `target_count`-point
/// trajectory or an error. Fewer than 2 input points is the only input
/// error. A path whose total arc length is zero (every point coincident)
/// degenerates to `target_count` copies of the first point, which keeps the
/// length invariant without inventing positions.
///
/// Deterministic: identical input always yields identical output.
pub fn resample(
    points: &[Point],
    target_count: usize,
    mode: ResamplingMode,
) -> GtResult<ResampledTrajectory> {
    if points.len() < 2 {
        return Err(GlideError::InsufficientPoints(points.len()));
    }
    if target_count == 0 {
        return Err(GlideError::Config(
            "resample target_count must be at least 1".to_string(),
        ));
    }

    let merged_storage;
    let path: &[Point] = match mode {
        ResamplingMode::Merge => {
            merged_storage = merge_duplicates(points);
            &merged_storage
        }
        ResamplingMode::Keep => points,
    };

    // All points coincident: zero-length path, constant output.
    if path.len() < 2 {
        return Ok(ResampledTrajectory::new(vec![path[0]; target_count]));
    }

    // Cumulative arc length along the polyline.
    let mut cumulative = Vec::with_capacity(path.len());
    cumulative.push(0.0f32);
    let mut total = 0.0f32;
    for w in path.windows(2) {
        total += w[0].distance(&w[1]);
        cumulative.push(total);
    }

    if total <= 0.0 {
        return Ok(ResampledTrajectory::new(vec![path[0]; target_count]));
    }

    if target_count == 1 {
        return Ok(ResampledTrajectory::new(vec![path[0]]));
    }

    // Walk target fractions [0, 1/(n-1), ..., 1] and the source segments in
    // lockstep; both are monotone so `seg` only ever advances.
    let mut out = Vec::with_capacity(target_count);
    let mut seg = 0usize;
    for i in 0..target_count {
        let target_len = total * (i as f32) / ((target_count - 1) as f32);

        while seg + 1 < cumulative.len() - 1 && cumulative[seg + 1] < target_len {
            seg += 1;
        }

        let seg_start = cumulative[seg];
        let seg_len = cumulative[seg + 1] - seg_start;
        let t = if seg_len > 0.0 {
            ((target_len - seg_start) / seg_len).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let a = path[seg];
        let b = path[seg + 1];
        out.push(Point::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y)));
    }

    Ok(ResampledTrajectory::new(out))
}

/// Collapse runs of consecutive points closer than [`MERGE_EPSILON`].
/// The first point of each run survives.
fn merge_duplicates(points: &[Point]) -> Vec<Point> {
    let mut merged: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        match merged.last() {
            Some(prev) if prev.distance(p) < MERGE_EPSILON => {}
            _ => merged.push(*p),
        }
    }
    merged
}
