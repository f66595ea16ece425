use serde::{Deserialize, Serialize};

/// A single touch position in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An immutable trajectory sample: position plus milliseconds since
/// gesture start. Produced by the capture layer, never mutated here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureSample {
    pub x: f32,
    pub y: f32,
    pub t: i64,
}

impl GestureSample {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Everything the classifier needs, derived by the caller from the raw
/// trajectory and the key under the initial touch point.
#[derive(Debug, Clone, Copy)]
pub struct GestureData {
    pub has_left_starting_key: bool,
    pub total_distance: f32,
    pub time_elapsed_ms: i64,
    pub key_width: f32,
}

/// A completed pointer gesture as handed over by the capture layer on
/// pointer-up. `key_hints` carries the keys the capture layer saw under the
/// path; the core treats them as opaque context.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwipeInput {
    pub coordinates: Vec<Point>,
    pub timestamps: Vec<i64>,
    #[serde(default)]
    pub key_hints: Vec<char>,
}

impl SwipeInput {
    pub fn new(coordinates: Vec<Point>, timestamps: Vec<i64>) -> Self {
        Self {
            coordinates,
            timestamps,
            key_hints: Vec::new(),
        }
    }

    pub fn samples(&self) -> impl Iterator<Item = GestureSample> + '_ {
        self.coordinates
            .iter()
            .zip(self.timestamps.iter())
            .map(|(p, &t)| GestureSample { x: p.x, y: p.y, t })
    }

    /// Polyline length of the trajectory in pixels.
    pub fn path_length(&self) -> f32 {
        self.coordinates
            .windows(2)
            .map(|w| w[0].distance(&w[1]))
            .sum()
    }

    /// Elapsed time from first to last sample.
    pub fn duration_ms(&self) -> i64 {
        match (self.timestamps.first(), self.timestamps.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0,
        }
    }
}

/// Fixed-length, evenly spaced trajectory ready for the model's fixed
/// input shape. Only the resampler constructs this, so holding one is
/// proof the length invariant was met.
#[derive(Debug, Clone, PartialEq)]
pub struct ResampledTrajectory {
    points: Vec<Point>,
}

impl ResampledTrajectory {
    pub(crate) fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Final pipeline output, consumed by the suggestion bar.
/// `words` and `scores` are parallel, sorted best-first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictionResult {
    pub words: Vec<String>,
    pub scores: Vec<f32>,
}

impl PredictionResult {
    pub fn new(words: Vec<String>, scores: Vec<f32>) -> Self {
        debug_assert_eq!(words.len(), scores.len());
        Self { words, scores }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn top_prediction(&self) -> Option<&str> {
        self.words.first().map(String::as_str)
    }

    pub fn top_score(&self) -> f32 {
        self.scores.first().copied().unwrap_or(0.0)
    }
}
