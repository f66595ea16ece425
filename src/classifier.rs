use crate::input::GestureData;
use strum_macros::Display;

/// Terminal classification of a completed pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum GestureType {
    /// Quick touch on a single key.
    Tap,
    /// Continuous motion across the keyboard (swipe typing).
    Swipe,
}

/// Classify a gesture as TAP or SWIPE.
///
/// The distance threshold is dynamic (`key_width / 2`) so classification
/// adapts to keyboard size and screen density instead of relying on fixed
/// pixel counts. Leaving the starting key is a hard precondition for SWIPE:
/// a gesture that never left its key is a tap no matter how long it took or
/// how far the finger wobbled.
///
/// Every valid input has a defined classification; there is no "unknown".
pub fn classify(gesture: &GestureData, tap_duration_threshold_ms: i64) -> GestureType {
    let min_swipe_distance = gesture.key_width / 2.0;

    if gesture.has_left_starting_key
        && (gesture.total_distance >= min_swipe_distance
            || gesture.time_elapsed_ms >= tap_duration_threshold_ms)
    {
        return GestureType::Swipe;
    }

    GestureType::Tap
}
