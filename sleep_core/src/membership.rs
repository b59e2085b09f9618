//! Fuzzy membership functions.
//!
//! Each input is mapped onto three linear ramps anchored at fixed breakpoints.
//! Every degree is clamped to [0, 1] on its own; nothing normalizes across
//! categories.

use crate::{ActivityMembership, DurationMembership, HeartRateMembership, Memberships, RawInputs};

/// Sleep duration breakpoints (hours)
pub const DURATION_SHORT_UPPER: f64 = 8.0;
pub const DURATION_MEDIUM_LOWER: f64 = 6.0;
pub const DURATION_LONG_LOWER: f64 = 7.0;
pub const DURATION_SHORT_SPAN: f64 = 2.0;
pub const DURATION_MEDIUM_SPAN: f64 = 2.0;
pub const DURATION_LONG_SPAN: f64 = 3.0;

/// Average heart rate breakpoints (bpm)
pub const HEART_RATE_NORMAL: f64 = 60.0;
pub const HEART_RATE_HIGH: f64 = 80.0;
pub const HEART_RATE_SPAN: f64 = 20.0;

/// Activity level breakpoints (unitless)
pub const ACTIVITY_LOW_UPPER: f64 = 5.0;
pub const ACTIVITY_MODERATE_LOWER: f64 = 3.0;
pub const ACTIVITY_HIGH_LOWER: f64 = 6.0;
pub const ACTIVITY_SPAN: f64 = 2.0;

/// Clamp a degree into [0, 1].
///
/// Uses `f64::min`/`f64::max`, so a NaN argument yields 1.0 (the `min`
/// discards it) rather than propagating.
#[inline]
pub fn clamp01(x: f64) -> f64 {
    x.min(1.0).max(0.0)
}

/// Membership of a sleep duration in short/medium/long
pub fn duration_membership(duration: f64) -> DurationMembership {
    let membership = DurationMembership {
        short: clamp01((DURATION_SHORT_UPPER - duration) / DURATION_SHORT_SPAN),
        medium: clamp01((duration - DURATION_MEDIUM_LOWER) / DURATION_MEDIUM_SPAN),
        long: clamp01((duration - DURATION_LONG_LOWER) / DURATION_LONG_SPAN),
    };

    tracing::debug!(
        "Sleep duration {}h - short: {}, medium: {}, long: {}",
        duration,
        membership.short,
        membership.medium,
        membership.long
    );

    membership
}

/// Membership of the average heart rate in low/normal/high.
///
/// Minimum and maximum heart rate are part of the signature so callers can
/// pass the full triple, but only the average drives the degrees.
pub fn heart_rate_membership(_min: f64, avg: f64, _max: f64) -> HeartRateMembership {
    let membership = HeartRateMembership {
        low: clamp01((HEART_RATE_NORMAL - avg) / HEART_RATE_SPAN),
        normal: clamp01((avg - HEART_RATE_NORMAL) / HEART_RATE_SPAN),
        high: clamp01((avg - HEART_RATE_HIGH) / HEART_RATE_SPAN),
    };

    tracing::debug!(
        "Heart rate avg {} - low: {}, normal: {}, high: {}",
        avg,
        membership.low,
        membership.normal,
        membership.high
    );

    membership
}

/// Membership of a daytime activity level in low/moderate/high
pub fn activity_membership(level: f64) -> ActivityMembership {
    let membership = ActivityMembership {
        low: clamp01((ACTIVITY_LOW_UPPER - level) / ACTIVITY_SPAN),
        moderate: clamp01((level - ACTIVITY_MODERATE_LOWER) / ACTIVITY_SPAN),
        high: clamp01((level - ACTIVITY_HIGH_LOWER) / ACTIVITY_SPAN),
    };

    tracing::debug!(
        "Activity level {} - low: {}, moderate: {}, high: {}",
        level,
        membership.low,
        membership.moderate,
        membership.high
    );

    membership
}

/// Compute all three membership sets for one set of inputs
pub fn memberships(inputs: &RawInputs) -> Memberships {
    Memberships {
        duration: duration_membership(inputs.sleep_duration_hours),
        heart_rate: heart_rate_membership(
            inputs.min_heart_rate,
            inputs.avg_heart_rate,
            inputs.max_heart_rate,
        ),
        activity: activity_membership(inputs.activity_level),
    }
}
