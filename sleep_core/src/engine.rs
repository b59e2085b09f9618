//! Scoring engine: membership → rules → defuzzification.
//!
//! [`calculate_sleep_quality`] is the entry point callers should use. It holds
//! no state, so it can be called from any number of threads at once.

use crate::membership::memberships;
use crate::rules::{contributions, evaluate, goal_shortfall_penalty};
use crate::{
    activity_membership, duration_membership, heart_rate_membership, QualityScore, RawInputs,
    ScoreBreakdown,
};

/// Lower bound of the crisp score
pub const SCORE_MIN: f64 = 0.0;
/// Upper bound of the crisp score
pub const SCORE_MAX: f64 = 100.0;

/// Clamp an aggregate rule score into [0, 100].
///
/// NaN is passed through unchanged.
pub fn defuzzify(raw: f64) -> QualityScore {
    let score = raw.clamp(SCORE_MIN, SCORE_MAX);
    tracing::debug!("Defuzzified score: {}", score);
    score
}

/// Compute the sleep quality score for one night
///
/// `min_heart_rate` and `max_heart_rate` are accepted for callers that carry
/// the full heart-rate triple; they do not affect the result.
pub fn calculate_sleep_quality(
    duration: f64,
    min_heart_rate: f64,
    avg_heart_rate: f64,
    max_heart_rate: f64,
    activity_level: f64,
    sleep_goal: f64,
) -> QualityScore {
    let sleep_duration = duration_membership(duration);
    let heart_rate = heart_rate_membership(min_heart_rate, avg_heart_rate, max_heart_rate);
    let activity = activity_membership(activity_level);

    let raw = evaluate(sleep_duration, heart_rate, activity, sleep_goal);
    defuzzify(raw)
}

/// Score a [`RawInputs`] value
pub fn score(inputs: &RawInputs) -> QualityScore {
    calculate_sleep_quality(
        inputs.sleep_duration_hours,
        inputs.min_heart_rate,
        inputs.avg_heart_rate,
        inputs.max_heart_rate,
        inputs.activity_level,
        inputs.sleep_goal_hours,
    )
}

/// Score a night and keep every intermediate value
pub fn score_breakdown(inputs: &RawInputs) -> ScoreBreakdown {
    let memberships = memberships(inputs);
    let contributions = contributions(&memberships, inputs.sleep_goal_hours);

    let rule_sum: f64 = contributions.iter().map(|c| c.value).sum();
    let goal_penalty = goal_shortfall_penalty(&memberships.duration, inputs.sleep_goal_hours);
    let raw_score = rule_sum - goal_penalty;
    let score = defuzzify(raw_score);

    ScoreBreakdown {
        inputs: *inputs,
        memberships,
        contributions,
        rule_sum,
        goal_penalty,
        raw_score,
        score,
    }
}
