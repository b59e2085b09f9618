//! Weighted fuzzy rule table and evaluator.
//!
//! Each rule combines membership degrees with a fuzzy AND (minimum) and
//! scales the result by a fixed weight. The aggregate is the sum of all
//! fourteen contributions minus a linear penalty for falling short of the
//! sleep goal. The aggregate is unbounded; see [`crate::engine::defuzzify`].
//!
//! Rules 1/8 and 2/12 share antecedents but carry separate weights. Both are
//! kept since folding them would change every score.

use crate::{
    ActivityMembership, DurationMembership, HeartRateMembership, Memberships, RuleContribution,
};

/// Multiplier applied to the goal shortfall
pub const GOAL_PENALTY_RATE: f64 = 1.25;

/// Goal-proximity rule fires when `goal - long <= GOAL_PROXIMITY_MARGIN`
pub const GOAL_PROXIMITY_MARGIN: f64 = 1.0;

/// A single weighted rule
#[derive(Clone, Copy, Debug)]
pub struct Rule {
    pub id: u8,
    pub description: &'static str,
    pub weight: f64,
    /// Firing strength in [0, 1] before weighting
    degree: fn(&Memberships, f64) -> f64,
}

impl Rule {
    /// Firing strength of this rule for the given memberships and goal
    pub fn degree(&self, memberships: &Memberships, sleep_goal_hours: f64) -> f64 {
        (self.degree)(memberships, sleep_goal_hours)
    }

    /// Weighted contribution of this rule to the aggregate score
    pub fn apply(&self, memberships: &Memberships, sleep_goal_hours: f64) -> f64 {
        self.degree(memberships, sleep_goal_hours) * self.weight
    }
}

/// The rule table, in evaluation order
pub static RULES: [Rule; 14] = [
    Rule {
        id: 1,
        description: "short sleep and high heart rate",
        weight: 30.0,
        degree: |m, _| m.duration.short.min(m.heart_rate.high),
    },
    Rule {
        id: 2,
        description: "long sleep and moderate activity",
        weight: 120.0,
        degree: |m, _| m.duration.long.min(m.activity.moderate),
    },
    Rule {
        id: 3,
        description: "sleep goal within reach and normal heart rate",
        weight: 50.0,
        degree: |m, goal| {
            // Compared against the long-sleep degree, not the hours slept
            if goal - m.duration.long <= GOAL_PROXIMITY_MARGIN {
                m.heart_rate.normal.min(1.0)
            } else {
                0.0
            }
        },
    },
    Rule {
        id: 4,
        description: "medium sleep and normal heart rate",
        weight: 50.0,
        degree: |m, _| m.duration.medium.min(m.heart_rate.normal),
    },
    Rule {
        id: 5,
        description: "short sleep and high activity",
        weight: 30.0,
        degree: |m, _| m.duration.short.min(m.activity.high),
    },
    Rule {
        id: 6,
        description: "long sleep and low heart rate",
        weight: 30.0,
        degree: |m, _| m.duration.long.min(m.heart_rate.low),
    },
    Rule {
        id: 7,
        description: "very short sleep",
        weight: 100.0,
        degree: |m, _| m.duration.short.min(1.0),
    },
    Rule {
        id: 8,
        description: "high activity with short sleep",
        weight: 40.0,
        degree: |m, _| m.duration.short.min(m.activity.high),
    },
    Rule {
        id: 9,
        description: "long sleep with high heart rate",
        weight: 30.0,
        degree: |m, _| m.duration.long.min(m.heart_rate.high),
    },
    Rule {
        id: 10,
        description: "low activity with short sleep",
        weight: 60.0,
        degree: |m, _| m.duration.short.min(m.activity.low),
    },
    Rule {
        id: 11,
        description: "moderate activity with short sleep",
        weight: 30.0,
        degree: |m, _| m.duration.short.min(m.activity.moderate),
    },
    Rule {
        id: 12,
        description: "moderate activity with long sleep",
        weight: 50.0,
        degree: |m, _| m.duration.long.min(m.activity.moderate),
    },
    Rule {
        id: 13,
        description: "moderate activity with normal heart rate",
        weight: 30.0,
        degree: |m, _| m.activity.moderate.min(m.heart_rate.normal),
    },
    Rule {
        id: 14,
        description: "moderate activity with high heart rate",
        weight: 20.0,
        degree: |m, _| m.activity.moderate.min(m.heart_rate.high),
    },
];

/// Penalty for sleeping short of the goal.
///
/// Like rule 3, this uses the long-sleep degree as the "achieved" value.
pub fn goal_shortfall_penalty(duration: &DurationMembership, sleep_goal_hours: f64) -> f64 {
    (sleep_goal_hours - duration.long).max(0.0) * GOAL_PENALTY_RATE
}

/// Per-rule contributions in table order
pub fn contributions(memberships: &Memberships, sleep_goal_hours: f64) -> Vec<RuleContribution> {
    RULES
        .iter()
        .map(|rule| {
            let value = rule.apply(memberships, sleep_goal_hours);
            tracing::trace!("Rule {} ({}): {}", rule.id, rule.description, value);
            RuleContribution {
                id: rule.id,
                description: rule.description.to_string(),
                weight: rule.weight,
                value,
            }
        })
        .collect()
}

/// Evaluate all rules and subtract the goal penalty.
///
/// The result is unbounded and may be negative or exceed 100.
pub fn evaluate(
    duration: DurationMembership,
    heart_rate: HeartRateMembership,
    activity: ActivityMembership,
    sleep_goal_hours: f64,
) -> f64 {
    let memberships = Memberships {
        duration,
        heart_rate,
        activity,
    };

    let rule_sum: f64 = RULES
        .iter()
        .map(|rule| rule.apply(&memberships, sleep_goal_hours))
        .sum();
    let penalty = goal_shortfall_penalty(&duration, sleep_goal_hours);
    let raw = rule_sum - penalty;

    tracing::debug!(
        "Rule sum {}, goal penalty {}, raw sleep quality {}",
        rule_sum,
        penalty,
        raw
    );

    raw
}
