#![forbid(unsafe_code)]

//! Core scoring logic for the NocOps sleep tracker.
//!
//! This crate provides:
//! - Input and membership types
//! - Fuzzy membership functions
//! - The weighted rule table and evaluator
//! - Defuzzification and the top-level scoring entry point
//! - Configuration, batch scoring and score history

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod membership;
pub mod rules;
pub mod engine;
pub mod batch;
pub mod history;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use membership::{activity_membership, duration_membership, heart_rate_membership};
pub use rules::{evaluate, goal_shortfall_penalty, Rule, RULES};
pub use engine::{calculate_sleep_quality, defuzzify, score, score_breakdown};
pub use history::{append_record, load_records, ScoredNight};
