//! Listing relevance scoring and recommendation.
//!
//! The learned model is optional. Every path that would use it has a rule-based
//! answer, and the only observable difference is the confidence value.

mod feature;
mod model;
mod recommender;
mod scoring;

pub use feature::*;
pub use model::*;
pub use recommender::*;
pub use scoring::*;
