//! Intent routing.
//!
//! Maps a free-text intent to a downstream tool with an ordered keyword
//! table. Overlapping keywords are resolved purely by rule order: an
//! intent mentioning both "encrypt" and "optimize" goes to the quantum
//! rule because it is listed first.

mod rules;
pub mod tensor;

pub use rules::{BackendRouter, RoutingDecision, RoutingRule, Tool};
