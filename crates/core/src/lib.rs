//! Pure domain logic for the rota field-duty platform.
//!
//! This crate has zero internal dependencies so the API server, the
//! notification worker, and any future CLI tooling can all share the same
//! rules: the error taxonomy, geodesic distance, weekly-schedule predicates,
//! the execution state machine, and message template rendering.

pub mod error;
pub mod geo;
pub mod lifecycle;
pub mod schedule;
pub mod template;
pub mod types;
