//! HTTP handlers, one module per resource.

pub mod announcements;
pub mod assignments;
pub mod dashboard;
pub mod duty_types;
pub mod message_templates;
pub mod schedule;
pub mod sites;
pub mod staff;
