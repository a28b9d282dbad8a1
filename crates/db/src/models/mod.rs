//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod action_log;
pub mod assignment;
pub mod duty_type;
pub mod execution;
pub mod message_template;
pub mod notification_job;
pub mod resident;
pub mod site;
pub mod staff;
