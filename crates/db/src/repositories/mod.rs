//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods that
//! accept `&PgPool` as the first argument. Methods that must participate in
//! a caller-owned transaction take `&mut PgConnection` and carry a `_tx`
//! suffix.

pub mod action_log_repo;
pub mod assignment_repo;
pub mod duty_type_repo;
pub mod execution_repo;
pub mod message_template_repo;
pub mod notification_job_repo;
pub mod resident_repo;
pub mod site_repo;
pub mod staff_repo;

pub use action_log_repo::ActionLogRepo;
pub use assignment_repo::{AssignmentRepo, ScheduleWriteError};
pub use duty_type_repo::DutyTypeRepo;
pub use execution_repo::ExecutionRepo;
pub use message_template_repo::MessageTemplateRepo;
pub use notification_job_repo::NotificationJobRepo;
pub use resident_repo::ResidentRepo;
pub use site_repo::SiteRepo;
pub use staff_repo::StaffRepo;
