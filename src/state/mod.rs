//! State module for tracking audit lifecycle
//!
//! An audit record moves through `queued → running → {complete | error}`.
//! The persisted status doubles as the work-queue marker: workers only pick
//! up records that are startable.

mod audit_status;

pub use audit_status::AuditStatus;
