//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They handle database transactions, validation, and multi-row updates.

pub mod report_service;
pub mod transfer_service;
