//! EventHub Platform
//!
//! Event listing and registration platform providing:
//! - Organiser-created events gated behind admin approval
//! - Guest and member registration with capacity enforcement
//! - Cancellation that frees capacity without losing history
//! - Admin moderation (event approval, organiser role grants)
//! - Analytics and registration export

pub mod api;
pub mod domain;
pub mod error;
pub mod repository;
pub mod service;
pub mod tsid;

pub use domain::*;
pub use error::AppError;
pub use tsid::TsidGenerator;
