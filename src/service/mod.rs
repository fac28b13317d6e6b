//! Service Layer
//!
//! Business logic services: authentication and sessions, event
//! management, the registration workflow, and admin moderation.

pub mod admin;
pub mod auth;
pub mod events;
pub mod images;
pub mod password;
pub mod registration;

pub use admin::{AdminDashboard, AdminService, Analytics};
pub use auth::AuthService;
pub use events::{EventDetail, EventService, OrganiserDashboard};
pub use images::{FsImageStore, ImageStore, NoopImageStore};
pub use password::PasswordService;
pub use registration::{
    GuestDetails, RegistrationOutcome, RegistrationReceipt, RegistrationService,
};
