//! Domain Models
//!
//! Core domain entities. All entities use TSID (Crockford Base32)
//! string IDs.

pub mod event;
pub mod registration;
pub mod session;
pub mod user;

pub use event::*;
pub use registration::*;
pub use session::*;
pub use user::*;
