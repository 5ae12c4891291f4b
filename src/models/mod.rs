//! Data models for the feedback console.
//!
//! Upstream payloads keep their wire names; Rust-side names describe what the fields hold.

mod auth;
mod faq;
mod feedback;
mod outcome;

pub use auth::*;
pub use faq::*;
pub use feedback::*;
pub use outcome::*;
