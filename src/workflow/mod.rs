//! Single-session resume checking workflow

pub mod profile;
pub mod checker;

pub use checker::{CheckerState, ResumeChecker};
pub use profile::ExternalProfile;
