//! Resume checker library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod processing;
pub mod workflow;
pub mod output;

pub use error::{Result, ResumeCheckerError};
pub use config::Config;
pub use workflow::ResumeChecker;
