//! Resume scoring, parsing and regeneration

pub mod patterns;
pub mod document;
pub mod ats_scorer;
pub mod resume_parser;
pub mod layout;
pub mod resume_generator;
