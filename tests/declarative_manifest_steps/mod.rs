//! Step definitions for declarative manifest scenarios.

pub mod given;
pub mod then;
pub mod when;
