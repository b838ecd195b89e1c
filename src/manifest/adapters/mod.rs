//! Adapter implementations for declarative manifest storage.

pub mod memory;
pub mod postgres;
