//! Unit tests for the migration module.

mod support;
