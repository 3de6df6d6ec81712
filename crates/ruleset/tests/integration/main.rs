//! Integration tests for nebula-ruleset
//!
//! These tests drive the public API end to end: rule sets in, reports out.

mod custom_rules;
mod end_to_end;
#[cfg(feature = "request")]
mod request;
