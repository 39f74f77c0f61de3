//! Declarative helpers for model definitions
//!
//! These macros cut the boilerplate of enumerating a model's members by hand.

pub mod member_macros;
