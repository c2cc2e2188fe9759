//! loancalc - Terminal Loan Calculator Library
//!
//! Collects loan parameters in a terminal form, validates them, and asks a
//! remote service for the monthly payment and amortization breakdown.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;
pub mod config;

pub use domain::*;
pub use application::*;
