//! Application layer managing state and business workflows.
//!
//! This module coordinates between the domain layer and presentation layer,
//! managing the form controller, the shared payment value, and the
//! terminal UI state.

pub mod form;
pub mod shared;
pub mod state;

pub use form::*;
pub use shared::*;
pub use state::*;
