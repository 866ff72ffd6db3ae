//! Generation implementations

mod unconfigured;

pub use unconfigured::{default_model, UnconfiguredGenerator};
