//! Web search implementations

mod unconfigured;

pub use unconfigured::UnconfiguredWebSearch;
