//! Shared utilities

pub mod context;
pub mod diagnostic;
pub mod fs;
pub mod hash;
pub mod output;
pub mod process;

pub use context::GlobalContext;
pub use diagnostic::Diagnostic;
pub use output::{OutputSink, Outputs};
