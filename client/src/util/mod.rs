//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Browser APIs behind plain Rust types; native builds get
//! inert stand-ins so state and page helpers stay testable off the browser.

pub mod dialog;
pub mod storage;
pub mod timer;
