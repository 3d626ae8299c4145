//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and delegates shared chrome to
//! `components`. Role checks live in the route table, not in pages.

pub mod dashboard;
pub mod login;
pub mod members;
pub mod profile;
pub mod syllabus;
