//! Client state modules provided through Leptos context or owned by pages.
//!
//! DESIGN
//! ======
//! `auth` wraps the session manager; the rest are plain structs held in
//! page-local signals with pure helpers that are unit-tested natively.

pub mod auth;
pub mod members;
pub mod notices;
pub mod syllabus;
