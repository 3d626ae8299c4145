//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render dashboard chrome and the route guard while reading the
//! shared `Auth` handle from Leptos context.

pub mod notice_board;
pub mod require_auth;
pub mod topbar;
