//! Networking modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! `transport` adapts browser `fetch` to the session core's `Transport` seam;
//! all endpoint knowledge lives in `campus::api`.

pub mod transport;
