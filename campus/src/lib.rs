//! # campus
//!
//! Host-independent session core for the campus portal.
//!
//! This crate owns the token store, the REST API client, the session manager
//! and the route guard, plus the notice/syllabus/member records the
//! dashboards filter. Browser and native hosts plug in their own storage
//! backend ([`store::KeyValueStore`]) and HTTP transport ([`api::Transport`]).
//!
//! SYSTEM CONTEXT
//! ==============
//! `client` renders the guard and pages on top of this crate in the browser;
//! `cli` drives the same session from a terminal with a file-backed store.

pub mod api;
pub mod config;
pub mod guard;
pub mod records;
pub mod session;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use api::{ApiClient, ApiError, HttpRequest, HttpResponse, Method, Transport, TransportError};
pub use config::ApiConfig;
pub use guard::{Access, LANDING_PATH, LOGIN_PATH, RouteGuard};
pub use session::{SessionError, SessionManager};
pub use store::{KeyValueStore, MemoryStore, TokenStore};
pub use types::{Role, RoleSet, Session, TokenPair, UserProfile};
