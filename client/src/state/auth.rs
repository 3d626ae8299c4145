//! Auth-session state for the current browser tab.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by route guards and user-aware components to coordinate login
//! redirects and identity-dependent rendering.
//!
//! DESIGN
//! ======
//! The session manager is the single writer. [`Auth`] keeps it in local
//! (non-`Send`) arena storage and mirrors its snapshot into an `RwSignal`
//! after every transition, so views subscribe to the signal and never hold
//! the manager across renders.

use std::future::Future;
use std::rc::Rc;

use campus::{ApiClient, ApiConfig, Session, SessionError, SessionManager, UserProfile};
use leptos::prelude::*;

use crate::net::transport::FetchTransport;
use crate::util::storage::LocalStore;
use crate::util::timer;

pub type PortalSession = SessionManager<FetchTransport, LocalStore>;
pub type PortalApi = ApiClient<FetchTransport, LocalStore>;

/// Copyable handle provided through context by the app root.
#[derive(Clone, Copy)]
pub struct Auth {
    session: RwSignal<Session>,
    manager: StoredValue<Rc<PortalSession>, LocalStorage>,
}

impl Auth {
    pub fn new(config: &ApiConfig) -> Self {
        let api = ApiClient::new(config, FetchTransport, LocalStore);
        let manager = SessionManager::new(api);
        Self { session: RwSignal::new(manager.session()), manager: StoredValue::new_local(Rc::new(manager)) }
    }

    /// Tracked session snapshot.
    pub fn session(self) -> Session {
        self.session.get()
    }

    pub fn session_untracked(self) -> Session {
        self.session.get_untracked()
    }

    fn manager(self) -> Rc<PortalSession> {
        self.manager.get_value()
    }

    fn sync(self) {
        let snapshot = self.manager().session();
        self.session.set(snapshot);
    }

    /// Run the API client against the current tokens.
    pub async fn with_api<R, F, Fut>(self, call: F) -> R
    where
        F: FnOnce(Rc<PortalSession>) -> Fut,
        Fut: Future<Output = R>,
    {
        call(self.manager()).await
    }

    /// Resolve the persisted session, bounded by the configured timeout.
    pub async fn rehydrate(self) {
        let manager = self.manager();
        let timeout = manager.api().config().rehydrate_timeout;
        manager.rehydrate_within(timer::deadline(timeout)).await;
        self.sync();
    }

    /// Exchange credentials and publish the new session.
    ///
    /// # Errors
    ///
    /// Propagates [`SessionError`] for inline display on the login form.
    pub async fn sign_in(self, email: &str, password: &str) -> Result<UserProfile, SessionError> {
        let result = self.manager().sign_in(email, password).await;
        self.sync();
        result
    }

    pub fn logout(self) {
        self.manager().logout();
        self.sync();
    }
}
