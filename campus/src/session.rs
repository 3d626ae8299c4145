//! Session manager: the single writer of [`Session`] state.
//!
//! ARCHITECTURE
//! ============
//! A manager is constructed explicitly per host (one per browser tab, one per
//! CLI invocation, one per test) and passed to whoever needs it; there is no
//! ambient global. It starts `Uninitialized` and resolves exactly once, via
//! rehydration, to `Authenticated` or `Anonymous`; afterwards only `login`,
//! `logout` and `sign_in` move it.
//!
//! Rehydration is a linear step machine (see [`Step`]) so every exit path is
//! a named transition rather than a nested error handler.
//!
//! CONCURRENCY
//! ===========
//! Single-threaded: state lives in `RefCell`/`Cell` and no borrow is held
//! across an `.await`. `sign_in` is serialized with a busy flag, and every
//! `login`/`logout` bumps an epoch so a network result that lands after a
//! newer transition is discarded instead of overwriting it.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::pin;

use futures::future::{self, Either};

use crate::api::{ApiClient, ApiError, Transport};
use crate::store::{KeyValueStore, TokenStore};
use crate::types::{Session, UserProfile};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("a sign-in is already in progress")]
    Busy,
    #[error("sign-in was superseded by a newer session change")]
    Superseded,
    #[error("login response did not include tokens")]
    MissingTokens,
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Clone, Debug, PartialEq)]
enum Phase {
    Uninitialized,
    Authenticated(UserProfile),
    Anonymous,
}

/// Why rehydration gave up on the persisted session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ClearReason {
    NoCachedSession,
    ProfileRejected,
    RefreshFailed,
    TimedOut,
}

impl ClearReason {
    const fn as_str(self) -> &'static str {
        match self {
            ClearReason::NoCachedSession => "no cached session",
            ClearReason::ProfileRejected => "profile rejected after refresh",
            ClearReason::RefreshFailed => "token refresh failed",
            ClearReason::TimedOut => "rehydration timed out",
        }
    }
}

/// Rehydration state machine. `Done` is the only terminal step.
#[derive(Debug)]
enum Step {
    ReadCache,
    FetchProfile { after_refresh: bool },
    Refresh,
    Done(Outcome),
}

#[derive(Debug)]
enum Outcome {
    Adopt(UserProfile),
    Clear(ClearReason),
    /// A `login`/`logout` landed while a request was in flight; storage now
    /// belongs to that transition and must not be touched.
    Superseded,
}

/// Resets the in-flight flag when a `sign_in` future completes or is dropped.
struct InFlight<'a>(&'a Cell<bool>);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

pub struct SessionManager<T, S> {
    api: ApiClient<T, S>,
    phase: RefCell<Phase>,
    epoch: Cell<u64>,
    rehydration_started: Cell<bool>,
    sign_in_in_flight: Cell<bool>,
}

impl<T: Transport, S: KeyValueStore> SessionManager<T, S> {
    pub fn new(api: ApiClient<T, S>) -> Self {
        Self {
            api,
            phase: RefCell::new(Phase::Uninitialized),
            epoch: Cell::new(0),
            rehydration_started: Cell::new(false),
            sign_in_in_flight: Cell::new(false),
        }
    }

    /// API client for pages and commands. Its token store is read-only by
    /// convention outside this manager.
    pub fn api(&self) -> &ApiClient<T, S> {
        &self.api
    }

    fn tokens(&self) -> &TokenStore<S> {
        self.api.tokens()
    }

    /// Current snapshot.
    pub fn session(&self) -> Session {
        match &*self.phase.borrow() {
            Phase::Uninitialized => Session::uninitialized(),
            Phase::Authenticated(user) => Session::authenticated(user.clone()),
            Phase::Anonymous => Session::anonymous(),
        }
    }

    pub fn is_sign_in_pending(&self) -> bool {
        self.sign_in_in_flight.get()
    }

    fn transition(&self, phase: Phase) {
        self.epoch.set(self.epoch.get().wrapping_add(1));
        *self.phase.borrow_mut() = phase;
    }

    // =========================================================================
    // Rehydration
    // =========================================================================

    /// Resolve the startup session from persisted tokens. Runs at most once;
    /// later calls return the current snapshot without touching the network.
    pub async fn rehydrate(&self) -> Session {
        self.rehydrate_within(future::pending::<()>()).await
    }

    /// [`Self::rehydrate`] bounded by `deadline`: if the deadline completes
    /// first, rehydration counts as failed and resolves to anonymous.
    pub async fn rehydrate_within<D: Future<Output = ()>>(&self, deadline: D) -> Session {
        if self.rehydration_started.replace(true) {
            return self.session();
        }
        let epoch = self.epoch.get();

        let outcome = match future::select(pin!(self.run_rehydration(epoch)), pin!(deadline)).await {
            Either::Left((outcome, _)) => outcome,
            Either::Right(((), _)) => Outcome::Clear(ClearReason::TimedOut),
        };
        let outcome = if self.epoch.get() == epoch { outcome } else { Outcome::Superseded };

        match outcome {
            Outcome::Adopt(user) => {
                tracing::info!(role = %user.role, "session rehydrated");
                self.tokens().set_user(&user);
                self.transition(Phase::Authenticated(user));
            }
            Outcome::Clear(reason) => {
                if reason == ClearReason::NoCachedSession {
                    tracing::debug!(reason = reason.as_str(), "starting anonymous");
                } else {
                    tracing::info!(reason = reason.as_str(), "persisted session discarded");
                }
                self.tokens().remove_tokens();
                self.transition(Phase::Anonymous);
            }
            Outcome::Superseded => {
                tracing::debug!("rehydration result discarded; session changed meanwhile");
            }
        }
        self.session()
    }

    /// Drive the step machine until it reaches [`Step::Done`]. After every
    /// network round trip the epoch is rechecked; once it has moved nothing
    /// further is sent or written.
    async fn run_rehydration(&self, epoch: u64) -> Outcome {
        let mut step = Step::ReadCache;
        loop {
            step = match step {
                Step::FetchProfile { .. } | Step::Refresh if self.epoch.get() != epoch => {
                    Step::Done(Outcome::Superseded)
                }
                Step::ReadCache => {
                    let cached = self.tokens().get_user().is_some();
                    let access = self.tokens().access_token().is_some();
                    if cached && access {
                        Step::FetchProfile { after_refresh: false }
                    } else {
                        Step::Done(Outcome::Clear(ClearReason::NoCachedSession))
                    }
                }
                Step::FetchProfile { after_refresh } => match self.api.get_profile().await {
                    Ok(user) => Step::Done(Outcome::Adopt(user)),
                    Err(e) if !after_refresh => {
                        tracing::debug!(error = %e, "profile check failed; trying refresh");
                        Step::Refresh
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "profile check failed after refresh");
                        Step::Done(Outcome::Clear(ClearReason::ProfileRejected))
                    }
                },
                Step::Refresh => match self.api.refresh_tokens().await {
                    Ok(_) if self.epoch.get() != epoch => Step::Done(Outcome::Superseded),
                    Ok(issued) => {
                        self.tokens().set_tokens(&issued.access, &issued.refresh);
                        tracing::debug!("access token refreshed");
                        Step::FetchProfile { after_refresh: true }
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "token refresh failed");
                        Step::Done(Outcome::Clear(ClearReason::RefreshFailed))
                    }
                },
                Step::Done(outcome) => return outcome,
            };
        }
    }

    // =========================================================================
    // Login / logout
    // =========================================================================

    /// Adopt `user` as the authenticated identity. The caller has already
    /// persisted tokens; no network call is made.
    pub fn login(&self, user: UserProfile) {
        tracing::info!(role = %user.role, "session authenticated");
        self.rehydration_started.set(true);
        self.transition(Phase::Authenticated(user));
    }

    /// Clear persisted credentials and forget the user. Idempotent.
    pub fn logout(&self) {
        self.tokens().remove_tokens();
        self.rehydration_started.set(true);
        if *self.phase.borrow() != Phase::Anonymous {
            tracing::info!("session signed out");
        }
        self.transition(Phase::Anonymous);
    }

    /// Credential exchange: call the login endpoint, persist tokens and user,
    /// then [`Self::login`].
    ///
    /// # Errors
    ///
    /// [`SessionError::Busy`] while another sign-in is awaiting the server,
    /// [`SessionError::Superseded`] when a logout/login landed meanwhile,
    /// [`SessionError::Api`] with the server's message on rejection.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<UserProfile, SessionError> {
        if self.sign_in_in_flight.replace(true) {
            return Err(SessionError::Busy);
        }
        let _in_flight = InFlight(&self.sign_in_in_flight);
        let epoch = self.epoch.get();

        let response = self.api.login(email.trim(), password).await?;

        if self.epoch.get() != epoch {
            return Err(SessionError::Superseded);
        }
        let tokens = response.tokens.ok_or(SessionError::MissingTokens)?;
        self.tokens().set_tokens(&tokens.access, &tokens.refresh);
        self.tokens().set_user(&response.user);
        self.login(response.user.clone());
        Ok(response.user)
    }
}
