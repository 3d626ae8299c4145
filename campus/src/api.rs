//! REST client for the campus backend.
//!
//! Every outbound call goes through [`ApiClient::request`], which attaches the
//! stored bearer token, JSON-encodes the body and normalizes the response.
//! The actual I/O is delegated to a host [`Transport`] (`gloo-net` in the
//! browser, `reqwest` in the CLI, a script in tests).
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses become [`ApiError::Request`] carrying the server's
//! `error` or `detail` message. A 2xx with an empty or non-JSON body (204 on
//! deletes) is a success, not a parse failure. The client never retries and
//! never refreshes tokens on its own; the session manager decides that.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::future::Future;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::config::ApiConfig;
use crate::records::{self, Hod, Member, Notice, NoticeDraft, Subject, SubjectDraft};
use crate::store::{KeyValueStore, TokenStore};
use crate::types::{RecordId, UserProfile};

pub const DEFAULT_ERROR_MESSAGE: &str = "Request failed";
pub const EMPTY_SUCCESS_MESSAGE: &str = "Operation completed successfully";

const LOGIN_ENDPOINT: &str = "/api/auth/login/";
const PROFILE_ENDPOINT: &str = "/api/auth/profile/";
const REFRESH_ENDPOINT: &str = "/api/auth/token/refresh/";
const ADD_STUDENT_ENDPOINT: &str = "/api/auth/add-student/";
const ADD_STAFF_ENDPOINT: &str = "/api/auth/add-staff/";
const STUDENTS_ENDPOINT: &str = "/api/auth/students/";
const STAFF_ENDPOINT: &str = "/api/auth/staff/";
const HODS_ENDPOINT: &str = "/api/auth/hods/";
const NOTICES_ENDPOINT: &str = "/api/notices/";
const CREATE_NOTICE_ENDPOINT: &str = "/api/notices/create/";
const SUBJECTS_ENDPOINT: &str = "/api/syllabus/subjects/";
const SYLLABUS_ENDPOINT: &str = "/api/syllabus/";

fn notice_endpoint(id: &RecordId) -> String {
    format!("{NOTICES_ENDPOINT}{id}/")
}

fn student_member_endpoint(student_id: &str) -> String {
    format!("{STUDENTS_ENDPOINT}{}/", student_id.trim())
}

fn staff_member_endpoint(staff_id: &str) -> String {
    format!("{STAFF_ENDPOINT}{}/", staff_id.trim())
}

fn assign_hod_endpoint(user_id: &RecordId) -> String {
    format!("{STAFF_ENDPOINT}{user_id}/assign-hod/")
}

fn department_subjects_endpoint(department: &str) -> String {
    format!("{SUBJECTS_ENDPOINT}department/{}/", department.trim())
}

fn syllabus_endpoint(id: &RecordId) -> String {
    format!("{SYLLABUS_ENDPOINT}{id}/")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

/// Fully resolved request handed to a [`Transport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First header value named `name`, compared case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced a response (DNS, refused connection, CORS).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Host HTTP implementation.
pub trait Transport {
    fn send(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse, TransportError>>;
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(#[from] TransportError),
    /// Non-2xx response; `message` is what the UI shows inline.
    #[error("{message}")]
    Request { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("No refresh token available")]
    MissingRefreshToken,
}

impl ApiError {
    /// 401/403: the access token is missing, expired or rejected.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Request { status: 401 | 403, .. })
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Message for a failed response: body `error`, then `detail`, then a default.
#[must_use]
pub fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return DEFAULT_ERROR_MESSAGE.to_owned();
    };
    ["error", "detail"]
        .into_iter()
        .filter_map(|key| value.get(key).and_then(Value::as_str))
        .find(|message| !message.is_empty())
        .unwrap_or(DEFAULT_ERROR_MESSAGE)
        .to_owned()
}

/// Body of a successful response; empty or non-JSON bodies become a
/// synthetic `{ "message": ... }` envelope.
#[must_use]
pub fn success_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return json!({ "message": EMPTY_SUCCESS_MESSAGE });
    }
    serde_json::from_str(body).unwrap_or_else(|_| json!({ "message": EMPTY_SUCCESS_MESSAGE }))
}

/// Items of a list response: a bare array, or the first array found under
/// one of `keys` in an envelope object.
fn list_items(value: Value, keys: &[&str]) -> Result<Vec<Value>, ApiError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => keys
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .ok_or_else(|| ApiError::Decode("Invalid data format received from server".to_owned())),
        _ => Err(ApiError::Decode("Invalid data format received from server".to_owned())),
    }
}

/// Decode every list item, skipping (and logging) items that do not fit.
fn decode_items<R: DeserializeOwned>(items: Vec<Value>, kind: &'static str) -> Vec<R> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(kind, error = %e, "skipping malformed record");
                None
            }
        })
        .collect()
}

/// Tokens issued by the login endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct IssuedTokens {
    pub access: String,
    pub refresh: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LoginResponse {
    pub user: UserProfile,
    pub tokens: Option<IssuedTokens>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
struct RefreshResponse {
    access: Option<String>,
    refresh: Option<String>,
}

/// REST client bound to one backend and one token store.
pub struct ApiClient<T, S> {
    config: ApiConfig,
    transport: T,
    tokens: TokenStore<S>,
}

impl<T: Transport, S: KeyValueStore> ApiClient<T, S> {
    pub fn new(config: &ApiConfig, transport: T, backend: S) -> Self {
        Self { config: config.clone(), transport, tokens: TokenStore::new(backend) }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn tokens(&self) -> &TokenStore<S> {
        &self.tokens
    }

    fn build_request(&self, method: Method, endpoint: &str, body: Option<&Value>) -> HttpRequest {
        let mut headers = vec![("Content-Type".to_owned(), "application/json".to_owned())];
        if let Some(access) = self.tokens.access_token() {
            headers.push(("Authorization".to_owned(), format!("Bearer {access}")));
        }
        HttpRequest {
            method,
            url: self.config.url(endpoint),
            headers,
            body: body.map(Value::to_string),
        }
    }

    /// Send one request and normalize the outcome.
    ///
    /// # Errors
    ///
    /// [`ApiError::Transport`] when no response arrived, [`ApiError::Request`]
    /// for any non-2xx status.
    pub async fn request(&self, method: Method, endpoint: &str, body: Option<&Value>) -> Result<Value, ApiError> {
        let request = self.build_request(method, endpoint, body);
        tracing::debug!(method = method.as_str(), endpoint, "api request");

        let response = self.transport.send(request).await.map_err(|e| {
            tracing::debug!(endpoint, error = %e, "api transport failure");
            ApiError::from(e)
        })?;

        if !response.is_success() {
            let message = error_message(&response.body);
            tracing::debug!(endpoint, status = response.status, %message, "api request rejected");
            return Err(ApiError::Request { status: response.status, message });
        }
        Ok(success_body(&response.body))
    }

    /// [`Self::request`] decoded into `R`.
    ///
    /// # Errors
    ///
    /// Everything [`Self::request`] returns, plus [`ApiError::Decode`] when the
    /// body does not match `R`.
    pub async fn request_as<R: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<R, ApiError> {
        let value = self.request(method, endpoint, body).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Exchange credentials for a user and token pair. Does not persist.
    ///
    /// # Errors
    ///
    /// Server rejection (bad credentials) surfaces as [`ApiError::Request`].
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = json!({ "email": email, "password": password });
        self.request_as(Method::Post, LOGIN_ENDPOINT, Some(&body)).await
    }

    /// Fetch the profile of the current access token's owner.
    ///
    /// # Errors
    ///
    /// 401 when the access token is expired or invalid.
    pub async fn get_profile(&self) -> Result<UserProfile, ApiError> {
        self.request_as(Method::Get, PROFILE_ENDPOINT, None).await
    }

    /// Trade the stored refresh token for a new pair. The old refresh token
    /// is carried over when the server does not rotate it. Nothing is
    /// persisted; the caller decides whether the pair is still wanted.
    ///
    /// # Errors
    ///
    /// [`ApiError::MissingRefreshToken`] without a stored refresh token;
    /// [`ApiError::Decode`] when the response carries no access token.
    pub async fn refresh_tokens(&self) -> Result<IssuedTokens, ApiError> {
        let refresh = self.tokens.refresh_token().ok_or(ApiError::MissingRefreshToken)?;
        let body = json!({ "refresh": refresh });
        let response: RefreshResponse = self.request_as(Method::Post, REFRESH_ENDPOINT, Some(&body)).await?;
        let access = response
            .access
            .filter(|a| !a.is_empty())
            .ok_or_else(|| ApiError::Decode("refresh response missing access token".to_owned()))?;
        let refresh = response.refresh.filter(|r| !r.is_empty()).unwrap_or(refresh);
        Ok(IssuedTokens { access, refresh })
    }

    // =========================================================================
    // Students / staff
    // =========================================================================

    /// # Errors
    ///
    /// Validation failures come back as [`ApiError::Request`] for the form.
    pub async fn add_student(&self, payload: &Value) -> Result<Value, ApiError> {
        self.request(Method::Post, ADD_STUDENT_ENDPOINT, Some(payload)).await
    }

    /// # Errors
    ///
    /// Validation failures come back as [`ApiError::Request`] for the form.
    pub async fn add_staff(&self, payload: &Value) -> Result<Value, ApiError> {
        self.request(Method::Post, ADD_STAFF_ENDPOINT, Some(payload)).await
    }

    /// # Errors
    ///
    /// Propagates request failures and malformed envelopes.
    pub async fn students(&self) -> Result<Vec<Member>, ApiError> {
        let value = self.request(Method::Get, STUDENTS_ENDPOINT, None).await?;
        Ok(decode_items(list_items(value, &["students", "results", "data"])?, "student"))
    }

    /// # Errors
    ///
    /// Propagates request failures and malformed envelopes.
    pub async fn staff(&self) -> Result<Vec<Member>, ApiError> {
        let value = self.request(Method::Get, STAFF_ENDPOINT, None).await?;
        Ok(decode_items(list_items(value, &["staff", "results", "data"])?, "staff"))
    }

    /// Directory rows are addressed by their `student_id` / `staff_id`, not
    /// the numeric record id.
    ///
    /// # Errors
    ///
    /// Validation failures come back as [`ApiError::Request`] for the form.
    pub async fn update_student(&self, student_id: &str, payload: &Value) -> Result<Value, ApiError> {
        self.request(Method::Patch, &student_member_endpoint(student_id), Some(payload)).await
    }

    /// # Errors
    ///
    /// Propagates request failures; a 204 is success.
    pub async fn delete_student(&self, student_id: &str) -> Result<Value, ApiError> {
        self.request(Method::Delete, &student_member_endpoint(student_id), None).await
    }

    /// # Errors
    ///
    /// Validation failures come back as [`ApiError::Request`] for the form.
    pub async fn update_staff(&self, staff_id: &str, payload: &Value) -> Result<Value, ApiError> {
        self.request(Method::Patch, &staff_member_endpoint(staff_id), Some(payload)).await
    }

    /// # Errors
    ///
    /// A 400 usually means other records still reference the staff member.
    pub async fn delete_staff(&self, staff_id: &str) -> Result<Value, ApiError> {
        self.request(Method::Delete, &staff_member_endpoint(staff_id), None).await
    }

    /// Make the staff member's user head of `department`.
    ///
    /// # Errors
    ///
    /// Propagates request and validation failures.
    pub async fn assign_hod(
        &self,
        user_id: &RecordId,
        department: &str,
        additional_responsibilities: &str,
    ) -> Result<Value, ApiError> {
        let body = json!({
            "department": department.trim(),
            "additional_responsibilities": additional_responsibilities.trim(),
        });
        self.request(Method::Post, &assign_hod_endpoint(user_id), Some(&body)).await
    }

    /// # Errors
    ///
    /// Propagates request failures and malformed envelopes.
    pub async fn hods(&self) -> Result<Vec<Hod>, ApiError> {
        let value = self.request(Method::Get, HODS_ENDPOINT, None).await?;
        Ok(decode_items(list_items(value, &["results", "hods", "data"])?, "hod"))
    }

    // =========================================================================
    // Notices
    // =========================================================================

    /// All notices the token may read, newest first.
    ///
    /// # Errors
    ///
    /// Propagates request failures and malformed envelopes.
    pub async fn notices(&self) -> Result<Vec<Notice>, ApiError> {
        let value = self.request(Method::Get, NOTICES_ENDPOINT, None).await?;
        let mut notices: Vec<Notice> = decode_items(list_items(value, &["notices", "results", "data"])?, "notice");
        records::sort_notices_newest_first(&mut notices);
        Ok(notices)
    }

    /// # Errors
    ///
    /// Validation failures come back as [`ApiError::Request`] for the form.
    pub async fn create_notice(&self, draft: &NoticeDraft) -> Result<Value, ApiError> {
        let body = serde_json::to_value(draft).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.request(Method::Post, CREATE_NOTICE_ENDPOINT, Some(&body)).await
    }

    /// # Errors
    ///
    /// Validation failures come back as [`ApiError::Request`] for the form.
    pub async fn update_notice(&self, id: &RecordId, draft: &NoticeDraft) -> Result<Value, ApiError> {
        let body = serde_json::to_value(draft).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.request(Method::Put, &notice_endpoint(id), Some(&body)).await
    }

    /// # Errors
    ///
    /// Propagates request failures; a 204 is success.
    pub async fn delete_notice(&self, id: &RecordId) -> Result<Value, ApiError> {
        self.request(Method::Delete, &notice_endpoint(id), None).await
    }

    // =========================================================================
    // Subjects / syllabus
    // =========================================================================

    /// # Errors
    ///
    /// Propagates request failures and malformed envelopes.
    pub async fn subjects(&self) -> Result<Vec<Subject>, ApiError> {
        let value = self.request(Method::Get, SUBJECTS_ENDPOINT, None).await?;
        Ok(decode_items(list_items(value, &["results", "data", "subjects"])?, "subject"))
    }

    /// # Errors
    ///
    /// Propagates request failures and malformed envelopes.
    pub async fn department_subjects(&self, department: &str) -> Result<Vec<Subject>, ApiError> {
        let value = self.request(Method::Get, &department_subjects_endpoint(department), None).await?;
        Ok(decode_items(list_items(value, &["results", "data", "subjects"])?, "subject"))
    }

    /// # Errors
    ///
    /// Validation failures come back as [`ApiError::Request`] for the form.
    pub async fn create_subject(&self, draft: &SubjectDraft) -> Result<Value, ApiError> {
        let body = serde_json::to_value(draft).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.request(Method::Post, SUBJECTS_ENDPOINT, Some(&body)).await
    }

    /// Attach or replace the syllabus PDF for a subject.
    ///
    /// # Errors
    ///
    /// Validation failures come back as [`ApiError::Request`] for the form.
    pub async fn save_syllabus(&self, subject_id: &RecordId, pdf_url: &str) -> Result<Value, ApiError> {
        let body = json!({ "subject": subject_id, "pdf_url": pdf_url.trim() });
        self.request(Method::Post, SYLLABUS_ENDPOINT, Some(&body)).await
    }

    /// # Errors
    ///
    /// Propagates request failures; a 204 is success.
    pub async fn delete_syllabus(&self, id: &RecordId) -> Result<Value, ApiError> {
        self.request(Method::Delete, &syllabus_endpoint(id), None).await
    }
}
