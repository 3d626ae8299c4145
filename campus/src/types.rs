//! Identity and session DTOs shared by the store, API client and guard.
//!
//! DESIGN
//! ======
//! Roles are a closed enum so an unexpected role string fails profile
//! decoding instead of silently failing every allow-list comparison later.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Portal role attached to every user profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Staff,
    Student,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Staff, Role::Student];

    /// Wire name, always lowercase.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
            Role::Student => "student",
        }
    }

    /// Parse a role name case-insensitively.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Role::ALL.into_iter().find(|role| raw.trim().eq_ignore_ascii_case(role.as_str()))
    }

    /// Dashboard a freshly signed-in user lands on.
    #[must_use]
    pub const fn home_path(self) -> &'static str {
        match self {
            Role::Admin => "/admin",
            Role::Staff => "/staff",
            Role::Student => "/student",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Role::Admin => 1,
            Role::Staff => 1 << 1,
            Role::Student => 1 << 2,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Role::parse(&raw).ok_or_else(|| serde::de::Error::unknown_variant(&raw, &["admin", "staff", "student"]))
    }
}

/// Set of roles used as a route allow-list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RoleSet(u8);

impl RoleSet {
    pub const EMPTY: RoleSet = RoleSet(0);
    pub const ANY: RoleSet = RoleSet::of(&Role::ALL);
    pub const ADMIN: RoleSet = RoleSet::of(&[Role::Admin]);
    pub const STAFF: RoleSet = RoleSet::of(&[Role::Staff]);
    pub const STUDENT: RoleSet = RoleSet::of(&[Role::Student]);
    pub const FACULTY: RoleSet = RoleSet::of(&[Role::Admin, Role::Staff]);

    #[must_use]
    pub const fn of(roles: &[Role]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < roles.len() {
            bits |= roles[i].bit();
            i += 1;
        }
        RoleSet(bits)
    }

    #[must_use]
    pub const fn with(self, role: Role) -> Self {
        RoleSet(self.0 | role.bit())
    }

    #[must_use]
    pub const fn contains(self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        iter.into_iter().fold(RoleSet::EMPTY, RoleSet::with)
    }
}

/// Server-assigned identifier; the API mixes integer and string ids.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{id}"),
            RecordId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId::Int(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        id.parse::<i64>().map_or_else(|_| RecordId::Text(id.to_owned()), RecordId::Int)
    }
}

/// Authenticated user as returned by `/api/auth/profile/` and the login call.
///
/// Only `role` and the name fields are interpreted; the profile sub-objects
/// are carried through untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: RecordId,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_profile: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_profile: Option<serde_json::Value>,
}

impl UserProfile {
    /// `"First Last"`, falling back to the email when both names are blank.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() { self.email.clone() } else { full.to_owned() }
    }

    /// Department code from the student profile, when present.
    #[must_use]
    pub fn student_department(&self) -> Option<&str> {
        self.student_profile.as_ref()?.get("department")?.as_str()
    }
}

/// Persisted credential pair. Either half may be missing in storage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

/// Snapshot of what the client believes about the current identity.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Session {
    pub user: Option<UserProfile>,
    pub is_authenticated: bool,
    pub loading: bool,
}

impl Session {
    /// Startup state before rehydration has resolved.
    #[must_use]
    pub const fn uninitialized() -> Self {
        Self { user: None, is_authenticated: false, loading: true }
    }

    #[must_use]
    pub const fn anonymous() -> Self {
        Self { user: None, is_authenticated: false, loading: false }
    }

    #[must_use]
    pub const fn authenticated(user: UserProfile) -> Self {
        Self { user: Some(user), is_authenticated: true, loading: false }
    }

    /// Role of the authenticated user, if any.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        if self.is_authenticated { self.user.as_ref().map(|u| u.role) } else { None }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::uninitialized()
    }
}
