//! Notice, subject and member records plus the dashboard filters over them.
//!
//! DESIGN
//! ======
//! The API is loose about field names (`name`/`subject`, `subject_code`/`code`,
//! `id`/`_id`) and number-vs-string values, so decoding normalizes once here
//! and every page filters the same typed records.

#[cfg(test)]
#[path = "records_test.rs"]
mod records_test;

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::{RecordId, Role, RoleSet};

/// Roles allowed to create, edit and delete notices.
pub const NOTICE_EDITORS: RoleSet = RoleSet::ADMIN;
/// Roles allowed to manage subjects and syllabus files.
pub const SYLLABUS_EDITORS: RoleSet = RoleSet::FACULTY;
/// Roles allowed to list and manage students, staff and HODs.
pub const DIRECTORY_VIEWERS: RoleSet = RoleSet::ADMIN;
/// Roles that can see staff-only notices.
pub const STAFF_NOTICE_READERS: RoleSet = RoleSet::FACULTY;

// =============================================================================
// Notices
// =============================================================================

/// Who a notice is addressed to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Audience {
    All,
    Staff,
    Other(String),
}

impl Audience {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" => Audience::All,
            "staff" => Audience::Staff,
            _ => Audience::Other(raw.to_owned()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Audience::All => "all",
            Audience::Staff => "staff",
            Audience::Other(raw) => raw,
        }
    }
}

impl Serialize for Audience {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Audience {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Audience::parse(&String::deserialize(deserializer)?))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    #[serde(alias = "_id")]
    pub id: RecordId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub category: Option<String>,
    pub audience: Option<Audience>,
    pub date: Option<String>,
    pub datetime: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Notice {
    /// Most relevant timestamp: last update, then scheduled time, date, creation.
    #[must_use]
    pub fn timestamp(&self) -> Option<&str> {
        [&self.updated_at, &self.datetime, &self.date, &self.created_at]
            .into_iter()
            .filter_map(|t| t.as_deref())
            .find(|t| !t.is_empty())
    }
}

/// Payload for creating or editing a notice.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NoticeDraft {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub audience: Audience,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
}

impl NoticeDraft {
    /// Trimmed draft, or the message to show when title or content is blank.
    ///
    /// # Errors
    ///
    /// Returns a user-facing message when a required field is empty.
    pub fn validated(self) -> Result<Self, &'static str> {
        let title = self.title.trim().to_owned();
        let content = self.content.trim().to_owned();
        if title.is_empty() || content.is_empty() {
            return Err("Title and content are required.");
        }
        let category = self.category.map(|c| c.trim().to_owned()).filter(|c| !c.is_empty());
        Ok(Self { title, content, category, ..self })
    }
}

/// Audience selector shown to admin and staff viewers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AudienceFilter {
    /// Everything the viewer may read.
    #[default]
    Everyone,
    StaffOnly,
}

impl AudienceFilter {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("staff") { AudienceFilter::StaffOnly } else { AudienceFilter::Everyone }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NoticeFilter {
    pub category: Option<String>,
    pub audience: AudienceFilter,
}

impl NoticeFilter {
    /// Set the category; `"all"` and blank clear it.
    #[must_use]
    pub fn with_category(mut self, category: &str) -> Self {
        let category = category.trim();
        self.category = if category.is_empty() || category.eq_ignore_ascii_case("all") {
            None
        } else {
            Some(category.to_owned())
        };
        self
    }

    #[must_use]
    pub fn with_audience(mut self, audience: AudienceFilter) -> Self {
        self.audience = audience;
        self
    }
}

/// Sort newest first by [`Notice::timestamp`]; undated notices go last.
pub fn sort_notices_newest_first(notices: &mut [Notice]) {
    notices.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
}

/// Distinct non-empty categories in first-seen order.
#[must_use]
pub fn notice_categories(notices: &[Notice]) -> Vec<String> {
    let mut seen = HashSet::new();
    notices
        .iter()
        .filter_map(|n| n.category.as_deref())
        .filter(|c| !c.is_empty() && seen.insert(*c))
        .map(str::to_owned)
        .collect()
}

/// Notices visible to `viewer` under `filter`.
///
/// Admin and staff see `all` and `staff` notices (or only `staff` with
/// [`AudienceFilter::StaffOnly`]); everyone else sees only `all` notices and
/// the audience selector is ignored.
#[must_use]
pub fn filter_notices<'a>(notices: &'a [Notice], viewer: Option<Role>, filter: &NoticeFilter) -> Vec<&'a Notice> {
    let reads_staff = viewer.is_some_and(|role| STAFF_NOTICE_READERS.contains(role));
    notices
        .iter()
        .filter(|n| match (reads_staff, filter.audience, n.audience.as_ref()) {
            (true, AudienceFilter::StaffOnly, Some(Audience::Staff)) => true,
            (true, AudienceFilter::Everyone, Some(Audience::All | Audience::Staff)) => true,
            (false, _, Some(Audience::All)) => true,
            _ => false,
        })
        .filter(|n| filter.category.as_ref().is_none_or(|c| n.category.as_ref() == Some(c)))
        .collect()
}

/// Drop the notice with `id` after a successful delete.
pub fn remove_notice(notices: &mut Vec<Notice>, id: &RecordId) {
    notices.retain(|n| &n.id != id);
}

// =============================================================================
// Subjects / syllabus
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSubject")]
pub struct Subject {
    pub id: RecordId,
    pub name: String,
    pub code: String,
    pub department: String,
    pub semester: String,
    pub pdf_url: Option<String>,
}

#[derive(Deserialize)]
struct RawSubject {
    id: RecordId,
    name: Option<String>,
    subject: Option<String>,
    subject_code: Option<String>,
    code: Option<String>,
    department: Option<String>,
    semester: Option<serde_json::Value>,
    pdf_url: Option<String>,
    syllabus: Option<RawSyllabus>,
}

#[derive(Deserialize)]
struct RawSyllabus {
    pdf_url: Option<String>,
}

impl From<RawSubject> for Subject {
    fn from(raw: RawSubject) -> Self {
        let semester = match raw.semester {
            Some(serde_json::Value::Number(n)) => n.to_string(),
            Some(serde_json::Value::String(s)) => s,
            _ => String::new(),
        };
        let pdf_url = raw.syllabus.and_then(|s| s.pdf_url).or(raw.pdf_url).filter(|u| !u.is_empty());
        Self {
            id: raw.id,
            name: raw.name.or(raw.subject).unwrap_or_default(),
            code: raw.subject_code.or(raw.code).unwrap_or_default(),
            department: raw.department.unwrap_or_default(),
            semester,
            pdf_url,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SubjectDraft {
    pub name: String,
    pub subject_code: String,
    pub department: String,
    pub semester: u8,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubjectFilter {
    pub department: Option<String>,
    pub semester: Option<String>,
    pub search: String,
}

#[must_use]
pub fn filter_subjects<'a>(subjects: &'a [Subject], filter: &SubjectFilter) -> Vec<&'a Subject> {
    let term = filter.search.trim().to_lowercase();
    subjects
        .iter()
        .filter(|s| filter.department.as_ref().is_none_or(|d| &s.department == d))
        .filter(|s| filter.semester.as_ref().is_none_or(|sem| &s.semester == sem))
        .filter(|s| term.is_empty() || s.name.to_lowercase().contains(&term))
        .collect()
}

/// Syllabus links must be absolute http(s) URLs ending in `.pdf`.
#[must_use]
pub fn is_pdf_url(url: &str) -> bool {
    let url = url.trim().to_ascii_lowercase();
    (url.starts_with("https://") || url.starts_with("http://")) && url.ends_with(".pdf")
}

// =============================================================================
// Students / staff
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberUser {
    pub id: Option<RecordId>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    pub is_active: Option<bool>,
}

/// A student or staff record; `member_id` holds `student_id` or `staff_id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: RecordId,
    #[serde(default, alias = "student_id", alias = "staff_id")]
    pub member_id: String,
    #[serde(default)]
    pub department: String,
    pub designation: Option<String>,
    pub phone: Option<String>,
    /// Staff only; the API sends a decimal string or a number.
    #[serde(default, deserialize_with = "text_or_number")]
    pub salary: Option<String>,
    #[serde(default)]
    pub user: MemberUser,
}

fn text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

impl Member {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.user.first_name, self.user.last_name)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MemberStatus {
    #[default]
    All,
    Active,
    Inactive,
}

impl MemberStatus {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" => Some(MemberStatus::All),
            "active" | "true" => Some(MemberStatus::Active),
            "inactive" | "false" => Some(MemberStatus::Inactive),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemberFilter {
    pub department: Option<String>,
    pub designation: Option<String>,
    pub status: MemberStatus,
    pub search: String,
}

#[must_use]
pub fn filter_members<'a>(members: &'a [Member], filter: &MemberFilter) -> Vec<&'a Member> {
    let term = filter.search.trim().to_lowercase();
    members
        .iter()
        .filter(|m| filter.department.as_ref().is_none_or(|d| &m.department == d))
        .filter(|m| filter.designation.as_ref().is_none_or(|d| m.designation.as_ref() == Some(d)))
        .filter(|m| match filter.status {
            MemberStatus::All => true,
            MemberStatus::Active => m.user.is_active == Some(true),
            MemberStatus::Inactive => m.user.is_active == Some(false),
        })
        .filter(|m| {
            term.is_empty()
                || m.full_name().to_lowercase().contains(&term)
                || m.member_id.to_lowercase().contains(&term)
                || m.user.email.to_lowercase().contains(&term)
        })
        .collect()
}

// =============================================================================
// Heads of department
// =============================================================================

/// One HOD assignment as listed by `/api/auth/hods/`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hod {
    pub id: RecordId,
    #[serde(default)]
    pub staff_name: String,
    #[serde(default)]
    pub staff_id: String,
    #[serde(default, alias = "department")]
    pub department_name: String,
    pub additional_responsibilities: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HodFilter {
    pub department: Option<String>,
    pub status: MemberStatus,
    pub search: String,
}

/// Department matches ignore case; search covers name, staff id and department.
#[must_use]
pub fn filter_hods<'a>(hods: &'a [Hod], filter: &HodFilter) -> Vec<&'a Hod> {
    let term = filter.search.trim().to_lowercase();
    hods.iter()
        .filter(|h| filter.department.as_ref().is_none_or(|d| h.department_name.eq_ignore_ascii_case(d)))
        .filter(|h| match filter.status {
            MemberStatus::All => true,
            MemberStatus::Active => h.is_active == Some(true),
            MemberStatus::Inactive => h.is_active == Some(false),
        })
        .filter(|h| {
            term.is_empty()
                || h.staff_name.to_lowercase().contains(&term)
                || h.staff_id.to_lowercase().contains(&term)
                || h.department_name.to_lowercase().contains(&term)
        })
        .collect()
}
