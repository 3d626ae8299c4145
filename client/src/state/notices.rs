//! Notice-board state shared by every dashboard.
//!
//! DESIGN
//! ======
//! One board serves admin, staff and student dashboards; the viewer's role
//! decides which notices are visible and whether the editor is shown.

#[cfg(test)]
#[path = "notices_test.rs"]
mod notices_test;

use campus::records::{self, Audience, AudienceFilter, Notice, NoticeDraft, NoticeFilter};
use campus::types::RecordId;
use campus::{ApiError, Role};

/// Loaded notices plus the viewer's current filter selection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NoticeBoardState {
    pub items: Vec<Notice>,
    pub loading: bool,
    pub error: Option<String>,
    pub filter: NoticeFilter,
}

impl NoticeBoardState {
    /// Apply a list fetch result. Items are already newest-first.
    pub fn apply_load(&mut self, result: Result<Vec<Notice>, ApiError>) {
        self.loading = false;
        match result {
            Ok(items) => {
                self.items = items;
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    #[must_use]
    pub fn visible(&self, viewer: Option<Role>) -> Vec<Notice> {
        records::filter_notices(&self.items, viewer, &self.filter).into_iter().cloned().collect()
    }

    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        records::notice_categories(&self.items)
    }

    pub fn remove(&mut self, id: &RecordId) {
        records::remove_notice(&mut self.items, id);
    }
}

/// Whether the audience selector applies to `viewer`.
#[must_use]
pub fn shows_audience_selector(viewer: Option<Role>) -> bool {
    viewer.is_some_and(|role| records::STAFF_NOTICE_READERS.contains(role))
}

#[must_use]
pub fn audience_filter_value(filter: AudienceFilter) -> &'static str {
    match filter {
        AudienceFilter::Everyone => "all",
        AudienceFilter::StaffOnly => "staff",
    }
}

/// Editor fields for creating or editing a notice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoticeForm {
    /// Set while editing an existing notice.
    pub editing: Option<RecordId>,
    pub title: String,
    pub content: String,
    pub category: String,
    pub audience: String,
}

impl Default for NoticeForm {
    fn default() -> Self {
        Self {
            editing: None,
            title: String::new(),
            content: String::new(),
            category: String::new(),
            audience: "all".to_owned(),
        }
    }
}

impl NoticeForm {
    #[must_use]
    pub fn from_notice(notice: &Notice) -> Self {
        Self {
            editing: Some(notice.id.clone()),
            title: notice.title.clone(),
            content: notice.content.clone(),
            category: notice.category.clone().unwrap_or_default(),
            audience: notice.audience.as_ref().map_or("all", Audience::as_str).to_owned(),
        }
    }

    /// Validated draft ready to submit.
    ///
    /// # Errors
    ///
    /// Returns the message shown under the editor when a required field is blank.
    pub fn to_draft(&self) -> Result<NoticeDraft, &'static str> {
        NoticeDraft {
            title: self.title.clone(),
            content: self.content.clone(),
            category: Some(self.category.clone()),
            audience: Audience::parse(&self.audience),
            date: None,
            datetime: None,
        }
        .validated()
    }
}
