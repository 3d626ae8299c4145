//! Subject and syllabus-link forms for the faculty syllabus page.

#[cfg(test)]
#[path = "syllabus_test.rs"]
mod syllabus_test;

use campus::records::{self, Subject, SubjectDraft, SubjectFilter};

pub const SEMESTERS: std::ops::RangeInclusive<u8> = 1..=8;
/// Departments offered in the add-subject form.
pub const DEPARTMENTS: [&str; 6] = ["CSE", "IT", "ECE", "EEE", "MECH", "CIVIL"];

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SyllabusState {
    pub items: Vec<Subject>,
    pub loading: bool,
    pub error: Option<String>,
    pub filter: SubjectFilter,
}

impl SyllabusState {
    #[must_use]
    pub fn visible(&self) -> Vec<Subject> {
        records::filter_subjects(&self.items, &self.filter).into_iter().cloned().collect()
    }

    #[must_use]
    pub fn departments(&self) -> Vec<String> {
        let mut departments: Vec<String> =
            self.items.iter().map(|s| s.department.clone()).filter(|d| !d.is_empty()).collect();
        departments.sort();
        departments.dedup();
        departments
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubjectForm {
    pub name: String,
    pub code: String,
    pub department: String,
    pub semester: String,
}

impl SubjectForm {
    /// # Errors
    ///
    /// Returns a user-facing message for blank fields or a semester outside 1-8.
    pub fn to_draft(&self) -> Result<SubjectDraft, &'static str> {
        let name = self.name.trim();
        let code = self.code.trim();
        let department = self.department.trim();
        if name.is_empty() || code.is_empty() || department.is_empty() {
            return Err("Name, code and department are required.");
        }
        let semester = self
            .semester
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|s| SEMESTERS.contains(s))
            .ok_or("Semester must be between 1 and 8.")?;
        Ok(SubjectDraft {
            name: name.to_owned(),
            subject_code: code.to_uppercase(),
            department: department.to_owned(),
            semester,
        })
    }
}

/// Validate a syllabus PDF link before it is attached to a subject.
///
/// # Errors
///
/// Returns a user-facing message when the URL is not an http(s) `.pdf` link.
pub fn validate_pdf_url(raw: &str) -> Result<String, &'static str> {
    let url = raw.trim();
    if records::is_pdf_url(url) { Ok(url.to_owned()) } else { Err("Enter a valid PDF URL (must end with .pdf).") }
}
