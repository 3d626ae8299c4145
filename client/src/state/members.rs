//! Student and staff directory state for the admin pages.

#[cfg(test)]
#[path = "members_test.rs"]
mod members_test;

use campus::records::{Hod, HodFilter, Member, MemberFilter};
use serde_json::{Map, Value};

/// Which directory a page manages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberKind {
    Student,
    Staff,
}

impl MemberKind {
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            MemberKind::Student => "Students",
            MemberKind::Staff => "Staff",
        }
    }

    #[must_use]
    pub const fn noun(self) -> &'static str {
        match self {
            MemberKind::Student => "Student",
            MemberKind::Staff => "Staff",
        }
    }

    #[must_use]
    pub const fn id_label(self) -> &'static str {
        match self {
            MemberKind::Student => "Student ID",
            MemberKind::Staff => "Staff ID",
        }
    }

    #[must_use]
    pub const fn id_field(self) -> &'static str {
        match self {
            MemberKind::Student => "student_id",
            MemberKind::Staff => "staff_id",
        }
    }

    #[must_use]
    pub const fn created_message(self) -> &'static str {
        match self {
            MemberKind::Student => "Student created successfully!",
            MemberKind::Staff => "Staff member created successfully!",
        }
    }

    #[must_use]
    pub const fn updated_message(self) -> &'static str {
        match self {
            MemberKind::Student => "Student updated successfully!",
            MemberKind::Staff => "Staff member updated successfully!",
        }
    }

    #[must_use]
    pub const fn delete_prompt(self) -> &'static str {
        match self {
            MemberKind::Student => "Are you sure you want to delete this student?",
            MemberKind::Staff => "Are you sure you want to delete this staff member?",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DirectoryState {
    pub items: Vec<Member>,
    pub loading: bool,
    pub error: Option<String>,
    pub filter: MemberFilter,
    /// Row currently open in the edit form, by directory id.
    pub editing: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HodDirectoryState {
    pub items: Vec<Hod>,
    pub loading: bool,
    pub error: Option<String>,
    pub filter: HodFilter,
}

impl HodDirectoryState {
    /// Distinct departments, sorted, for the filter dropdown.
    #[must_use]
    pub fn departments(&self) -> Vec<String> {
        let mut values: Vec<String> =
            self.items.iter().map(|h| h.department_name.clone()).filter(|d| !d.is_empty()).collect();
        values.sort();
        values.dedup();
        values
    }
}

/// Distinct non-empty values of `field` across `members`, sorted.
#[must_use]
pub fn distinct_values(members: &[Member], field: impl Fn(&Member) -> Option<&str>) -> Vec<String> {
    let mut values: Vec<String> =
        members.iter().filter_map(&field).filter(|v| !v.is_empty()).map(str::to_owned).collect();
    values.sort();
    values.dedup();
    values
}

/// Registration form for a new student or staff member.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemberForm {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub password2: String,
    pub member_id: String,
    pub department: String,
    pub phone: String,
    /// Staff only.
    pub designation: String,
    /// Staff only; optional decimal.
    pub salary: String,
}

impl MemberForm {
    /// Edit form prefilled from a directory row; passwords stay blank.
    #[must_use]
    pub fn from_member(member: &Member) -> Self {
        Self {
            email: member.user.email.clone(),
            first_name: member.user.first_name.clone(),
            last_name: member.user.last_name.clone(),
            member_id: member.member_id.clone(),
            department: member.department.clone(),
            phone: member.phone.clone().unwrap_or_default(),
            designation: member.designation.clone().unwrap_or_default(),
            salary: member.salary.clone().unwrap_or_default(),
            ..Self::default()
        }
    }

    /// JSON body for the add-student / add-staff endpoint.
    ///
    /// # Errors
    ///
    /// Returns a user-facing message for missing fields, mismatched passwords
    /// or a salary that is not a number.
    pub fn payload(&self, kind: MemberKind) -> Result<Value, &'static str> {
        if self.password.trim().is_empty() || self.member_id.trim().is_empty() {
            return Err("Please fill in all required fields.");
        }
        let mut body = self.profile_fields(kind)?;
        if self.password != self.password2 {
            return Err("Passwords do not match.");
        }
        body.insert("password".to_owned(), Value::String(self.password.clone()));
        body.insert("password2".to_owned(), Value::String(self.password2.clone()));
        Ok(Value::Object(body))
    }

    /// JSON body for the update endpoint. Passwords are never sent.
    ///
    /// # Errors
    ///
    /// Returns a user-facing message for missing name/email or a bad salary.
    pub fn update_payload(&self, kind: MemberKind) -> Result<Value, &'static str> {
        self.profile_fields(kind).map(Value::Object)
    }

    fn profile_fields(&self, kind: MemberKind) -> Result<Map<String, Value>, &'static str> {
        let required = [&self.email, &self.first_name, &self.last_name];
        if required.iter().any(|v| v.trim().is_empty()) {
            return Err("Please fill in all required fields.");
        }

        let mut body = Map::new();
        let mut put = |key: &str, value: &str| {
            body.insert(key.to_owned(), Value::String(value.trim().to_owned()));
        };
        put("email", &self.email);
        put("first_name", &self.first_name);
        put("last_name", &self.last_name);
        put(kind.id_field(), &self.member_id);
        put("department", &self.department);
        put("phone", &self.phone);

        if kind == MemberKind::Staff {
            body.insert("designation".to_owned(), Value::String(self.designation.trim().to_owned()));
            let salary = match self.salary.trim() {
                "" => Value::Null,
                raw => raw.parse::<f64>().map(Value::from).map_err(|_| "Salary must be a number.")?,
            };
            body.insert("salary".to_owned(), salary);
        }
        Ok(body)
    }
}
