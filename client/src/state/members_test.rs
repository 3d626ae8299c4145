use super::*;

fn filled() -> MemberForm {
    MemberForm {
        email: " asha@college.edu ".to_owned(),
        first_name: "Asha".to_owned(),
        last_name: "Rao".to_owned(),
        password: "s3cret!".to_owned(),
        password2: "s3cret!".to_owned(),
        member_id: "S-100".to_owned(),
        department: "CSE".to_owned(),
        ..MemberForm::default()
    }
}

// =============================================================
// MemberForm
// =============================================================

#[test]
fn student_payload_uses_student_id_key() {
    let body = filled().payload(MemberKind::Student).unwrap();
    assert_eq!(body["student_id"], "S-100");
    assert_eq!(body["email"], "asha@college.edu");
    assert!(body.get("staff_id").is_none());
    assert!(body.get("salary").is_none());
}

#[test]
fn staff_payload_parses_salary_or_sends_null() {
    let form = MemberForm { salary: "52000.5".to_owned(), designation: "Lecturer".to_owned(), ..filled() };
    let body = form.payload(MemberKind::Staff).unwrap();
    assert_eq!(body["staff_id"], "S-100");
    assert_eq!(body["salary"], 52000.5);
    assert_eq!(body["designation"], "Lecturer");

    let body = filled().payload(MemberKind::Staff).unwrap();
    assert!(body["salary"].is_null());
}

#[test]
fn payload_rejects_missing_fields_and_mismatch() {
    let blank = MemberForm { member_id: "  ".to_owned(), ..filled() };
    assert_eq!(blank.payload(MemberKind::Student), Err("Please fill in all required fields."));

    let mismatch = MemberForm { password2: "other".to_owned(), ..filled() };
    assert_eq!(mismatch.payload(MemberKind::Student), Err("Passwords do not match."));

    let bad_salary = MemberForm { salary: "lots".to_owned(), ..filled() };
    assert_eq!(bad_salary.payload(MemberKind::Staff), Err("Salary must be a number."));
}

#[test]
fn edit_form_prefills_from_row_without_passwords() {
    let member: Member = serde_json::from_value(serde_json::json!({
        "id": 9, "staff_id": "T-7", "department": "IT", "designation": "Professor", "phone": "98400",
        "salary": "52000.00",
        "user": { "id": 21, "first_name": "Ravi", "last_name": "Kumar", "email": "ravi@college.edu" },
    }))
    .unwrap();
    let form = MemberForm::from_member(&member);
    assert_eq!(form.member_id, "T-7");
    assert_eq!(form.salary, "52000.00");
    assert!(form.password.is_empty());

    let body = form.update_payload(MemberKind::Staff).unwrap();
    assert_eq!(body["staff_id"], "T-7");
    assert_eq!(body["salary"], 52000.0);
    assert_eq!(body["phone"], "98400");
    assert!(body.get("password").is_none());
}

#[test]
fn update_payload_requires_name_and_email_only() {
    let form = MemberForm { password: String::new(), password2: String::new(), ..filled() };
    assert!(form.update_payload(MemberKind::Student).is_ok());
    assert_eq!(form.payload(MemberKind::Student), Err("Please fill in all required fields."));

    let nameless = MemberForm { first_name: " ".to_owned(), ..filled() };
    assert_eq!(nameless.update_payload(MemberKind::Student), Err("Please fill in all required fields."));
}

// =============================================================
// Directory helpers
// =============================================================

#[test]
fn distinct_values_sorts_and_dedups() {
    let members: Vec<Member> = serde_json::from_value(serde_json::json!([
        { "id": 1, "department": "IT" },
        { "id": 2, "department": "CSE" },
        { "id": 3, "department": "IT" },
        { "id": 4, "department": "" },
    ]))
    .unwrap();
    assert_eq!(distinct_values(&members, |m| Some(m.department.as_str())), ["CSE", "IT"]);
}

#[test]
fn kind_labels() {
    assert_eq!(MemberKind::Staff.id_field(), "staff_id");
    assert_eq!(MemberKind::Student.title(), "Students");
}

#[test]
fn hod_departments_sort_and_skip_blank() {
    let state = HodDirectoryState {
        items: serde_json::from_value(serde_json::json!([
            { "id": 1, "department_name": "IT" },
            { "id": 2, "department_name": "CSE" },
            { "id": 3, "department_name": "" },
            { "id": 4, "department_name": "IT" },
        ]))
        .unwrap(),
        ..HodDirectoryState::default()
    };
    assert_eq!(state.departments(), ["CSE", "IT"]);
}
