use super::*;
use serde_json::json;

fn notice(id: i64, audience: &str, category: &str, updated_at: &str) -> Notice {
    serde_json::from_value(json!({
        "id": id,
        "title": format!("Notice {id}"),
        "content": "body",
        "category": category,
        "audience": audience,
        "updated_at": updated_at,
    }))
    .unwrap()
}

fn board() -> Vec<Notice> {
    vec![
        notice(1, "all", "Exams", "2024-03-01T09:00:00Z"),
        notice(2, "staff", "Staff Meeting", "2024-03-02T09:00:00Z"),
        notice(3, "all", "Events", "2024-03-03T09:00:00Z"),
        notice(4, "students", "Exams", "2024-03-04T09:00:00Z"),
    ]
}

fn ids(notices: &[&Notice]) -> Vec<String> {
    notices.iter().map(|n| n.id.to_string()).collect()
}

// =============================================================
// Notice decoding and ordering
// =============================================================

#[test]
fn notice_accepts_underscore_id_and_missing_fields() {
    let n: Notice = serde_json::from_value(json!({ "_id": "abc", "title": "Hello" })).unwrap();
    assert_eq!(n.id, RecordId::Text("abc".to_owned()));
    assert!(n.audience.is_none());
    assert!(n.timestamp().is_none());
}

#[test]
fn timestamp_prefers_updated_then_datetime_then_date_then_created() {
    let n: Notice = serde_json::from_value(json!({
        "id": 1,
        "updated_at": "",
        "datetime": "2024-05-01T10:00",
        "date": "2024-04-01",
        "created_at": "2024-01-01",
    }))
    .unwrap();
    assert_eq!(n.timestamp(), Some("2024-05-01T10:00"));
}

#[test]
fn sort_puts_newest_first_and_undated_last() {
    let mut notices = board();
    notices.push(serde_json::from_value(json!({ "id": 9, "audience": "all" })).unwrap());
    sort_notices_newest_first(&mut notices);
    let order: Vec<String> = notices.iter().map(|n| n.id.to_string()).collect();
    assert_eq!(order, ["4", "3", "2", "1", "9"]);
}

#[test]
fn categories_are_distinct_in_first_seen_order() {
    assert_eq!(notice_categories(&board()), ["Exams", "Staff Meeting", "Events"]);
}

// =============================================================
// Notice filtering
// =============================================================

#[test]
fn student_sees_only_all_audience() {
    let notices = board();
    let visible = filter_notices(&notices, Some(Role::Student), &NoticeFilter::default());
    assert_eq!(ids(&visible), ["1", "3"]);
}

#[test]
fn student_ignores_staff_only_selector() {
    let notices = board();
    let filter = NoticeFilter::default().with_audience(AudienceFilter::StaffOnly);
    let visible = filter_notices(&notices, Some(Role::Student), &filter);
    assert_eq!(ids(&visible), ["1", "3"]);
}

#[test]
fn anonymous_viewer_is_treated_like_student() {
    let notices = board();
    let visible = filter_notices(&notices, None, &NoticeFilter::default());
    assert_eq!(ids(&visible), ["1", "3"]);
}

#[test]
fn staff_sees_all_and_staff_audiences() {
    let notices = board();
    let visible = filter_notices(&notices, Some(Role::Staff), &NoticeFilter::default());
    assert_eq!(ids(&visible), ["1", "2", "3"]);
}

#[test]
fn admin_staff_only_selector_keeps_staff_notices() {
    let notices = board();
    let filter = NoticeFilter::default().with_audience(AudienceFilter::StaffOnly);
    let visible = filter_notices(&notices, Some(Role::Admin), &filter);
    assert_eq!(ids(&visible), ["2"]);
}

#[test]
fn category_filter_applies_after_audience() {
    let notices = board();
    let filter = NoticeFilter::default().with_category("Exams");
    let visible = filter_notices(&notices, Some(Role::Admin), &filter);
    assert_eq!(ids(&visible), ["1"]);
}

#[test]
fn all_category_clears_the_filter() {
    let filter = NoticeFilter::default().with_category("Exams").with_category("all");
    assert_eq!(filter.category, None);
}

#[test]
fn remove_notice_drops_matching_id() {
    let mut notices = board();
    remove_notice(&mut notices, &RecordId::Int(2));
    assert_eq!(notices.len(), 3);
    assert!(notices.iter().all(|n| n.id != RecordId::Int(2)));
}

#[test]
fn notice_draft_validation_trims_and_requires_fields() {
    let draft = NoticeDraft {
        title: "  Exam schedule ".to_owned(),
        content: " Hall B ".to_owned(),
        category: Some("  ".to_owned()),
        audience: Audience::All,
        date: None,
        datetime: None,
    };
    let valid = draft.clone().validated().unwrap();
    assert_eq!(valid.title, "Exam schedule");
    assert_eq!(valid.content, "Hall B");
    assert_eq!(valid.category, None);

    let blank = NoticeDraft { title: " ".to_owned(), ..draft };
    assert_eq!(blank.validated(), Err("Title and content are required."));
}

#[test]
fn notice_draft_serializes_audience_as_string() {
    let draft = NoticeDraft {
        title: "t".to_owned(),
        content: "c".to_owned(),
        category: None,
        audience: Audience::Staff,
        date: None,
        datetime: None,
    };
    assert_eq!(serde_json::to_value(&draft).unwrap(), json!({ "title": "t", "content": "c", "audience": "staff" }));
}

// =============================================================
// Subjects
// =============================================================

fn subjects() -> Vec<Subject> {
    serde_json::from_value(json!([
        { "id": 1, "name": "Data Structures", "subject_code": "CS201", "department": "CSE", "semester": 3,
          "syllabus": { "pdf_url": "https://cdn/ds.pdf" } },
        { "id": 2, "subject": "Digital Logic", "code": "EC101", "department": "ECE", "semester": "1" },
        { "id": 3, "name": "Operating Systems", "subject_code": "CS301", "department": "CSE", "semester": 5,
          "pdf_url": "" },
    ]))
    .unwrap()
}

#[test]
fn subject_decoding_normalizes_field_variants() {
    let subjects = subjects();
    assert_eq!(subjects[0].code, "CS201");
    assert_eq!(subjects[0].semester, "3");
    assert_eq!(subjects[0].pdf_url.as_deref(), Some("https://cdn/ds.pdf"));
    assert_eq!(subjects[1].name, "Digital Logic");
    assert_eq!(subjects[1].code, "EC101");
    assert_eq!(subjects[1].semester, "1");
    assert_eq!(subjects[2].pdf_url, None);
}

#[test]
fn subject_filter_combines_department_semester_and_search() {
    let subjects = subjects();
    let by_dept = SubjectFilter { department: Some("CSE".to_owned()), ..SubjectFilter::default() };
    assert_eq!(filter_subjects(&subjects, &by_dept).len(), 2);

    let by_sem = SubjectFilter { semester: Some("5".to_owned()), ..by_dept.clone() };
    assert_eq!(filter_subjects(&subjects, &by_sem)[0].name, "Operating Systems");

    let search = SubjectFilter { search: "  DATA ".to_owned(), ..SubjectFilter::default() };
    assert_eq!(filter_subjects(&subjects, &search)[0].code, "CS201");
}

#[test]
fn pdf_url_check_requires_scheme_and_extension() {
    assert!(is_pdf_url("https://cdn.college.edu/os.PDF"));
    assert!(!is_pdf_url("ftp://cdn/os.pdf"));
    assert!(!is_pdf_url("https://cdn/os.docx"));
}

// =============================================================
// Members
// =============================================================

fn members() -> Vec<Member> {
    serde_json::from_value(json!([
        { "id": 1, "student_id": "S-100", "department": "CSE",
          "user": { "first_name": "Asha", "last_name": "Rao", "email": "asha@college.edu", "is_active": true } },
        { "id": 2, "staff_id": "T-7", "department": "IT", "designation": "Professor",
          "user": { "first_name": "Ravi", "last_name": "Kumar", "email": "ravi@college.edu", "is_active": false } },
        { "id": 3, "staff_id": "T-8", "department": "CSE", "designation": "Lecturer",
          "user": { "first_name": "Meena", "last_name": "Iyer", "email": "meena@college.edu" } },
    ]))
    .unwrap()
}

#[test]
fn member_id_accepts_student_and_staff_keys() {
    let members = members();
    assert_eq!(members[0].member_id, "S-100");
    assert_eq!(members[1].member_id, "T-7");
}

#[test]
fn member_status_filter_ignores_unknown_activity() {
    let members = members();
    let active = MemberFilter { status: MemberStatus::Active, ..MemberFilter::default() };
    assert_eq!(filter_members(&members, &active).len(), 1);
    let inactive = MemberFilter { status: MemberStatus::Inactive, ..MemberFilter::default() };
    assert_eq!(filter_members(&members, &inactive)[0].member_id, "T-7");
}

#[test]
fn member_search_matches_name_id_or_email() {
    let members = members();
    let by_name = MemberFilter { search: "asha rao".to_owned(), ..MemberFilter::default() };
    assert_eq!(filter_members(&members, &by_name).len(), 1);
    let by_id = MemberFilter { search: "t-8".to_owned(), ..MemberFilter::default() };
    assert_eq!(filter_members(&members, &by_id)[0].user.first_name, "Meena");
    let by_email = MemberFilter { search: "RAVI@".to_owned(), ..MemberFilter::default() };
    assert_eq!(filter_members(&members, &by_email).len(), 1);
}

#[test]
fn member_department_and_designation_filters() {
    let members = members();
    let filter = MemberFilter {
        department: Some("CSE".to_owned()),
        designation: Some("Lecturer".to_owned()),
        ..MemberFilter::default()
    };
    let found = filter_members(&members, &filter);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].member_id, "T-8");
}

#[test]
fn member_status_parse_accepts_ui_and_boolean_forms() {
    assert_eq!(MemberStatus::parse("active"), Some(MemberStatus::Active));
    assert_eq!(MemberStatus::parse("false"), Some(MemberStatus::Inactive));
    assert_eq!(MemberStatus::parse("ALL"), Some(MemberStatus::All));
    assert_eq!(MemberStatus::parse("retired"), None);
}

#[test]
fn member_salary_accepts_decimal_string_or_number() {
    let staff: Vec<Member> = serde_json::from_value(json!([
        { "id": 1, "staff_id": "T-1", "salary": "52000.00", "phone": "98400", "user": { "id": 11 } },
        { "id": 2, "staff_id": "T-2", "salary": 61000 },
        { "id": 3, "staff_id": "T-3", "salary": null },
    ]))
    .unwrap();
    assert_eq!(staff[0].salary.as_deref(), Some("52000.00"));
    assert_eq!(staff[0].user.id, Some(RecordId::Int(11)));
    assert_eq!(staff[1].salary.as_deref(), Some("61000"));
    assert_eq!(staff[2].salary, None);
}

// =============================================================
// HODs
// =============================================================

fn hods() -> Vec<Hod> {
    serde_json::from_value(json!([
        { "id": 1, "staff_name": "Ravi Kumar", "staff_id": "T-7", "department_name": "CSE", "is_active": true },
        { "id": 2, "staff_name": "Meena Iyer", "staff_id": "T-8", "department": "ECE", "is_active": false },
    ]))
    .unwrap()
}

#[test]
fn hod_department_filter_ignores_case() {
    let hods = hods();
    let filter = HodFilter { department: Some("cse".to_owned()), ..HodFilter::default() };
    let found = filter_hods(&hods, &filter);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].staff_id, "T-7");
}

#[test]
fn hod_status_and_search_filters() {
    let hods = hods();
    let inactive = HodFilter { status: MemberStatus::Inactive, ..HodFilter::default() };
    assert_eq!(filter_hods(&hods, &inactive)[0].department_name, "ECE");
    let search = HodFilter { search: "meena".to_owned(), ..HodFilter::default() };
    assert_eq!(filter_hods(&hods, &search)[0].staff_id, "T-8");
    assert_eq!(filter_hods(&hods, &HodFilter::default()).len(), 2);
}
