use super::*;

fn state() -> SyllabusState {
    SyllabusState {
        items: serde_json::from_value(serde_json::json!([
            { "id": 1, "name": "Compilers", "code": "CS402", "department": "CSE", "semester": 7 },
            { "id": 2, "name": "Signals", "code": "EC204", "department": "ECE", "semester": 4 },
            { "id": 3, "name": "Networks", "code": "CS305", "department": "CSE", "semester": 5 },
        ]))
        .unwrap(),
        ..SyllabusState::default()
    }
}

#[test]
fn departments_are_sorted_and_distinct() {
    assert_eq!(state().departments(), ["CSE", "ECE"]);
}

#[test]
fn visible_applies_filter() {
    let mut state = state();
    state.filter.department = Some("CSE".to_owned());
    state.filter.search = "net".to_owned();
    let visible = state.visible();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].code, "CS305");
}

#[test]
fn subject_form_uppercases_code_and_checks_semester() {
    let form = SubjectForm {
        name: " Compilers ".to_owned(),
        code: "cs402".to_owned(),
        department: "CSE".to_owned(),
        semester: "7".to_owned(),
    };
    let draft = form.to_draft().unwrap();
    assert_eq!(draft.subject_code, "CS402");
    assert_eq!(draft.name, "Compilers");
    assert_eq!(draft.semester, 7);

    let out_of_range = SubjectForm { semester: "9".to_owned(), ..form.clone() };
    assert_eq!(out_of_range.to_draft(), Err("Semester must be between 1 and 8."));
    let blank = SubjectForm { department: String::new(), ..form };
    assert_eq!(blank.to_draft(), Err("Name, code and department are required."));
}

#[test]
fn pdf_url_validation_trims() {
    assert_eq!(validate_pdf_url(" https://cdn/x.pdf "), Ok("https://cdn/x.pdf".to_owned()));
    assert!(validate_pdf_url("https://cdn/x.doc").is_err());
}
