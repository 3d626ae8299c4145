use super::*;

fn user(value: serde_json::Value) -> UserProfile {
    serde_json::from_value(value).unwrap()
}

#[test]
fn base_rows_always_present() {
    let u = user(serde_json::json!({ "id": 1, "email": "a@college.edu", "role": "admin" }));
    assert_eq!(
        profile_rows(&u),
        [("Name", "a@college.edu".to_owned()), ("Email", "a@college.edu".to_owned()), ("Role", "admin".to_owned())]
    );
}

#[test]
fn staff_profile_fields_are_appended_in_order() {
    let u = user(serde_json::json!({
        "id": 2,
        "email": "r@college.edu",
        "first_name": "Ravi",
        "last_name": "Kumar",
        "role": "staff",
        "staff_profile": { "designation": "Professor", "staff_id": "T-7", "phone": "", "salary": 10 },
    }));
    let rows = profile_rows(&u);
    assert_eq!(rows[0], ("Name", "Ravi Kumar".to_owned()));
    assert_eq!(&rows[3..], [("Staff ID", "T-7".to_owned()), ("Designation", "Professor".to_owned())]);
}
