use super::*;

#[test]
fn failures_are_reported_for_write_and_remove() {
    assert!(warn_on_failure(Err::<(), _>("QuotaExceededError"), "write", "user"));
    assert!(warn_on_failure(Err::<(), _>("SecurityError"), "remove", "accessToken"));
    assert!(!warn_on_failure(Ok::<(), &str>(()), "remove", "accessToken"));
}

#[test]
fn outside_the_browser_nothing_is_kept() {
    let store = LocalStore;
    store.set("accessToken", "A");
    store.remove("accessToken");
    assert_eq!(store.get("accessToken"), None);
}
