use super::*;

#[test]
fn every_role_links_to_its_home_and_profile() {
    for role in Role::ALL {
        let links = nav_links(role);
        assert_eq!(links[0].0, role.home_path());
        assert!(links.iter().any(|(href, _)| *href == "/profile"));
    }
}

#[test]
fn only_admin_sees_directories() {
    let has_directory = |role| nav_links(role).iter().any(|(href, _)| href.starts_with("/admin/"));
    assert!(has_directory(Role::Admin));
    assert!(!has_directory(Role::Staff));
    assert!(!has_directory(Role::Student));
}

#[test]
fn admin_nav_reaches_every_directory() {
    let hrefs: Vec<&str> = nav_links(Role::Admin).iter().map(|(href, _)| *href).collect();
    for directory in ["/admin/students", "/admin/staff", "/admin/hods"] {
        assert!(hrefs.contains(&directory), "missing {directory}");
    }
}
