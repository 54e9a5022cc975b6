use domain::{Role, UserContext, device_name};

#[test]
fn user_context_builds() {
    let ctx = UserContext::new("user-1", "admin@acme.fr", Role::Admin, Some("site-1".to_string()));

    assert_eq!(ctx.user_id, "user-1");
    assert_eq!(ctx.email, "admin@acme.fr");
    assert_eq!(ctx.role, Role::Admin);
    assert_eq!(ctx.site_id.as_deref(), Some("site-1"));
}

#[test]
fn role_ordering_is_explicit() {
    assert!(Role::SuperAdmin.at_least(Role::Admin));
    assert!(Role::SuperAdmin.at_least(Role::SuperAdmin));
    assert!(Role::Admin.at_least(Role::Admin));
    assert!(!Role::Admin.at_least(Role::SuperAdmin));
}

#[test]
fn role_round_trips_codes() {
    assert_eq!("admin".parse::<Role>().expect("parse"), Role::Admin);
    assert_eq!("superadmin".parse::<Role>().expect("parse"), Role::SuperAdmin);
    assert_eq!(Role::Admin.as_str(), "admin");
    assert_eq!(Role::SuperAdmin.as_str(), "superadmin");
    assert!("root".parse::<Role>().is_err());
}

#[test]
fn device_name_composes_site_and_location() {
    assert_eq!(device_name("acme", "lobby"), "acme-lobby");
    // 按名查找路径必须与注册路径得到同一个键
    assert_eq!(device_name("acme", "lobby"), device_name("acme", "lobby"));
}
