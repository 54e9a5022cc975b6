use signage_auth::{hash_password, verify_password};

#[test]
fn hash_then_verify_round_trips() {
    let hash = hash_password("correct horse battery staple").expect("hash");
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password(&hash, "correct horse battery staple").expect("verify"));
    assert!(!verify_password(&hash, "wrong password").expect("verify"));
}

#[test]
fn hashes_are_salted() {
    let first = hash_password("password123").expect("hash");
    let second = hash_password("password123").expect("hash");
    assert_ne!(first, second);
}

#[test]
fn malformed_hash_is_internal_error() {
    assert!(verify_password("plaintext", "plaintext").is_err());
}
