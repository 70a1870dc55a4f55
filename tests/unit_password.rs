use axum::http::StatusCode;
use schoolhub_core::password::{hash_password_with_cost, verify_password};

const TEST_COST: u32 = 4;

#[test]
fn test_hash_password_success() {
    let password = "testpassword123";
    let hash = hash_password_with_cost(password, TEST_COST).unwrap();

    assert!(!hash.is_empty());
    assert_ne!(hash, password);
    assert!(hash.starts_with("$2"));
}

#[test]
fn test_hash_password_is_salted() {
    let first = hash_password_with_cost("samepassword", TEST_COST).unwrap();
    let second = hash_password_with_cost("samepassword", TEST_COST).unwrap();

    assert_ne!(first, second);
    assert!(verify_password("samepassword", &first).unwrap());
    assert!(verify_password("samepassword", &second).unwrap());
}

#[test]
fn test_verify_password_correct() {
    let hash = hash_password_with_cost("correctpassword", TEST_COST).unwrap();

    assert!(verify_password("correctpassword", &hash).unwrap());
}

#[test]
fn test_verify_password_incorrect() {
    let hash = hash_password_with_cost("correctpassword", TEST_COST).unwrap();

    assert!(!verify_password("wrongpassword", &hash).unwrap());
    assert!(!verify_password("CorrectPassword", &hash).unwrap());
}

#[test]
fn test_verify_password_unicode() {
    let password = "пароль密码🔒";
    let hash = hash_password_with_cost(password, TEST_COST).unwrap();

    assert!(verify_password(password, &hash).unwrap());
}

#[test]
fn test_verify_password_invalid_hash() {
    let err = verify_password("password", "not_a_bcrypt_hash").unwrap_err();

    assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_invalid_cost_is_an_error() {
    assert!(hash_password_with_cost("password", 2).is_err());
}
