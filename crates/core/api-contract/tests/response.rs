use api_contract::ErrorBody;

#[test]
fn error_body_shape() {
    let body = ErrorBody::new("RESOURCE.NOT_FOUND", "device not registered");
    let value = serde_json::to_value(body).expect("serialize");

    let error = value.get("error").expect("error key");
    assert_eq!(
        error.get("code").and_then(serde_json::Value::as_str),
        Some("RESOURCE.NOT_FOUND")
    );
    assert_eq!(
        error.get("message").and_then(serde_json::Value::as_str),
        Some("device not registered")
    );
}
