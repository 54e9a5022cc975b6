use domain::{AttrMap, AttrValue};

#[test]
fn attr_value_deserializes_untagged() {
    let value: AttrValue = serde_json::from_str("true").expect("bool");
    assert_eq!(value, AttrValue::Bool(true));

    let value: AttrValue = serde_json::from_str("42.5").expect("number");
    assert_eq!(value, AttrValue::Number(42.5));

    let value: AttrValue = serde_json::from_str(r#""reboot""#).expect("string");
    assert_eq!(value, AttrValue::String("reboot".to_string()));
}

#[test]
fn attr_map_round_trips_nested_actions() {
    let payload = r#"{"reboot":true,"set_volume":{"volume":80.0}}"#;
    let map: AttrMap = serde_json::from_str(payload).expect("parse");

    assert_eq!(map.get("reboot"), Some(&AttrValue::Bool(true)));
    let AttrValue::Map(params) = map.get("set_volume").expect("params") else {
        panic!("expected nested map");
    };
    assert_eq!(params.get("volume"), Some(&AttrValue::Number(80.0)));

    let encoded = serde_json::to_string(&map).expect("serialize");
    let decoded: AttrMap = serde_json::from_str(&encoded).expect("reparse");
    assert_eq!(decoded, map);
}
