use super::*;

fn field(id: &str) -> FormFieldDescriptor {
    FormFieldDescriptor {
        id: id.to_string(),
        tag_name: "input".to_string(),
        field_type: "text".to_string(),
        name: "email".to_string(),
        label: "Email address".to_string(),
        placeholder: String::new(),
        autocomplete: "email".to_string(),
        options: Vec::new(),
    }
}

#[test]
fn test_message_tags_on_wire() {
    let cases = [
        (AutofillMessage::StartAutofill, "START_AUTOFILL"),
        (AutofillMessage::ScanAndFill, "SCAN_AND_FILL"),
        (
            AutofillMessage::AutofillRequest { fields: vec![] },
            "AUTOFILL_REQUEST",
        ),
        (
            AutofillMessage::AutofillResponse {
                mapping: FieldMapping::new(),
            },
            "AUTOFILL_RESPONSE",
        ),
        (
            AutofillMessage::result(AutofillOutcome::filled(2)),
            "AUTOFILL_RESULT",
        ),
    ];

    for (message, tag) in cases {
        assert_eq!(message.tag(), tag);
        let value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&message).unwrap()).unwrap();
        assert_eq!(value["type"], tag);
    }
}

#[test]
fn test_descriptor_wire_names_are_camel_case() {
    let json = serde_json::to_value(field("f1")).unwrap();
    assert_eq!(json["tagName"], "input");
    assert_eq!(json["type"], "text");
    assert_eq!(json["label"], "Email address");
    assert!(json.get("tag_name").is_none());
}

#[test]
fn test_result_message_wire_shape() {
    let json =
        serde_json::to_value(AutofillMessage::result(AutofillOutcome::filled(3))).unwrap();
    assert_eq!(json["filledCount"], 3);
    assert_eq!(json["success"], true);
    // Error is omitted, not null, on success.
    assert!(json.get("error").is_none());

    let json = serde_json::to_value(AutofillMessage::result(AutofillOutcome::failed("boom")))
        .unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "boom");
}

#[test]
fn test_round_trip() {
    let message = AutofillMessage::AutofillRequest {
        fields: vec![field("f1"), field("__autofill_field_0")],
    };
    let raw = serde_json::to_string(&message).unwrap();
    let back: AutofillMessage = serde_json::from_str(&raw).unwrap();
    assert_eq!(back, message);
}

#[test]
fn test_unknown_tag_is_refused() {
    let raw = r#"{"type":"SELF_DESTRUCT"}"#;
    assert!(serde_json::from_str::<AutofillMessage>(raw).is_err());
}

#[test]
fn test_absent_mapping_key_means_untouched() {
    let raw = r#"{"type":"AUTOFILL_RESPONSE","mapping":{"a":"1"}}"#;
    let message: AutofillMessage = serde_json::from_str(raw).unwrap();
    let AutofillMessage::AutofillResponse { mapping } = message else {
        panic!("wrong variant");
    };
    assert_eq!(mapping.get("a").map(String::as_str), Some("1"));
    assert!(mapping.get("b").is_none());
}

#[test]
fn test_outcome_constructors() {
    let ok = AutofillOutcome::filled(4);
    assert!(ok.success);
    assert_eq!(ok.filled_count, 4);
    assert!(ok.error.is_none());

    let failed = AutofillOutcome::failed("no active browser tab found");
    assert!(!failed.success);
    assert_eq!(failed.filled_count, 0);
    assert_eq!(failed.error.as_deref(), Some("no active browser tab found"));
}

#[test]
fn test_into_outcome() {
    let outcome = AutofillMessage::result(AutofillOutcome::filled(1))
        .into_outcome()
        .unwrap();
    assert_eq!(outcome, AutofillOutcome::filled(1));
    assert!(AutofillMessage::ScanAndFill.into_outcome().is_none());
}
