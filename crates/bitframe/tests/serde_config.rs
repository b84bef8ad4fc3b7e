#![cfg(feature = "serde")]

use bitframe::{
    CompileError, Decoded, FieldType, Frame, Value,
    serde::FrameDef,
};

fn frame_from_json(json: &str) -> Result<Frame, CompileError> {
    let def: FrameDef = serde_json::from_str(json).unwrap();
    Frame::try_from(def)
}

#[test]
fn test_frame_from_json() {
    let frame = frame_from_json(
        r#"{
            "fields": [
                { "kind": "Fixed", "tag": "header", "len_bits": 8, "field_type": "Str" },
                { "kind": "Fixed", "tag": "len", "len_bits": 8 },
                { "kind": "Variable", "tag": "payload", "length": { "from": "len", "unit_bits": 8 } },
                {
                    "kind": "Repeat", "tag": "pairs", "count": 2,
                    "field": {
                        "kind": "Combine", "tag": "pair",
                        "fields": [
                            { "kind": "Fixed", "tag": "a", "len_bits": 4 },
                            { "kind": "Fixed", "tag": "b", "len_bits": 4 }
                        ]
                    }
                }
            ]
        }"#,
    )
    .unwrap();

    assert_eq!(
        frame.get("header").and_then(|f| f.field_type()),
        Some(FieldType::Str)
    );

    let decoded = frame.decode(&[0x68, 0x02, 0xCA, 0xFE, 0x12, 0x34]).unwrap();
    assert_eq!(
        decoded.get("payload"),
        Some(&Decoded::new(Value::Scalar(0xCAFE), 16))
    );

    let pairs = decoded.get("pairs").unwrap().value.entries().unwrap();
    assert_eq!(pairs[1].value.get("a"), Some(&Decoded::new(Value::Scalar(3), 4)));
    assert_eq!(decoded.total_bits(), 48);
}

#[test]
fn test_unit_bits_defaults_to_one() {
    let frame = frame_from_json(
        r#"{ "fields": [
            { "kind": "Fixed", "tag": "n", "len_bits": 4 },
            { "kind": "Variable", "tag": "bits", "length": { "from": "n" } }
        ] }"#,
    )
    .unwrap();

    let decoded = frame.decode(&[0b0011_1010]).unwrap();
    assert_eq!(decoded.get("bits"), Some(&Decoded::new(Value::Scalar(0b101), 3)));
}

#[test]
fn test_variable_without_length_is_rejected() {
    let err = frame_from_json(r#"{ "fields": [ { "kind": "Variable", "tag": "v" } ] }"#)
        .unwrap_err();
    assert_eq!(
        err,
        CompileError::MissingLengthResolver {
            tag: "v".to_string()
        }
    );
}

#[test]
fn test_forward_reference_is_rejected() {
    let err = frame_from_json(
        r#"{ "fields": [
            { "kind": "Variable", "tag": "v", "length": { "from": "len", "unit_bits": 8 } },
            { "kind": "Fixed", "tag": "len", "len_bits": 8 }
        ] }"#,
    )
    .unwrap_err();
    assert_eq!(
        err,
        CompileError::UnresolvedDependency {
            tag: "v".to_string(),
            dependency: "len".to_string()
        }
    );
}
