//! End-to-end tests across the cursor, emitter, reconciler, and serde
//! binding surfaces.

use serde::{Deserialize, Serialize};
use serde_hocon::{
    emit_value, from_value, from_value_with_options, to_string, to_string_with_options,
    ConfigObject, ConfigValue, DeserializeOptions, EmitOptions, Emitter, Error, NullPolicy, Token,
    TreeCursor,
};

fn object(pairs: Vec<(&str, ConfigValue)>) -> ConfigValue {
    let mut obj = ConfigObject::new();
    for (key, value) in pairs {
        obj.insert(key.to_string(), value);
    }
    obj.into()
}

fn sample_tree() -> ConfigValue {
    object(vec![
        ("name", "gateway".into()),
        (
            "server",
            object(vec![
                ("host", "0.0.0.0".into()),
                ("port", 8080i64.into()),
                ("tls", false.into()),
            ]),
        ),
        (
            "limits",
            vec![10i64.into(), 100i64.into(), 1000i64.into()].into(),
        ),
    ])
}

#[test]
fn cursor_token_stream_matches_tree_shape() {
    let tree = sample_tree();
    let tokens: Vec<Token> = TreeCursor::new(&tree).collect();
    assert_eq!(
        tokens,
        vec![
            Token::StartObject,
            Token::FieldName("name"),
            Token::Str("gateway"),
            Token::FieldName("server"),
            Token::StartObject,
            Token::FieldName("host"),
            Token::Str("0.0.0.0"),
            Token::FieldName("port"),
            Token::Int(8080),
            Token::FieldName("tls"),
            Token::Bool(false),
            Token::EndObject,
            Token::FieldName("limits"),
            Token::StartArray,
            Token::Int(10),
            Token::Int(100),
            Token::Int(1000),
            Token::EndArray,
            Token::EndObject,
        ]
    );
}

#[test]
fn skip_children_jumps_over_a_subtree() {
    let tree = sample_tree();
    let mut cursor = TreeCursor::new(&tree);
    // Advance to the `server` object start.
    loop {
        match cursor.next_token() {
            Some(Token::StartObject) if cursor.current_name() == Some("server") => break,
            Some(_) => continue,
            None => panic!("server object not found"),
        }
    }
    cursor.skip_children();
    assert_eq!(cursor.current_token(), Some(Token::EndObject));
    // The next entry after the skipped subtree is `limits`.
    assert_eq!(cursor.next_token(), Some(Token::FieldName("limits")));
}

#[test]
fn pipeline_tree_to_text() {
    let tree = sample_tree();
    assert_eq!(
        emit_value(&tree, &EmitOptions::default()).unwrap(),
        r#"{"name":"gateway","server":{"host":"0.0.0.0","port":8080,"tls":false},"limits":[10,100,1000]}"#
    );
    assert_eq!(
        emit_value(&tree, &EmitOptions::hocon()).unwrap(),
        "name: gateway\nserver {\n  host: \"0.0.0.0\"\n  port: 8080\n  tls: false\n}\nlimits: [10, 100, 1000]"
    );
}

#[test]
fn root_bracket_omission_keeps_nested_brackets() {
    let tree = sample_tree();
    let options = EmitOptions::new().with_omit_root_object_brackets(true);
    let text = emit_value(&tree, &options).unwrap();
    assert!(text.starts_with(r#""name""#), "no opening brace: {text}");
    assert!(
        text.contains(r#""server":{"host""#),
        "nested object must keep its braces: {text}"
    );
}

#[test]
fn manual_token_feed_equals_cursor_feed() {
    let tree = sample_tree();
    let mut emitter = Emitter::new(EmitOptions::default());
    let mut cursor = TreeCursor::new(&tree);
    while let Some(token) = cursor.next_token() {
        emitter.write_token(&token).unwrap();
    }
    assert_eq!(
        emitter.finish().unwrap(),
        emit_value(&tree, &EmitOptions::default()).unwrap()
    );
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Gateway {
    name: String,
    server: Server,
    limits: Vec<u32>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Server {
    host: String,
    port: u16,
    tls: bool,
}

#[test]
fn structural_round_trip_through_serde() {
    let gateway: Gateway = from_value(&sample_tree()).unwrap();
    assert_eq!(gateway.server.port, 8080);
    assert_eq!(gateway.limits, vec![10, 100, 1000]);

    let text = to_string(&gateway).unwrap();
    assert_eq!(text, emit_value(&sample_tree(), &EmitOptions::default()).unwrap());
}

#[test]
fn sparse_override_tree_binds_to_sequences() {
    // The shape produced by `limits.0 = 10` style overrides.
    let tree = object(vec![
        ("name", "gateway".into()),
        (
            "server",
            object(vec![
                ("host", "0.0.0.0".into()),
                ("port", 8080i64.into()),
                ("tls", false.into()),
            ]),
        ),
        (
            "limits",
            object(vec![
                ("2", 1000i64.into()),
                ("0", 10i64.into()),
                ("1", 100i64.into()),
            ]),
        ),
    ]);
    let gateway: Gateway = from_value(&tree).unwrap();
    assert_eq!(gateway.limits, vec![10, 100, 1000]);
}

#[test]
fn null_policies_through_the_binding() {
    let tree = object(vec![(
        "limits",
        object(vec![
            ("0", 10i64.into()),
            ("1", ConfigValue::synthetic(serde_hocon::ValueKind::Null)),
            ("2", 1000i64.into()),
        ]),
    )]);

    #[derive(Debug, Deserialize)]
    struct Limits {
        limits: Vec<i64>,
    }

    let skipped: Limits = from_value(&tree).unwrap();
    assert_eq!(skipped.limits, vec![10, 1000]);

    let substituted: Limits = from_value_with_options(
        &tree,
        DeserializeOptions::new().with_null_policy(NullPolicy::Substitute),
    )
    .unwrap();
    assert_eq!(substituted.limits, vec![10, 0, 1000]);

    let err = from_value_with_options::<Limits>(
        &tree,
        DeserializeOptions::new().with_null_policy(NullPolicy::Fail),
    )
    .unwrap_err();
    assert!(matches!(err, Error::NullElement { index: 1 }));
}

#[test]
fn conversion_failure_reports_the_source_key() {
    let tree = object(vec![("0", true.into()), ("1", "test".into())]);
    let err = from_value::<Vec<i32>>(&tree).unwrap_err();
    let message = err.to_string();
    assert!(
        message.contains("`0`") || message.contains("`1`"),
        "error should name the offending key: {message}"
    );
}

#[test]
fn always_quote_output_is_json_parseable() {
    let tree = sample_tree();
    let text = emit_value(&tree, &EmitOptions::default()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed["server"]["port"], serde_json::json!(8080));
}

#[test]
fn unquoted_output_only_where_safe() {
    let tree = object(vec![
        ("plain", "simple".into()),
        ("spaced", "two words".into()),
        ("numeric", "2fast".into()),
        ("comment", "a//b".into()),
        ("keyword", "null".into()),
    ]);
    let options = EmitOptions::new()
        .with_unquote_strings_if_possible(true)
        .with_omit_root_object_brackets(true);
    let text = emit_value(&tree, &options).unwrap();
    assert_eq!(
        text,
        r#"plain:simple,spaced:"two words",numeric:"2fast",comment:"a//b",keyword:"null""#
    );
}

#[test]
fn origin_travels_with_the_cursor() {
    let value = ConfigValue::from(8080i64)
        .with_origin(serde_hocon::Origin::new("application.conf", Some(12)));
    let tree = object(vec![("port", value)]);
    let mut cursor = TreeCursor::new(&tree);
    while let Some(token) = cursor.next_token() {
        if token == Token::Int(8080) {
            let origin = cursor.origin().expect("scalar has an origin");
            assert_eq!(origin.description(), "application.conf");
            assert_eq!(origin.line(), Some(12));
            return;
        }
    }
    panic!("port value not reached");
}

#[test]
fn whole_valued_floats_survive_a_json_round_trip() {
    #[derive(Serialize)]
    struct Metrics {
        ratio: f64,
    }
    let text = to_string(&Metrics { ratio: 2.0 }).unwrap();
    assert_eq!(text, r#"{"ratio":2.0}"#);
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert!(parsed["ratio"].is_f64());
    assert_eq!(parsed["ratio"].as_f64(), Some(2.0));
}

#[test]
fn writer_options_compose() {
    #[derive(Serialize)]
    struct App {
        profile: String,
        features: Vec<String>,
    }
    let app = App {
        profile: "prod".to_string(),
        features: vec!["auth".to_string(), "metrics".to_string()],
    };
    let options = EmitOptions::new()
        .with_omit_root_object_brackets(true)
        .with_omit_object_value_separator(true)
        .with_unquote_strings_if_possible(true)
        .with_field_value_separator('=')
        .with_pretty(true)
        .with_indent(4);
    let text = to_string_with_options(&app, options).unwrap();
    assert_eq!(text, "profile= prod\nfeatures= [auth, metrics]");
}
