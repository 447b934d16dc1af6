use jutil_core::{
    Command, CoercionType, Error, JsonOpts, Options, Request, WriteMode, add_key, execute,
    load_document, lookup, parse_path, save_document, set_key,
};
use proptest::prelude::*;
use serde_json::json;

fn run_on_file(
    src: &std::path::Path,
    cmd: Command,
    path: Option<&str>,
    value: Option<&str>,
    opts: &Options,
) -> Result<(), Error> {
    let req = Request::new(cmd, src, path, value.map(str::to_string), None)?;
    let mut doc = load_document(src)?;
    let out = execute(&mut doc, &req, opts)?;
    if let Some(text) = out.save {
        save_document(src, &text, opts.write_mode)?;
    }
    Ok(())
}

#[test]
fn set_existing_nested_value() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("data.json");
    std::fs::write(&src, r#"{"a":{"b":1}}"#).unwrap();
    run_on_file(&src, Command::Set, Some("a/b"), Some("2"), &Options::default()).unwrap();
    assert_eq!(load_document(&src).unwrap(), json!({"a": {"b": 2}}));
    let text = std::fs::read_to_string(&src).unwrap();
    assert!(text.ends_with("}\n"));
}

#[test]
fn add_creates_intermediate_objects() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("data.json");
    std::fs::write(&src, "{}").unwrap();
    run_on_file(&src, Command::Add, Some("x/y"), Some("hello"), &Options::default()).unwrap();
    assert_eq!(load_document(&src).unwrap(), json!({"x": {"y": "hello"}}));
}

#[test]
fn failed_replace_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("data.json");
    let original = r#"{"a":1}"#;
    std::fs::write(&src, original).unwrap();
    let err = run_on_file(&src, Command::Replace, Some("b"), Some("2"), &Options::default()).unwrap_err();
    assert!(matches!(err, Error::KeyNotFound { .. }), "{err}");
    assert_eq!(std::fs::read_to_string(&src).unwrap(), original);
}

#[test]
fn delete_then_get_reports_missing_key() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("data.json");
    std::fs::write(&src, r#"{"a":{"b":1,"c":2}}"#).unwrap();
    let opts = Options {
        write_mode: WriteMode::Atomic,
        ..Options::default()
    };
    run_on_file(&src, Command::Delete, Some("a.b"), None, &opts).unwrap();
    let err = run_on_file(&src, Command::Get, Some("a.b"), None, &opts).unwrap_err();
    assert!(matches!(err, Error::KeyNotFound { .. }));
    assert_eq!(load_document(&src).unwrap(), json!({"a": {"c": 2}}));
    // only the document itself remains after the atomic rename
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn validate_fails_on_malformed_text_before_path_logic() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("bad.json");
    std::fs::write(&src, "{\"a\": [1, 2,}").unwrap();
    let err = run_on_file(&src, Command::Validate, None, None, &Options::default()).unwrap_err();
    assert!(matches!(err, Error::JsonParse { .. }));
    let msg = err.to_string();
    assert!(msg.contains("bad.json"), "{msg}");
    assert!(msg.contains("line 1"), "{msg}");
}

#[test]
fn pretty_rewrites_with_custom_indent() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("data.json");
    std::fs::write(&src, r#"{"b":[1],"a":null}"#).unwrap();
    let opts = Options {
        json: JsonOpts {
            compact: false,
            indent: "  ".into(),
        },
        ..Options::default()
    };
    run_on_file(&src, Command::Pretty, None, None, &opts).unwrap();
    assert_eq!(
        std::fs::read_to_string(&src).unwrap(),
        "{\n  \"b\": [\n    1\n  ],\n  \"a\": null\n}\n"
    );
}

#[test]
fn dry_run_does_not_write() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("data.json");
    std::fs::write(&src, "{}").unwrap();
    let opts = Options {
        dry_run: true,
        ..Options::default()
    };
    run_on_file(&src, Command::Set, Some("k"), Some("1"), &opts).unwrap();
    assert_eq!(std::fs::read_to_string(&src).unwrap(), "{}");
}

#[test]
fn set_through_string_is_not_an_object() {
    let mut doc = json!({"a": "text"});
    let err = set_key(&mut doc, &parse_path("a/b").unwrap(), "1", None).unwrap_err();
    assert!(matches!(err, Error::NotAnObject { ref segment, .. } if segment == "a"));
    assert_eq!(err.exit_code(), 4);
}

#[test]
fn escaped_keys_are_addressable() {
    let mut doc = json!({"servers": {"example.com": {"port": 80}}});
    let p = parse_path("servers/example\\.com/port").unwrap();
    set_key(&mut doc, &p, "8080", None).unwrap();
    assert_eq!(doc["servers"]["example.com"]["port"], 8080);
}

fn segment() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_./-]{1,8}"
}

fn escape(seg: &str) -> String {
    seg.replace('.', "\\.").replace('/', "\\/")
}

proptest! {
    #[test]
    fn set_then_get_round_trips(
        segs in proptest::collection::vec(segment(), 1..5),
        raw in "[ -~]{0,24}",
    ) {
        let expr = segs.iter().map(|s| escape(s)).collect::<Vec<_>>().join("/");
        let p = parse_path(&expr).unwrap();
        prop_assert_eq!(p.segments(), &segs[..]);

        let mut doc = json!({});
        let stored = set_key(&mut doc, &p, &raw, Some(CoercionType::String)).unwrap();
        prop_assert_eq!(&stored, &json!(raw));
        prop_assert_eq!(lookup(&doc, &p).unwrap(), &stored);
    }

    #[test]
    fn non_json_text_is_stored_verbatim(key in "[a-z]{1,8}", raw in "[ -~]{0,16}") {
        prop_assume!(serde_json::from_str::<serde_json::Value>(&raw).is_err());
        let p = parse_path(&key).unwrap();
        let mut doc = json!({});
        let stored = set_key(&mut doc, &p, &raw, None).unwrap();
        prop_assert_eq!(&stored, &json!(raw));
        prop_assert_eq!(lookup(&doc, &p).unwrap(), &json!(raw));
    }

    #[test]
    fn add_on_absent_key_matches_set(
        segs in proptest::collection::vec("[a-z]{1,4}", 1..4),
        raw in "[ -~]{0,16}",
    ) {
        let p = parse_path(&segs.join("/")).unwrap();
        let mut added = json!({"Other": 1});
        let mut set = added.clone();
        let a = add_key(&mut added, &p, &raw, None);
        let s = set_key(&mut set, &p, &raw, None);
        prop_assert_eq!(a.is_ok(), s.is_ok());
        if let (Ok(a), Ok(s)) = (a, s) {
            prop_assert_eq!(a, s);
            prop_assert_eq!(added, set);
        }
    }
}

#[test]
fn replace_keeps_prior_type_without_override() {
    let mut doc = json!({"n": 3, "b": false, "s": "x"});
    for (path, raw) in [("n", "4.5"), ("b", "yes"), ("s", "17")] {
        let req = Request::new(Command::Replace, "doc.json", Some(path), Some(raw.into()), None).unwrap();
        execute(&mut doc, &req, &Options::default()).unwrap();
    }
    assert_eq!(doc, json!({"n": 4.5, "b": true, "s": "17"}));
}

#[test]
fn delete_of_absent_key_is_key_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("data.json");
    let original = r#"{"a":{"b":1}}"#;
    std::fs::write(&src, original).unwrap();
    let err = run_on_file(&src, Command::Delete, Some("a/c"), None, &Options::default()).unwrap_err();
    assert!(matches!(err, Error::KeyNotFound { ref key, .. } if key == "c"), "{err}");
    assert_eq!(std::fs::read_to_string(&src).unwrap(), original);
}
