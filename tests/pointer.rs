use chisel_dom::pointer::classify_segments;
use chisel_dom::{Details, ErrorKind, JsonValue, Pointer};
use test_case::test_case;

fn document() -> JsonValue {
    JsonValue::parse(
        r#"{
            "n": -12345.6,
            "list": [32, "ABC", {"deep": [null, {"x": "found"}]}],
            "a/b": 1,
            "m~n": 2,
            "": 3,
            "10": "ten"
        }"#,
    )
    .unwrap()
}

#[test]
fn should_resolve_nested_elements() {
    let doc = document();
    assert_eq!(doc.at(&Pointer::new("/list/1")).unwrap().get::<&str>(), "ABC");
    assert_eq!(
        doc.at(&Pointer::new("/list/2/deep/1/x")).unwrap(),
        &JsonValue::from("found")
    );
}

#[test]
fn the_empty_pointer_should_address_the_root() {
    let doc = document();
    assert_eq!(doc.at(&Pointer::new("")).unwrap(), &doc);
    assert_eq!(doc[&Pointer::default()], doc);
}

#[test_case("/a~1b", 1; "escaped solidus")]
#[test_case("/m~0n", 2; "escaped tilde")]
#[test_case("/", 3; "empty key")]
fn should_unescape_reference_tokens(text: &str, expected: i64) {
    assert_eq!(document().at(&Pointer::new(text)).unwrap().get::<i64>(), expected);
}

#[test]
fn pointers_should_agree_with_manual_lookups() {
    let doc = document();
    let manual = doc
        .at("list")
        .and_then(|v| v.at(2))
        .and_then(|v| v.at("deep"))
        .and_then(|v| v.at(1))
        .unwrap();
    assert_eq!(doc.at(&Pointer::new("/list/2/deep/1")).unwrap(), manual);

    let mut built = Pointer::default();
    built.push_name("list");
    built.push_index(2);
    built.push_name("deep");
    built.push_index(1);
    assert_eq!(built.as_str(), "/list/2/deep/1");
    assert_eq!(doc.at(&built).unwrap(), manual);
}

#[test_case("list/1", Details::InvalidPointer("list/1".to_string()); "no leading separator")]
#[test_case("/nope", Details::KeyNotFound("nope".to_string()); "absent key")]
#[test_case("/list/3", Details::IndexOutOfRange(3); "index out of range")]
#[test_case("/10", Details::NotAnArray; "digits against a map")]
#[test_case("/n/0", Details::NotAnArray; "index into a float")]
#[test_case("/list/first", Details::NotAMap; "name into an array")]
fn should_report_range_errors(text: &str, details: Details) {
    let err = document().at(&Pointer::new(text)).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Range);
    assert_eq!(err.details, details);
    assert!(err.coords.is_none());
}

#[test]
fn indexing_should_yield_null_on_failure() {
    let doc = document();
    assert!(doc[&Pointer::new("/list/2/deep/7")].is_null());
    assert!(doc[&Pointer::new("/10")].is_null());
    assert_eq!(doc[&Pointer::new("/list/0")], JsonValue::Int(32));
}

#[test]
fn mutable_resolution_should_modify_in_place() {
    let mut doc = document();
    *doc.at_mut(&Pointer::new("/list/2/deep/0")).unwrap() = JsonValue::from("filled");
    assert_eq!(doc["list"][2]["deep"][0].get::<&str>(), "filled");
    let before = doc.clone();
    assert!(doc.at_mut(&Pointer::new("/list/9")).is_err());
    assert_eq!(doc, before);
}

#[test]
fn classification_should_be_available_on_its_own() {
    let tokens = vec!["12".to_string(), "12.5".to_string(), "x/y".to_string()];
    assert_eq!(
        classify_segments(&tokens).unwrap(),
        vec![
            JsonValue::Int(12),
            JsonValue::from("12.5"),
            JsonValue::from("x/y")
        ]
    );
}
