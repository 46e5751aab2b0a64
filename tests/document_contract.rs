//! Purpose: Lock document-model contract expectations with corpus and
//! differential coverage.
//! Exports: Integration tests only (no runtime exports).
//! Role: Catch semantic drift between this crate's parser/serializer and the
//! serde_json baseline, and pin navigation/accessor behavior end to end.
//! Invariants: Differential checks assert structural parity, not byte parity
//! (member order and number formatting may differ from the baseline).
//! Invariants: Round-trip checks use stringify output, which is canonical and
//! deterministic.

use junco::{Document, Kind};

const SAMPLE: &str = r#"{"index":0,"_id":"54c7fff8e3268528239d9cb1","guid":"b4940c5c-82ee-4f5e-bd02-f847fe2b9fc6","isActive":true,"balance":"$1,750.21","details":{"age":36,"eyeColor":"brown","longitude":102.563977},"registered":"2014-10-12T09:38:08 +07:00","latitude":-59.816976,"tags":["nisi","sint","aute","tempor","sit","esse","in"],"friends":[{"id":0,"name":"Case Gross"},{"id":1,"name":"Gilbert Rasmussen"},{"id":2,"name":"Harris Huff"}]}"#;

fn parse(input: &str) -> Document {
    Document::parse(input).expect("input must parse")
}

fn assert_structural_parity(input: &str) {
    let doc = parse(input);
    let rendered = doc.root().stringify_at(&[]).expect("root stringifies");
    let ours: serde_json::Value = serde_json::from_str(&rendered).expect("output is valid json");
    let baseline: serde_json::Value = serde_json::from_str(input).expect("baseline parses");
    assert_eq!(ours, baseline, "structural mismatch for {input:?}");
}

#[test]
fn corpus_matches_serde_baseline() {
    let corpus = [
        r#"{"a":1,"b":"ok"}"#,
        r#"[1,2,3,{"x":true}]"#,
        r#"{"nested":{"arr":[{"k":"v"}]}}"#,
        r#"{"unicode":"☃"}"#,
        r#"{"esc":"line\nbreak\tand \"quotes\""}"#,
        r#"[null,true,false,-1,0.5,1e3]"#,
        r#"{"n":18446744073709551615}"#,
        SAMPLE,
    ];

    for case in corpus {
        assert_structural_parity(case);
    }
}

#[test]
fn round_trip_is_semantically_idempotent() {
    for input in [SAMPLE, r#"{"a":{"b":[1,2,3]},"c":"x"}"#, "[2.0,-7,\"s\"]"] {
        let first = parse(input).root().stringify_at(&[]).expect("stringify");
        let second = parse(&first).root().stringify_at(&[]).expect("re-stringify");
        assert_eq!(first, second, "round trip drifted for {input:?}");
    }
}

#[test]
fn sample_navigation_and_accessors() {
    let doc = parse(SAMPLE);
    let root = doc.root();

    assert_eq!(root.int_at(&["index"]), Some(0));
    assert_eq!(root.uint_at(&["index"]), Some(0));
    assert_eq!(root.str_at(&["_id"]), Some("54c7fff8e3268528239d9cb1"));
    assert_eq!(root.bool_at(&["isActive"]), Some(true));
    assert_eq!(root.double_at(&["latitude"]), Some(-59.816976));

    assert_eq!(root.int_at(&["details", "age"]), Some(36));
    assert_eq!(root.str_at(&["details", "eyeColor"]), Some("brown"));
    assert_eq!(root.double_at(&["details", "longitude"]), Some(102.563977));

    let tags = root.array_at(&["tags"]).expect("tags is an array");
    let expected = ["nisi", "sint", "aute", "tempor", "sit", "esse", "in"];
    assert_eq!(tags.len(), expected.len());
    for (tag, want) in tags.iter().zip(expected) {
        assert_eq!(tag.str_at(&[]), Some(want));
    }

    let friends = root.array_at(&["friends"]).expect("friends is an array");
    assert_eq!(friends.len(), 3);
    assert_eq!(friends[1].str_at(&["name"]), Some("Gilbert Rasmussen"));
    assert_eq!(friends[2].uint_at(&["id"]), Some(2));
}

#[test]
fn nested_path_walkthrough() {
    let doc = parse(r#"{"a":{"b":[1,2,3]},"c":"x"}"#);
    let root = doc.root();

    let items = root.array_at(&["a", "b"]).expect("a.b is an array");
    assert_eq!(items.len(), 3);
    let got: Vec<i64> = items.iter().map(|v| v.int_at(&[]).expect("int")).collect();
    assert_eq!(got, vec![1, 2, 3]);

    assert_eq!(root.str_at(&["c"]), Some("x"));
    assert!(root.get(&["z"]).is_none());
}

#[test]
fn kinds_cover_all_six_categories() {
    let doc = parse(r#"{"b":true,"n":null,"a":[],"s":"","o":{},"i":1,"d":1.5}"#);
    let root = doc.root();
    assert_eq!(root.kind_at(&["b"]), Some(Kind::Bool));
    assert_eq!(root.kind_at(&["n"]), Some(Kind::Null));
    assert_eq!(root.kind_at(&["a"]), Some(Kind::Array));
    assert_eq!(root.kind_at(&["s"]), Some(Kind::String));
    assert_eq!(root.kind_at(&["o"]), Some(Kind::Object));
    assert_eq!(root.kind_at(&["i"]), Some(Kind::Number));
    assert_eq!(root.kind_at(&["d"]), Some(Kind::Number));
    assert_eq!(root.kind_at(&["missing"]), None);
}

#[test]
fn no_coercion_between_number_tags() {
    let doc = parse(r#"{"i":3,"m":-3,"d":3.0,"e":3e0}"#);
    let root = doc.root();

    // Integer literals never satisfy the double accessor.
    assert_eq!(root.double_at(&["i"]), None);
    assert_eq!(root.double_at(&["m"]), None);
    assert_eq!(root.int_at(&["i"]), Some(3));
    assert_eq!(root.uint_at(&["i"]), Some(3));

    // Fraction/exponent literals never satisfy the integer accessors.
    assert_eq!(root.double_at(&["d"]), Some(3.0));
    assert_eq!(root.double_at(&["e"]), Some(3.0));
    assert_eq!(root.int_at(&["d"]), None);
    assert_eq!(root.uint_at(&["e"]), None);
}

#[test]
fn duplicate_keys_first_wins_for_lookup() {
    let doc = parse(r#"{"a":1,"a":2,"b":3}"#);
    let root = doc.root();
    assert_eq!(root.uint_at(&["a"]), Some(1));

    let members = root.object_at(&[]).expect("object");
    let keys: Vec<&str> = members.iter().map(|(key, _)| *key).collect();
    assert_eq!(keys, vec!["a", "a", "b"]);
}

#[test]
fn big_numbers_agree_with_baseline_where_both_accept() {
    assert_structural_parity(r#"{"n":18446744073709551615}"#);

    // Above u64 range this parser widens to double while the baseline keeps
    // arbitrary precision; both still accept the document.
    let doc = parse(r#"{"n":18446744073709551616}"#);
    assert_eq!(doc.root().uint_at(&["n"]), None);
    assert_eq!(doc.root().double_at(&["n"]), Some(18446744073709551616.0));

    // Doubles beyond representation fail here and in the baseline.
    assert!(Document::parse(r#"{"n":1e309}"#).is_err());
    assert!(serde_json::from_str::<serde_json::Value>(r#"{"n":1e309}"#).is_err());
}
