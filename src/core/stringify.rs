// Compact canonical JSON writer. Renders any subtree to an independent
// caller-owned string; escaping covers quotes, backslashes, and control bytes.
use crate::core::value::{Document, Member, Value};

pub(crate) fn to_compact_string(doc: &Document, node: &Value) -> String {
    let mut out = String::new();
    write_value(doc, node, &mut out);
    out
}

fn write_value(doc: &Document, value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Int(v) => out.push_str(&v.to_string()),
        Value::UInt(v) => out.push_str(&v.to_string()),
        Value::Double(v) => write_double(*v, out),
        Value::Str(span) => write_escaped(doc.span_str(*span), out),
        Value::Array(items) => write_array(doc, items, out),
        Value::Object(members) => write_object(doc, members, out),
    }
}

// Integral doubles keep a trailing ".0" so re-parsing the output preserves
// the Double tag (the parser tags bare integral literals Int/UInt).
fn write_double(value: f64, out: &mut String) {
    if value == value.trunc() {
        out.push_str(&format!("{value:.1}"));
    } else {
        out.push_str(&format!("{value}"));
    }
}

fn write_array(doc: &Document, items: &[Value], out: &mut String) {
    out.push('[');
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        write_value(doc, item, out);
    }
    out.push(']');
}

fn write_object(doc: &Document, members: &[Member], out: &mut String) {
    out.push('{');
    for (idx, member) in members.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        write_escaped(doc.span_str(member.key), out);
        out.push(':');
        write_value(doc, &member.value, out);
    }
    out.push('}');
}

fn write_escaped(text: &str, out: &mut String) {
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use crate::core::value::Document;

    fn round(input: &str) -> String {
        let doc = Document::parse(input).expect("parses");
        doc.root().stringify_at(&[]).expect("stringifies")
    }

    #[test]
    fn output_is_compact_and_ordered() {
        assert_eq!(
            round(r#" { "b" : [ 1 , 2 ] , "a" : null } "#),
            r#"{"b":[1,2],"a":null}"#
        );
        assert_eq!(round("[]"), "[]");
        assert_eq!(round("{}"), "{}");
    }

    #[test]
    fn doubles_keep_their_tag_through_a_round_trip() {
        assert_eq!(round("2.0"), "2.0");
        assert_eq!(round("-0.5"), "-0.5");
        assert_eq!(round("1e2"), "100.0");
        assert_eq!(round("7"), "7");
        assert_eq!(round("-7"), "-7");
    }

    #[test]
    fn strings_are_re_escaped() {
        assert_eq!(round(r#""a\"b\\c\n""#), r#""a\"b\\c\n""#);
        assert_eq!(round(r#""""#), r#""""#);
        // Decoded escapes that have no shorthand stay as literal UTF-8.
        assert_eq!(round(r#""☃""#), "\"\u{2603}\"");
    }

    #[test]
    fn subtree_stringify_renders_only_the_subtree() {
        let doc = Document::parse(r#"{"a":{"b":[1,2,3]},"c":"x"}"#).expect("parses");
        assert_eq!(
            doc.root().stringify_at(&["a"]).as_deref(),
            Some(r#"{"b":[1,2,3]}"#)
        );
        assert_eq!(doc.root().stringify_at(&["c"]).as_deref(), Some("\"x\""));
        assert_eq!(doc.root().stringify_at(&["missing"]), None);
    }
}
