//! Purpose: The tagged value tree, its owning `Document`, and the borrowed
//! `ValueRef` cursor carrying navigation and typed access.
//! Exports: `Document`, `Value`, `Member`, `Span`, `Kind`, `ValueRef`.
//! Invariants: The tree is immutable after a successful parse; every `ValueRef`
//! is bounded by its document's lifetime.
//! Invariants: String spans always index valid UTF-8 inside the document buffer
//! (established by the parser, relied on by `span_str`).

use crate::core::error::ParseError;
use crate::core::parse::{self, ParseOptions};
use crate::core::stringify;

/// Byte range into the document buffer. Strings never own their bytes; the
/// buffer must outlive every span resolved from it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Span {
    pub(crate) start: usize,
    pub(crate) len: usize,
}

impl Span {
    pub(crate) fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }
}

/// One tagged node of the JSON data model. Numbers keep the most specific
/// representation the parser chose; nothing widens or narrows at read time.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Double(f64),
    Str(Span),
    Array(Vec<Value>),
    Object(Vec<Member>),
}

/// A (key, value) pair inside an object. Keys are not required to be unique;
/// path lookup returns the first match in insertion order, so later duplicates
/// are reachable only through enumeration.
#[derive(Clone, Debug, PartialEq)]
pub struct Member {
    pub(crate) key: Span,
    pub(crate) value: Value,
}

/// Coarse categories reported by `kind_at`. True and false collapse to `Bool`;
/// all three number representations collapse to `Number`. An absent path has
/// no category (`kind_at` returns `None`).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) | Value::UInt(_) | Value::Double(_) => Kind::Number,
            Value::Str(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
        }
    }
}

/// Owns one parsed value tree and the text buffer its strings borrow from.
/// Exactly one document exists per successful parse; dropping it invalidates
/// every `ValueRef` derived from it (enforced by the borrow checker here,
/// documented at the ABI).
#[derive(Debug)]
pub struct Document {
    pub(crate) buf: Box<[u8]>,
    pub(crate) root: Value,
}

impl Document {
    /// Parse with default options. The parser takes ownership of the input
    /// bytes and decodes string escapes in place; see `core::parse`.
    pub fn parse(text: impl Into<Vec<u8>>) -> Result<Self, ParseError> {
        parse::parse_document(text.into(), ParseOptions::default())
    }

    pub fn parse_with(text: impl Into<Vec<u8>>, options: ParseOptions) -> Result<Self, ParseError> {
        parse::parse_document(text.into(), options)
    }

    pub fn root(&self) -> ValueRef<'_> {
        ValueRef {
            doc: self,
            node: &self.root,
        }
    }

    pub(crate) fn span_str(&self, span: Span) -> &str {
        let bytes = &self.buf[span.start..span.start + span.len];
        // Parser invariant: string spans cover the decoded, UTF-8-validated
        // region of the buffer.
        unsafe { std::str::from_utf8_unchecked(bytes) }
    }
}

/// Borrowed cursor over one node of a document. Copyable; all methods are pure
/// reads. Accessor misses (absent path or wrong tag) collapse to `None` and
/// carry no offset, matching the boundary contract.
#[derive(Clone, Copy, Debug)]
pub struct ValueRef<'a> {
    doc: &'a Document,
    node: &'a Value,
}

impl<'a> ValueRef<'a> {
    pub(crate) fn from_parts(doc: &'a Document, node: &'a Value) -> Self {
        Self { doc, node }
    }

    pub(crate) fn node(self) -> &'a Value {
        self.node
    }

    /// Resolve a path of member names, first match per step, short-circuiting
    /// on the first non-object node or missing member. The empty path returns
    /// the value itself. Never allocates.
    pub fn get(self, path: &[&str]) -> Option<ValueRef<'a>> {
        let mut node = self.node;
        for key in path {
            let members = match node {
                Value::Object(members) => members,
                _ => return None,
            };
            node = &members
                .iter()
                .find(|member| self.doc.span_str(member.key) == *key)?
                .value;
        }
        Some(ValueRef {
            doc: self.doc,
            node,
        })
    }

    pub fn kind(self) -> Kind {
        self.node.kind()
    }

    pub fn kind_at(self, path: &[&str]) -> Option<Kind> {
        self.get(path).map(ValueRef::kind)
    }

    /// Signed integer at the path. Serves `Int` directly and `UInt` when the
    /// value fits; never serves `Double`.
    pub fn int_at(self, path: &[&str]) -> Option<i64> {
        match self.get(path)?.node {
            Value::Int(v) => Some(*v),
            Value::UInt(v) if *v <= i64::MAX as u64 => Some(*v as i64),
            _ => None,
        }
    }

    /// Unsigned integer at the path. Serves `UInt` directly and non-negative
    /// `Int`; never serves `Double`.
    pub fn uint_at(self, path: &[&str]) -> Option<u64> {
        match self.get(path)?.node {
            Value::UInt(v) => Some(*v),
            Value::Int(v) if *v >= 0 => Some(*v as u64),
            _ => None,
        }
    }

    pub fn bool_at(self, path: &[&str]) -> Option<bool> {
        match self.get(path)?.node {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Double at the path, exact tag only: integral literals never satisfy
    /// this accessor.
    pub fn double_at(self, path: &[&str]) -> Option<f64> {
        match self.get(path)?.node {
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Borrowed view into the document buffer; valid only while the document
    /// lives.
    pub fn str_at(self, path: &[&str]) -> Option<&'a str> {
        let found = self.get(path)?;
        match found.node {
            Value::Str(span) => Some(found.doc.span_str(*span)),
            _ => None,
        }
    }

    /// Ordered child references for an array node. The caller owns the list
    /// container; the nodes stay document-owned.
    pub fn array_at(self, path: &[&str]) -> Option<Vec<ValueRef<'a>>> {
        let found = self.get(path)?;
        match found.node {
            Value::Array(items) => Some(
                items
                    .iter()
                    .map(|item| ValueRef {
                        doc: found.doc,
                        node: item,
                    })
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Ordered (key, child) pairs for an object node, duplicates included.
    pub fn object_at(self, path: &[&str]) -> Option<Vec<(&'a str, ValueRef<'a>)>> {
        let found = self.get(path)?;
        match found.node {
            Value::Object(members) => Some(
                members
                    .iter()
                    .map(|member| {
                        (
                            found.doc.span_str(member.key),
                            ValueRef {
                                doc: found.doc,
                                node: &member.value,
                            },
                        )
                    })
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Render the subtree at the path as compact canonical JSON. The result is
    /// an independent caller-owned copy; an absent path yields `None`, never
    /// an empty string.
    pub fn stringify_at(self, path: &[&str]) -> Option<String> {
        let found = self.get(path)?;
        Some(stringify::to_compact_string(found.doc, found.node))
    }
}

#[cfg(test)]
mod tests {
    use super::{Document, Kind};

    fn sample() -> Document {
        Document::parse(r#"{"a":{"b":[1,2,3]},"c":"x","t":true,"n":null,"d":-2.5}"#)
            .expect("sample parses")
    }

    #[test]
    fn navigator_follows_member_paths_in_order() {
        let doc = sample();
        let root = doc.root();
        assert_eq!(root.kind_at(&["a", "b"]), Some(Kind::Array));
        assert_eq!(root.str_at(&["c"]), Some("x"));
        assert!(root.get(&["z"]).is_none());
        // Descending through a non-object short-circuits.
        assert!(root.get(&["c", "anything"]).is_none());
        assert!(root.get(&["a", "b", "deeper"]).is_none());
    }

    #[test]
    fn empty_path_is_the_value_itself() {
        let doc = sample();
        let root = doc.root();
        assert_eq!(root.kind_at(&[]), Some(Kind::Object));
        let c = root.get(&["c"]).expect("c exists");
        assert_eq!(c.str_at(&[]), Some("x"));
    }

    #[test]
    fn accessors_match_exact_tags_only() {
        let doc = sample();
        let root = doc.root();
        assert_eq!(root.bool_at(&["t"]), Some(true));
        assert_eq!(root.double_at(&["d"]), Some(-2.5));
        assert_eq!(root.int_at(&["d"]), None);
        assert_eq!(root.uint_at(&["d"]), None);
        assert_eq!(root.bool_at(&["n"]), None);
        assert_eq!(root.kind_at(&["n"]), Some(Kind::Null));
    }

    #[test]
    fn int_uint_overlap_follows_sign_and_range() {
        let doc = Document::parse(r#"{"p":7,"m":-7,"big":9223372036854775808}"#).expect("parses");
        let root = doc.root();
        assert_eq!(root.int_at(&["p"]), Some(7));
        assert_eq!(root.uint_at(&["p"]), Some(7));
        assert_eq!(root.int_at(&["m"]), Some(-7));
        assert_eq!(root.uint_at(&["m"]), None);
        // Larger than i64::MAX: reachable only through the unsigned accessor.
        assert_eq!(root.uint_at(&["big"]), Some(9223372036854775808));
        assert_eq!(root.int_at(&["big"]), None);
    }

    #[test]
    fn enumeration_preserves_source_order_and_count() {
        let doc = sample();
        let root = doc.root();
        let items = root.array_at(&["a", "b"]).expect("array");
        assert_eq!(items.len(), 3);
        let got: Vec<u64> = items.iter().map(|v| v.uint_at(&[]).expect("uint")).collect();
        assert_eq!(got, vec![1, 2, 3]);

        let members = root.object_at(&[]).expect("object");
        let keys: Vec<&str> = members.iter().map(|(key, _)| *key).collect();
        assert_eq!(keys, vec!["a", "c", "t", "n", "d"]);
    }

    #[test]
    fn duplicate_keys_resolve_to_first_and_enumerate_fully() {
        let doc = Document::parse(r#"{"a":1,"a":2}"#).expect("parses");
        let root = doc.root();
        assert_eq!(root.uint_at(&["a"]), Some(1));
        let members = root.object_at(&[]).expect("object");
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].0, "a");
        assert_eq!(members[1].0, "a");
        assert_eq!(members[1].1.uint_at(&[]), Some(2));
    }

    #[test]
    fn array_and_object_accessors_reject_other_tags() {
        let doc = sample();
        let root = doc.root();
        assert!(root.array_at(&["c"]).is_none());
        assert!(root.object_at(&["a", "b"]).is_none());
        assert!(root.array_at(&["missing"]).is_none());
    }
}
