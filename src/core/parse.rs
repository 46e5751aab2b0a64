//! Purpose: Recursive-descent JSON parser producing a `Document` or a
//! `ParseError` with a byte offset.
//! Exports: `ParseOptions`, `parse_document`.
//! Role: Single parser seam; the ABI and the Rust API both go through it.
//! Invariants: Parsing is all-or-nothing; no partial document escapes.
//! Invariants: The parser owns the input buffer and decodes string escapes in
//! place (the decoded text is never longer than its source), so string spans
//! index the mutated buffer directly.
//! Invariants: Every string span handed to the value tree is valid UTF-8.

use tracing::debug;

use crate::core::error::{ParseError, ParseErrorKind};
use crate::core::value::{Document, Member, Span, Value};

const DEFAULT_MAX_DEPTH: usize = 128;

/// Parser configuration. The depth cap bounds recursion over nested
/// arrays/objects; exceeding it fails with the `Termination` kind.
#[derive(Clone, Copy, Debug)]
pub struct ParseOptions {
    max_depth: usize,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn parse_document(buf: Vec<u8>, options: ParseOptions) -> Result<Document, ParseError> {
    let parser = Parser {
        buf,
        pos: 0,
        max_depth: options.max_depth,
    };
    parser.run().inspect_err(|err| {
        debug!(
            offset = err.offset(),
            code = err.kind().code(),
            "json parse failed"
        );
    })
}

struct Parser {
    buf: Vec<u8>,
    pos: usize,
    max_depth: usize,
}

impl Parser {
    fn run(mut self) -> Result<Document, ParseError> {
        self.skip_ws();
        if self.peek().is_none() {
            return Err(self.err(ParseErrorKind::DocumentEmpty));
        }
        let root = self.parse_value(0)?;
        self.skip_ws();
        if self.peek().is_some() {
            return Err(self.err(ParseErrorKind::DocumentRootNotSingular));
        }
        Ok(Document {
            buf: self.buf.into_boxed_slice(),
            root,
        })
    }

    fn parse_value(&mut self, depth: usize) -> Result<Value, ParseError> {
        match self.peek() {
            Some(b'n') => self.parse_literal(b"null", Value::Null),
            Some(b't') => self.parse_literal(b"true", Value::Bool(true)),
            Some(b'f') => self.parse_literal(b"false", Value::Bool(false)),
            Some(b'"') => self.parse_string().map(Value::Str),
            Some(b'{') => self.parse_object(depth),
            Some(b'[') => self.parse_array(depth),
            Some(c) if c == b'-' || c.is_ascii_digit() => self.parse_number(),
            _ => Err(self.err(ParseErrorKind::ValueInvalid)),
        }
    }

    fn parse_literal(&mut self, expected: &[u8], value: Value) -> Result<Value, ParseError> {
        for &byte in expected {
            if self.peek() != Some(byte) {
                return Err(self.err(ParseErrorKind::ValueInvalid));
            }
            self.pos += 1;
        }
        Ok(value)
    }

    fn parse_object(&mut self, depth: usize) -> Result<Value, ParseError> {
        if depth >= self.max_depth {
            return Err(self.err(ParseErrorKind::Termination));
        }
        self.pos += 1; // '{'
        self.skip_ws();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            return Ok(Value::Object(Vec::new()));
        }

        let mut members = Vec::new();
        loop {
            if self.peek() != Some(b'"') {
                return Err(self.err(ParseErrorKind::ObjectMissName));
            }
            let key = self.parse_string()?;
            self.skip_ws();
            if self.peek() != Some(b':') {
                return Err(self.err(ParseErrorKind::ObjectMissColon));
            }
            self.pos += 1;
            self.skip_ws();
            let value = self.parse_value(depth + 1)?;
            members.push(Member { key, value });
            self.skip_ws();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    self.skip_ws();
                }
                Some(b'}') => {
                    self.pos += 1;
                    return Ok(Value::Object(members));
                }
                _ => return Err(self.err(ParseErrorKind::ObjectMissCommaOrCurlyBracket)),
            }
        }
    }

    fn parse_array(&mut self, depth: usize) -> Result<Value, ParseError> {
        if depth >= self.max_depth {
            return Err(self.err(ParseErrorKind::Termination));
        }
        self.pos += 1; // '['
        self.skip_ws();
        if self.peek() == Some(b']') {
            self.pos += 1;
            return Ok(Value::Array(Vec::new()));
        }

        let mut items = Vec::new();
        loop {
            let item = self.parse_value(depth + 1)?;
            items.push(item);
            self.skip_ws();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    self.skip_ws();
                }
                Some(b']') => {
                    self.pos += 1;
                    return Ok(Value::Array(items));
                }
                _ => return Err(self.err(ParseErrorKind::ArrayMissCommaOrSquareBracket)),
            }
        }
    }

    /// Parse a string, decoding escapes in place. Two-pointer scan: the write
    /// head trails the read position, so decoded bytes overwrite consumed
    /// source bytes and the resulting span indexes the same buffer.
    fn parse_string(&mut self) -> Result<Span, ParseError> {
        self.pos += 1; // opening quote
        let start = self.pos;
        let mut write = self.pos;
        loop {
            match self.peek() {
                None => return Err(self.err(ParseErrorKind::StringMissQuotationMark)),
                Some(b'"') => {
                    self.pos += 1;
                    return Ok(Span::new(start, write - start));
                }
                Some(b'\\') => {
                    write = self.parse_escape(write)?;
                }
                Some(c) if c < 0x20 => {
                    return Err(self.err(ParseErrorKind::StringInvalidEncoding));
                }
                Some(c) if c < 0x80 => {
                    self.buf[write] = c;
                    write += 1;
                    self.pos += 1;
                }
                Some(c) => {
                    let len = utf8_seq_len(c)
                        .ok_or_else(|| self.err(ParseErrorKind::StringInvalidEncoding))?;
                    if self.pos + len > self.buf.len()
                        || std::str::from_utf8(&self.buf[self.pos..self.pos + len]).is_err()
                    {
                        return Err(self.err(ParseErrorKind::StringInvalidEncoding));
                    }
                    self.buf.copy_within(self.pos..self.pos + len, write);
                    write += len;
                    self.pos += len;
                }
            }
        }
    }

    /// Decode one escape sequence starting at the backslash, writing the
    /// decoded bytes at `write`. Returns the new write head. Surrogate
    /// failures are reported at the backslash that introduced the escape.
    fn parse_escape(&mut self, mut write: usize) -> Result<usize, ParseError> {
        let escape_start = self.pos;
        self.pos += 1; // backslash
        let decoded = match self.peek() {
            None => return Err(self.err(ParseErrorKind::StringMissQuotationMark)),
            Some(b'"') => b'"',
            Some(b'\\') => b'\\',
            Some(b'/') => b'/',
            Some(b'b') => 0x08,
            Some(b'f') => 0x0C,
            Some(b'n') => b'\n',
            Some(b'r') => b'\r',
            Some(b't') => b'\t',
            Some(b'u') => {
                self.pos += 1;
                let ch = self.parse_unicode_escape(escape_start)?;
                let mut utf8 = [0u8; 4];
                let encoded = ch.encode_utf8(&mut utf8);
                self.buf[write..write + encoded.len()].copy_from_slice(encoded.as_bytes());
                return Ok(write + encoded.len());
            }
            Some(_) => return Err(self.err(ParseErrorKind::StringEscapeInvalid)),
        };
        self.pos += 1;
        self.buf[write] = decoded;
        write += 1;
        Ok(write)
    }

    /// Position is just past `\u`. Handles surrogate pairs; a high surrogate
    /// must be immediately followed by `\u` plus a low surrogate.
    fn parse_unicode_escape(&mut self, escape_start: usize) -> Result<char, ParseError> {
        let surrogate_err = ParseError::new(ParseErrorKind::StringUnicodeSurrogateInvalid, escape_start);
        let high = self.parse_hex4()?;
        let code_point = if (0xD800..=0xDBFF).contains(&high) {
            if self.peek() != Some(b'\\') {
                return Err(surrogate_err);
            }
            self.pos += 1;
            if self.peek() != Some(b'u') {
                return Err(surrogate_err);
            }
            self.pos += 1;
            let low = self.parse_hex4()?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return Err(surrogate_err);
            }
            0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
        } else if (0xDC00..=0xDFFF).contains(&high) {
            return Err(surrogate_err);
        } else {
            high
        };
        char::from_u32(code_point).ok_or(surrogate_err)
    }

    fn parse_hex4(&mut self) -> Result<u32, ParseError> {
        let mut value = 0u32;
        for _ in 0..4 {
            let digit = match self.peek() {
                Some(c @ b'0'..=b'9') => u32::from(c - b'0'),
                Some(c @ b'a'..=b'f') => u32::from(c - b'a') + 10,
                Some(c @ b'A'..=b'F') => u32::from(c - b'A') + 10,
                _ => return Err(self.err(ParseErrorKind::StringUnicodeEscapeInvalidHex)),
            };
            value = (value << 4) | digit;
            self.pos += 1;
        }
        Ok(value)
    }

    /// Number grammar per RFC 8259. Integral literals store `UInt` when
    /// non-negative and `Int` when negative; any fraction or exponent (or an
    /// integral literal outside 64-bit range) stores `Double`. A non-finite
    /// double is `NumberTooBig`, reported at the start of the number.
    fn parse_number(&mut self) -> Result<Value, ParseError> {
        let start = self.pos;
        let negative = self.peek() == Some(b'-');
        if negative {
            self.pos += 1;
        }

        match self.peek() {
            Some(b'0') => self.pos += 1,
            Some(b'1'..=b'9') => {
                while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                    self.pos += 1;
                }
            }
            _ => return Err(self.err(ParseErrorKind::ValueInvalid)),
        }

        let mut integral = true;
        if self.peek() == Some(b'.') {
            self.pos += 1;
            if !matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                return Err(self.err(ParseErrorKind::NumberMissFraction));
            }
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.pos += 1;
            }
            integral = false;
        }
        if matches!(self.peek(), Some(b'e') | Some(b'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some(b'+') | Some(b'-')) {
                self.pos += 1;
            }
            if !matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                return Err(self.err(ParseErrorKind::NumberMissExponent));
            }
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.pos += 1;
            }
            integral = false;
        }

        // The scanned region is ASCII digits, sign, dot, and exponent marker.
        let text = unsafe { std::str::from_utf8_unchecked(&self.buf[start..self.pos]) };

        if integral {
            if negative {
                if let Ok(v) = text.parse::<i64>() {
                    return Ok(Value::Int(v));
                }
            } else if let Ok(v) = text.parse::<u64>() {
                return Ok(Value::UInt(v));
            }
            // Out of 64-bit range: fall through to double.
        }

        let double = text
            .parse::<f64>()
            .map_err(|_| ParseError::new(ParseErrorKind::UnspecificSyntax, start))?;
        if !double.is_finite() {
            return Err(ParseError::new(ParseErrorKind::NumberTooBig, start));
        }
        Ok(Value::Double(double))
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r')) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.buf.get(self.pos).copied()
    }

    fn err(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.pos)
    }
}

fn utf8_seq_len(lead: u8) -> Option<usize> {
    match lead {
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}
