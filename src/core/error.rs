use std::error::Error as StdError;
use std::fmt;

/// Parse-failure taxonomy. Every kind is paired with a byte offset into the
/// input; the numeric codes and message texts are stable and cross the ABI
/// unchanged.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseErrorKind {
    DocumentEmpty,
    DocumentRootNotSingular,
    ValueInvalid,
    ObjectMissName,
    ObjectMissColon,
    ObjectMissCommaOrCurlyBracket,
    ArrayMissCommaOrSquareBracket,
    StringUnicodeEscapeInvalidHex,
    StringUnicodeSurrogateInvalid,
    StringEscapeInvalid,
    StringMissQuotationMark,
    StringInvalidEncoding,
    NumberTooBig,
    NumberMissFraction,
    NumberMissExponent,
    Termination,
    UnspecificSyntax,
}

pub const PARSE_ERROR_KINDS: [ParseErrorKind; 17] = [
    ParseErrorKind::DocumentEmpty,
    ParseErrorKind::DocumentRootNotSingular,
    ParseErrorKind::ValueInvalid,
    ParseErrorKind::ObjectMissName,
    ParseErrorKind::ObjectMissColon,
    ParseErrorKind::ObjectMissCommaOrCurlyBracket,
    ParseErrorKind::ArrayMissCommaOrSquareBracket,
    ParseErrorKind::StringUnicodeEscapeInvalidHex,
    ParseErrorKind::StringUnicodeSurrogateInvalid,
    ParseErrorKind::StringEscapeInvalid,
    ParseErrorKind::StringMissQuotationMark,
    ParseErrorKind::StringInvalidEncoding,
    ParseErrorKind::NumberTooBig,
    ParseErrorKind::NumberMissFraction,
    ParseErrorKind::NumberMissExponent,
    ParseErrorKind::Termination,
    ParseErrorKind::UnspecificSyntax,
];

impl ParseErrorKind {
    /// Stable i32 code for the boundary. Zero is reserved for "no error".
    pub fn code(self) -> i32 {
        match self {
            ParseErrorKind::DocumentEmpty => 1,
            ParseErrorKind::DocumentRootNotSingular => 2,
            ParseErrorKind::ValueInvalid => 3,
            ParseErrorKind::ObjectMissName => 4,
            ParseErrorKind::ObjectMissColon => 5,
            ParseErrorKind::ObjectMissCommaOrCurlyBracket => 6,
            ParseErrorKind::ArrayMissCommaOrSquareBracket => 7,
            ParseErrorKind::StringUnicodeEscapeInvalidHex => 8,
            ParseErrorKind::StringUnicodeSurrogateInvalid => 9,
            ParseErrorKind::StringEscapeInvalid => 10,
            ParseErrorKind::StringMissQuotationMark => 11,
            ParseErrorKind::StringInvalidEncoding => 12,
            ParseErrorKind::NumberTooBig => 13,
            ParseErrorKind::NumberMissFraction => 14,
            ParseErrorKind::NumberMissExponent => 15,
            ParseErrorKind::Termination => 16,
            ParseErrorKind::UnspecificSyntax => 17,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ParseErrorKind::DocumentEmpty => "The document is empty.",
            ParseErrorKind::DocumentRootNotSingular => {
                "The document root must not follow by other values."
            }
            ParseErrorKind::ValueInvalid => "Invalid value.",
            ParseErrorKind::ObjectMissName => "Missing a name for object member.",
            ParseErrorKind::ObjectMissColon => "Missing a colon after a name of object member.",
            ParseErrorKind::ObjectMissCommaOrCurlyBracket => {
                "Missing a comma or '}' after an object member."
            }
            ParseErrorKind::ArrayMissCommaOrSquareBracket => {
                "Missing a comma or ']' after an array element."
            }
            ParseErrorKind::StringUnicodeEscapeInvalidHex => {
                "Incorrect hex digit after \\u escape in string."
            }
            ParseErrorKind::StringUnicodeSurrogateInvalid => {
                "The surrogate pair in string is invalid."
            }
            ParseErrorKind::StringEscapeInvalid => "Invalid escape character in string.",
            ParseErrorKind::StringMissQuotationMark => "Missing a closing quotation mark in string.",
            ParseErrorKind::StringInvalidEncoding => "Invalid encoding in string.",
            ParseErrorKind::NumberTooBig => "Number too big to be stored in double.",
            ParseErrorKind::NumberMissFraction => "Miss fraction part in number.",
            ParseErrorKind::NumberMissExponent => "Miss exponent in number.",
            ParseErrorKind::Termination => "Parsing was terminated.",
            ParseErrorKind::UnspecificSyntax => "Unspecific syntax error.",
        }
    }
}

/// Message for a raw boundary code, including the catch-all for codes this
/// build does not know about.
pub fn message_for_code(code: i32) -> &'static str {
    for kind in PARSE_ERROR_KINDS {
        if kind.code() == code {
            return kind.message();
        }
    }
    "Unrecognized error code."
}

/// A parse failure: one taxonomy kind plus the byte offset it was detected at.
/// Parsing is all-or-nothing; no document accompanies a `ParseError`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParseError {
    kind: ParseErrorKind,
    offset: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }

    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.offset, self.kind.message())
    }
}

impl StdError for ParseError {}

#[cfg(test)]
mod tests {
    use super::{PARSE_ERROR_KINDS, ParseError, ParseErrorKind, message_for_code};

    #[test]
    fn code_mapping_is_stable() {
        let cases = [
            (ParseErrorKind::DocumentEmpty, 1),
            (ParseErrorKind::DocumentRootNotSingular, 2),
            (ParseErrorKind::ValueInvalid, 3),
            (ParseErrorKind::ObjectMissName, 4),
            (ParseErrorKind::ObjectMissColon, 5),
            (ParseErrorKind::ObjectMissCommaOrCurlyBracket, 6),
            (ParseErrorKind::ArrayMissCommaOrSquareBracket, 7),
            (ParseErrorKind::StringUnicodeEscapeInvalidHex, 8),
            (ParseErrorKind::StringUnicodeSurrogateInvalid, 9),
            (ParseErrorKind::StringEscapeInvalid, 10),
            (ParseErrorKind::StringMissQuotationMark, 11),
            (ParseErrorKind::StringInvalidEncoding, 12),
            (ParseErrorKind::NumberTooBig, 13),
            (ParseErrorKind::NumberMissFraction, 14),
            (ParseErrorKind::NumberMissExponent, 15),
            (ParseErrorKind::Termination, 16),
            (ParseErrorKind::UnspecificSyntax, 17),
        ];
        assert_eq!(cases.len(), PARSE_ERROR_KINDS.len());

        for (kind, code) in cases {
            assert_eq!(kind.code(), code);
            assert_eq!(message_for_code(code), kind.message());
        }
    }

    #[test]
    fn unknown_codes_map_to_catch_all() {
        assert_eq!(message_for_code(0), "Unrecognized error code.");
        assert_eq!(message_for_code(99), "Unrecognized error code.");
    }

    #[test]
    fn display_pairs_offset_with_message() {
        let err = ParseError::new(ParseErrorKind::DocumentRootNotSingular, 9);
        assert_eq!(
            err.to_string(),
            "[9] The document root must not follow by other values."
        );
    }
}
