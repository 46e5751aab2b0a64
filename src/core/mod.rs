// Core modules implementing the document model, parsing, serialization, and error modeling.
pub mod error;
pub mod parse;
pub mod stringify;
pub mod value;
