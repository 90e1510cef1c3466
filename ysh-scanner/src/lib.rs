//! Contextual token resolver for the YSH shell grammar.
//!
//! A grammar-driven parser asks the scanner, at each position, which of a set of
//! candidate token kinds can be found there. The scanner resolves the lexical
//! ambiguities a context-free grammar cannot: whether a newline terminates a
//! statement, where a `$` or `@` expansion begins, whether `name` starts an
//! environment assignment or a constant declaration. It either consumes exactly
//! one token or declines without touching the input.

pub mod cursor;

mod error;
mod scanner;
mod session;
mod source;
mod token;

pub use cursor::{InputCursor, StrCursor};
pub use error::ScannerError;
pub use scanner::{
    DollarSpan, ExternalScanner, Scanner, ScannerOptions, ScannerOptionsBuilder,
    ScannerOptionsBuilderState, resolve,
};
pub use session::{
    ScanSession, ScanSessionBuilder, ScanSessionBuilderState, SessionSettings, scan_with,
};
pub use source::{SourcePosition, SourceSpan};
pub use token::{CandidateSet, ScannedToken, TokenKind};
