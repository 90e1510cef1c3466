use crate::SourcePosition;

/// Represents an error raised at the boundary between the scanner and its host.
///
/// Resolution itself never fails: a candidate set that matches nothing is a
/// normal decline, reported as `None` by the scanner.
#[derive(Debug, thiserror::Error)]
pub enum ScannerError {
    /// The host's valid-symbol array does not line up with the scanner's token kinds.
    #[error("expected {expected} valid-symbol flags, found {actual}")]
    SymbolCountMismatch {
        /// Number of token kinds known to the scanner.
        expected: usize,
        /// Number of flags provided by the host.
        actual: usize,
    },

    /// The host tried to restore scanner state, but the scanner never saves any.
    #[error("scanner carries no state, but {0} byte(s) of state were provided")]
    UnexpectedState(usize),

    /// No candidate matched at the given position while scanning a whole input.
    #[error("no token could be resolved at {0}")]
    NoTokenAt(SourcePosition),
}
