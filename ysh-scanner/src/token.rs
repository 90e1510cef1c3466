use crate::{ScannerError, SourceSpan};

/// The token kinds the host grammar may ask the scanner about.
///
/// The discriminant of each kind is its symbol index, i.e. its position in the
/// grammar's list of external tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
#[repr(u8)]
pub enum TokenKind {
    /// `$` introducing a variable, positional, special or delimited expansion.
    DollarExpansion = 0,
    /// `@` introducing a splice expansion.
    HatExpansion,
    /// Name of an inline environment assignment (`NAME` in `NAME=value cmd`).
    EnvVarName,
    /// `=` of an inline environment assignment.
    EnvEqual,
    /// Name bound by a bare constant declaration (`name = value`).
    ConstDeclVar,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `)`
    CloseParen,
    /// `}`
    CloseBrace,
    /// `]`
    CloseBracket,
    /// `|` closing a literal list.
    ClosingList,
    /// `=` binding a named parameter.
    NamedParamEq,
    /// `b` prefix of a byte string literal.
    ByteStringMarker,
    /// Newline acting as a terminator.
    Newline,
    /// Sentinel: the grammar would accept a statement terminator here.
    TerminatorSentinel,
    /// Sentinel: the grammar is at the end of a statement.
    StatementSentinel,
    /// Sentinel: the grammar is inside a multiline command.
    MultilineCmdSentinel,
    /// Sentinel: the grammar is inside a comma-separated list.
    CommaSentinel,
    /// Sentinel: the host is performing error recovery.
    ErrorSentinel,
}

impl TokenKind {
    /// Number of token kinds.
    pub const COUNT: usize = 19;

    /// All token kinds, in symbol index order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::DollarExpansion,
        Self::HatExpansion,
        Self::EnvVarName,
        Self::EnvEqual,
        Self::ConstDeclVar,
        Self::Comma,
        Self::Semicolon,
        Self::CloseParen,
        Self::CloseBrace,
        Self::CloseBracket,
        Self::ClosingList,
        Self::NamedParamEq,
        Self::ByteStringMarker,
        Self::Newline,
        Self::TerminatorSentinel,
        Self::StatementSentinel,
        Self::MultilineCmdSentinel,
        Self::CommaSentinel,
        Self::ErrorSentinel,
    ];

    /// Returns the symbol index of this kind.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the kind with the given symbol index, if there is one.
    ///
    /// # Arguments
    ///
    /// * `index` - The symbol index to look up.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Returns the name under which the grammar declares this external token.
    pub const fn grammar_name(self) -> &'static str {
        match self {
            Self::DollarExpansion => "dollar_expansion",
            Self::HatExpansion => "hat_expansion",
            Self::EnvVarName => "environment_variable_name",
            Self::EnvEqual => "environment_equals",
            Self::ConstDeclVar => "const_declaration_variable",
            Self::Comma => "comma",
            Self::Semicolon => "semicolon",
            Self::CloseParen => "close_paren",
            Self::CloseBrace => "close_brace",
            Self::CloseBracket => "close_bracket",
            Self::ClosingList => "closing_list",
            Self::NamedParamEq => "named_parameter_equals",
            Self::ByteStringMarker => "byte_string_marker",
            Self::Newline => "_newline",
            Self::TerminatorSentinel => "_terminator_sentinel",
            Self::StatementSentinel => "_statement_sentinel",
            Self::MultilineCmdSentinel => "_multiline_command_sentinel",
            Self::CommaSentinel => "_comma_sentinel",
            Self::ErrorSentinel => "error_sentinel",
        }
    }

    /// Returns true for kinds that only ever signal grammar context; the scanner
    /// never emits them.
    pub const fn is_sentinel(self) -> bool {
        matches!(
            self,
            Self::TerminatorSentinel
                | Self::StatementSentinel
                | Self::MultilineCmdSentinel
                | Self::CommaSentinel
                | Self::ErrorSentinel
        )
    }

    const fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.grammar_name())
    }
}

/// The set of token kinds the grammar currently considers valid.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct CandidateSet(u32);

impl CandidateSet {
    const MASK: u32 = (1 << TokenKind::COUNT) - 1;

    /// Returns a set with no active kinds.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Returns a set with every kind active, as a host does during error recovery.
    pub const fn all() -> Self {
        Self(Self::MASK)
    }

    /// Returns a set containing exactly the given kinds.
    ///
    /// # Arguments
    ///
    /// * `kinds` - The kinds to activate.
    pub const fn of(kinds: &[TokenKind]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < kinds.len() {
            bits |= kinds[i].bit();
            i += 1;
        }
        Self(bits)
    }

    /// Builds a set from a host valid-symbol array indexed by symbol index.
    ///
    /// # Arguments
    ///
    /// * `valid_symbols` - One flag per token kind, in symbol index order.
    pub fn from_valid_symbols(valid_symbols: &[bool]) -> Result<Self, ScannerError> {
        if valid_symbols.len() != TokenKind::COUNT {
            return Err(ScannerError::SymbolCountMismatch {
                expected: TokenKind::COUNT,
                actual: valid_symbols.len(),
            });
        }

        Ok(TokenKind::ALL
            .into_iter()
            .zip(valid_symbols)
            .filter(|(_, valid)| **valid)
            .map(|(kind, _)| kind)
            .collect())
    }

    /// Returns a copy of this set with the given kind activated.
    #[must_use]
    pub const fn with(self, kind: TokenKind) -> Self {
        Self(self.0 | kind.bit())
    }

    /// Activates the given kind.
    pub const fn insert(&mut self, kind: TokenKind) {
        self.0 |= kind.bit();
    }

    /// Deactivates the given kind.
    pub const fn remove(&mut self, kind: TokenKind) {
        self.0 &= !kind.bit();
    }

    /// Returns true if the given kind is active.
    pub const fn contains(self, kind: TokenKind) -> bool {
        self.0 & kind.bit() != 0
    }

    /// Returns true if any kind of `other` is active in this set.
    pub const fn contains_any(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns true if no kind is active.
    pub const fn is_empty(self) -> bool {
        self.0 & Self::MASK == 0
    }

    /// Iterates over the active kinds, in symbol index order.
    pub fn iter(self) -> impl Iterator<Item = TokenKind> {
        TokenKind::ALL
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }
}

impl std::fmt::Debug for CandidateSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<TokenKind> for CandidateSet {
    fn from_iter<T: IntoIterator<Item = TokenKind>>(iter: T) -> Self {
        let mut set = Self::empty();
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

impl From<TokenKind> for CandidateSet {
    fn from(kind: TokenKind) -> Self {
        Self::empty().with(kind)
    }
}

/// A token emitted by the scanner, materialized from the source text.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct ScannedToken {
    /// The kind of the token.
    pub kind: TokenKind,
    /// The text covered by the token.
    pub text: String,
    /// The location of the token in the source text.
    pub span: SourceSpan,
}

#[cfg(feature = "diagnostics")]
impl From<&ScannedToken> for miette::SourceSpan {
    fn from(token: &ScannedToken) -> Self {
        (&token.span).into()
    }
}
