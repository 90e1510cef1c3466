use bon::Builder;

use crate::cursor::InputCursor;
use crate::{CandidateSet, ScannerError, TokenKind};

pub use scanner_options_builder::State as ScannerOptionsBuilderState;

/// Kinds whose presence means a newline may act as a terminator.
const TERMINATOR_TRIGGERS: CandidateSet = CandidateSet::of(&[
    TokenKind::Comma,
    TokenKind::Semicolon,
    TokenKind::CloseParen,
    TokenKind::CloseBrace,
    TokenKind::CloseBracket,
    TokenKind::ClosingList,
    TokenKind::NamedParamEq,
    TokenKind::TerminatorSentinel,
    TokenKind::StatementSentinel,
    TokenKind::MultilineCmdSentinel,
    TokenKind::CommaSentinel,
]);

/// Single-character punctuation, in priority order.
const PUNCTUATION: [(TokenKind, char); 6] = [
    (TokenKind::Comma, ','),
    (TokenKind::Semicolon, ';'),
    (TokenKind::CloseParen, ')'),
    (TokenKind::CloseBrace, '}'),
    (TokenKind::CloseBracket, ']'),
    (TokenKind::ClosingList, '|'),
];

/// Controls how much of the source a dollar expansion token covers.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum DollarSpan {
    /// Special parameters (`$*`, `$?`, `$#`, `$@`) and delimited openers (`${`,
    /// `$[`, `$(`) are emitted as two-character tokens; `$name` and `$1` emit
    /// just the `$`.
    #[default]
    WithOperator,
    /// Every dollar expansion token is just the `$`, leaving the character
    /// after it to the grammar.
    SigilOnly,
}

/// Options controlling how the scanner operates.
#[derive(Builder, Clone, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct ScannerOptions {
    /// How much of the source a dollar expansion token covers.
    #[builder(default)]
    pub dollar_span: DollarSpan,
}

/// A token the scanner has decided to emit, relative to where the request started.
#[derive(Clone, Copy, Debug)]
struct Recognized {
    kind: TokenKind,
    /// Number of characters in the token.
    len: usize,
}

impl Recognized {
    const fn new(kind: TokenKind, len: usize) -> Self {
        Self { kind, len }
    }

    /// Applies the token to the cursor: leading blanks are skipped, the token
    /// consumed, and its end marked.
    fn commit<C: InputCursor + ?Sized>(self, cursor: &mut C, leading: usize) {
        for _ in 0..leading {
            cursor.advance(true);
        }
        for _ in 0..self.len {
            cursor.advance(false);
        }
        cursor.mark_end();
    }
}

/// What a single guard makes of the input.
#[derive(Clone, Copy, Debug)]
enum Verdict {
    /// The guard recognized a token.
    Emit(Recognized),
    /// The guard's trigger character matched but the token did not validate;
    /// the whole request declines.
    Reject,
    /// The guard does not apply; the next one gets a try.
    Pass,
}

impl Verdict {
    /// Emits `token` if `valid`, otherwise rejects the request.
    const fn emit_if(valid: bool, token: Recognized) -> Self {
        if valid { Self::Emit(token) } else { Self::Reject }
    }

    fn or_else(self, next: impl FnOnce() -> Self) -> Self {
        match self {
            Self::Pass => next(),
            decided => decided,
        }
    }
}

/// Non-consuming view of the input at the start of a request.
///
/// All lookahead goes through a probe, so the cursor itself is only touched
/// once a token has been fully validated.
struct Probe<'c, C: ?Sized> {
    cursor: &'c C,
    /// Number of blanks preceding the token.
    leading: usize,
}

impl<'c, C: InputCursor + ?Sized> Probe<'c, C> {
    fn new(cursor: &'c C) -> Self {
        let mut leading = 0;
        while is_blank(cursor.peek(leading)) {
            leading += 1;
        }

        Self { cursor, leading }
    }

    /// Returns the character `i` positions into the token.
    fn at(&self, i: usize) -> Option<char> {
        self.cursor.peek(self.leading + i)
    }

    fn is(&self, i: usize, c: char) -> bool {
        self.at(i) == Some(c)
    }

    /// Returns the position of the first non-blank at or after `i`.
    fn skip_blanks(&self, mut i: usize) -> usize {
        while is_blank(self.at(i)) {
            i += 1;
        }
        i
    }
}

const fn is_blank(c: Option<char>) -> bool {
    matches!(c, Some(' ' | '\t'))
}

fn is_ident_start(c: Option<char>) -> bool {
    c.is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
}

fn is_digit(c: Option<char>) -> bool {
    c.is_some_and(|c| c.is_ascii_digit())
}

fn is_ident_char(c: Option<char>) -> bool {
    is_ident_start(c) || is_digit(c)
}

/// The contextual token resolver.
///
/// A scanner carries configuration only; no state survives from one request to
/// the next.
#[derive(Clone, Debug, Default)]
pub struct Scanner {
    options: ScannerOptions,
}

impl Scanner {
    /// Returns a new scanner.
    ///
    /// # Arguments
    ///
    /// * `options` - Options controlling how the scanner operates.
    pub const fn new(options: ScannerOptions) -> Self {
        Self { options }
    }

    /// Returns the options the scanner was created with.
    pub const fn options(&self) -> &ScannerOptions {
        &self.options
    }

    /// Resolves the token at the cursor, given the kinds the grammar would accept.
    ///
    /// On success the cursor has consumed the token (and any blanks before it)
    /// and its end is marked. On a decline the cursor is left untouched.
    ///
    /// # Arguments
    ///
    /// * `candidates` - The token kinds currently valid in the grammar.
    /// * `cursor` - The input cursor.
    pub fn resolve<C: InputCursor + ?Sized>(
        &self,
        candidates: CandidateSet,
        cursor: &mut C,
    ) -> Option<TokenKind> {
        // During error recovery every kind is flagged valid; stay out of the way.
        if candidates.contains(TokenKind::ErrorSentinel) {
            tracing::trace!(target: "scan", "error recovery; declining");
            return None;
        }

        let probe = Probe::new(&*cursor);

        let token = match self.recognize(candidates, &probe) {
            Verdict::Emit(token) => token,
            Verdict::Reject => {
                tracing::trace!(target: "scan", "rejected {:?} for {candidates:?}", probe.at(0));
                return None;
            }
            Verdict::Pass => {
                tracing::trace!(target: "scan", "declined {candidates:?} at {:?}", probe.at(0));
                return None;
            }
        };

        tracing::debug!(
            target: "scan",
            "{:?} ({} char(s), {} leading blank(s))",
            token.kind,
            token.len,
            probe.leading
        );

        let leading = probe.leading;
        token.commit(cursor, leading);
        Some(token.kind)
    }

    /// Runs the guards in priority order. The first guard whose trigger matches
    /// decides the request.
    fn recognize<C: InputCursor + ?Sized>(
        &self,
        candidates: CandidateSet,
        probe: &Probe<'_, C>,
    ) -> Verdict {
        terminator(candidates, probe)
            .or_else(|| punctuation(candidates, probe))
            .or_else(|| named_param_eq(candidates, probe))
            .or_else(|| self.dollar_expansion(candidates, probe))
            .or_else(|| hat_expansion(candidates, probe))
            .or_else(|| byte_string_marker(candidates, probe))
            .or_else(|| env_equal(candidates, probe))
            .or_else(|| declaration(candidates, probe))
    }

    fn dollar_expansion<C: InputCursor + ?Sized>(
        &self,
        candidates: CandidateSet,
        probe: &Probe<'_, C>,
    ) -> Verdict {
        if !candidates.contains(TokenKind::DollarExpansion) || !probe.is(0, '$') {
            return Verdict::Pass;
        }

        let operator_len = match self.options.dollar_span {
            DollarSpan::WithOperator => 2,
            DollarSpan::SigilOnly => 1,
        };

        let len = match probe.at(1) {
            // $var, $1
            next if is_ident_start(next) || is_digit(next) => 1,
            // $*, $?, $#, $@; a trailing identifier character makes it something else.
            Some('*' | '?' | '#' | '@') if !is_ident_char(probe.at(2)) => operator_len,
            // ${...}, $[...], $(...)
            Some('{' | '[' | '(') => operator_len,
            _ => return Verdict::Reject,
        };

        Verdict::Emit(Recognized::new(TokenKind::DollarExpansion, len))
    }
}

/// Newline as terminator, unless the grammar expects a plain newline.
fn terminator<C: InputCursor + ?Sized>(
    candidates: CandidateSet,
    probe: &Probe<'_, C>,
) -> Verdict {
    if !candidates.contains_any(TERMINATOR_TRIGGERS)
        || candidates.contains(TokenKind::Newline)
        || !probe.is(0, '\n')
    {
        return Verdict::Pass;
    }

    if candidates.contains(TokenKind::MultilineCmdSentinel) {
        // A blank line ends a multiline command.
        let next = probe.skip_blanks(1);
        if probe.is(next, '\n') {
            tracing::trace!(target: "scan", "blank line inside multiline command");
            return Verdict::Reject;
        }
    }

    Verdict::Emit(Recognized::new(TokenKind::Newline, 1))
}

fn punctuation<C: InputCursor + ?Sized>(
    candidates: CandidateSet,
    probe: &Probe<'_, C>,
) -> Verdict {
    PUNCTUATION
        .into_iter()
        .find(|(kind, c)| candidates.contains(*kind) && probe.is(0, *c))
        .map_or(Verdict::Pass, |(kind, _)| Verdict::Emit(Recognized::new(kind, 1)))
}

/// `=` binding a named parameter; `==` is left to the grammar.
fn named_param_eq<C: InputCursor + ?Sized>(
    candidates: CandidateSet,
    probe: &Probe<'_, C>,
) -> Verdict {
    if !candidates.contains(TokenKind::NamedParamEq) || !probe.is(0, '=') {
        return Verdict::Pass;
    }

    Verdict::emit_if(!probe.is(1, '='), Recognized::new(TokenKind::NamedParamEq, 1))
}

fn hat_expansion<C: InputCursor + ?Sized>(
    candidates: CandidateSet,
    probe: &Probe<'_, C>,
) -> Verdict {
    if !candidates.contains(TokenKind::HatExpansion) || !probe.is(0, '@') {
        return Verdict::Pass;
    }

    let next = probe.at(1);
    Verdict::emit_if(
        is_ident_char(next) || matches!(next, Some('[' | '(')),
        Recognized::new(TokenKind::HatExpansion, 1),
    )
}

/// The `b` of `b'...'`.
fn byte_string_marker<C: InputCursor + ?Sized>(
    candidates: CandidateSet,
    probe: &Probe<'_, C>,
) -> Verdict {
    if !candidates.contains(TokenKind::ByteStringMarker) || !probe.is(0, 'b') {
        return Verdict::Pass;
    }

    Verdict::emit_if(probe.is(1, '\''), Recognized::new(TokenKind::ByteStringMarker, 1))
}

/// `=` of `NAME=value`, which must not be followed by a blank.
fn env_equal<C: InputCursor + ?Sized>(
    candidates: CandidateSet,
    probe: &Probe<'_, C>,
) -> Verdict {
    if !candidates.contains(TokenKind::EnvEqual) || !probe.is(0, '=') {
        return Verdict::Pass;
    }

    Verdict::emit_if(!is_blank(probe.at(1)), Recognized::new(TokenKind::EnvEqual, 1))
}

/// Identifier-led declarations: `NAME=` and `name = `.
fn declaration<C: InputCursor + ?Sized>(
    candidates: CandidateSet,
    probe: &Probe<'_, C>,
) -> Verdict {
    let env_var = candidates.contains(TokenKind::EnvVarName);
    let const_decl = candidates.contains(TokenKind::ConstDeclVar);
    if (!env_var && !const_decl) || !is_ident_start(probe.at(0)) {
        return Verdict::Pass;
    }

    let mut len = 1;
    while is_ident_char(probe.at(len)) {
        len += 1;
    }

    if env_var && probe.is(len, '=') {
        return Verdict::Emit(Recognized::new(TokenKind::EnvVarName, len));
    }

    if const_decl && is_blank(probe.at(len)) {
        let eq = probe.skip_blanks(len);
        if probe.is(eq, '=') && is_blank(probe.at(eq + 1)) {
            return Verdict::Emit(Recognized::new(TokenKind::ConstDeclVar, len));
        }
    }

    Verdict::Reject
}

/// The lifecycle a host expects of an external scanner.
///
/// Hosts create one scanner per parser, ask it for tokens, and save or restore
/// its state around incremental re-parses.
pub trait ExternalScanner {
    /// Resolves the token at the cursor. See [`Scanner::resolve`].
    fn scan(
        &mut self,
        cursor: &mut dyn InputCursor,
        candidates: CandidateSet,
    ) -> Option<TokenKind>;

    /// Returns the scanner to its initial state.
    fn reset(&mut self);

    /// Writes the scanner's state into `buffer`, returning the number of bytes written.
    fn serialize(&self, buffer: &mut [u8]) -> usize;

    /// Restores state previously written by [`ExternalScanner::serialize`].
    fn deserialize(&mut self, buffer: &[u8]) -> Result<(), ScannerError>;
}

impl ExternalScanner for Scanner {
    fn scan(
        &mut self,
        cursor: &mut dyn InputCursor,
        candidates: CandidateSet,
    ) -> Option<TokenKind> {
        self.resolve(candidates, cursor)
    }

    fn reset(&mut self) {}

    fn serialize(&self, _buffer: &mut [u8]) -> usize {
        0
    }

    fn deserialize(&mut self, buffer: &[u8]) -> Result<(), ScannerError> {
        if buffer.is_empty() {
            Ok(())
        } else {
            Err(ScannerError::UnexpectedState(buffer.len()))
        }
    }
}

/// Resolves the token at the cursor with default options. See [`Scanner::resolve`].
///
/// # Arguments
///
/// * `candidates` - The token kinds currently valid in the grammar.
/// * `cursor` - The input cursor.
pub fn resolve<C: InputCursor + ?Sized>(
    candidates: CandidateSet,
    cursor: &mut C,
) -> Option<TokenKind> {
    Scanner::default().resolve(candidates, cursor)
}
