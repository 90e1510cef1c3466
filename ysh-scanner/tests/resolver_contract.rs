//! Host-facing contract of the resolver: one call, one token or nothing.

use pretty_assertions::assert_eq;
use ysh_scanner::TokenKind::{
    ByteStringMarker, ConstDeclVar, DollarExpansion, EnvEqual, EnvVarName, MultilineCmdSentinel,
    NamedParamEq, Newline, TerminatorSentinel,
};
use ysh_scanner::{CandidateSet, InputCursor, SourcePosition, StrCursor, TokenKind, resolve};

/// Outcome of a single request: kind, token text, and the unconsumed remainder.
type Outcome<'a> = Option<(TokenKind, &'a str, &'a str)>;

fn request<'a>(input: &'a str, candidates: CandidateSet) -> Outcome<'a> {
    let mut cursor = StrCursor::new(input);
    cursor.begin_token();
    let kind = resolve(candidates, &mut cursor)?;
    Some((kind, cursor.token_text(), cursor.remaining()))
}

fn install_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

#[test]
fn terminator_sentinel_turns_newline_into_a_token() {
    install_tracing();

    let mut cursor = StrCursor::new("\n");
    cursor.begin_token();
    let kind = resolve(CandidateSet::from(TerminatorSentinel), &mut cursor);

    assert_eq!(kind, Some(Newline));
    assert_eq!(cursor.token_span().length(), 1);
    assert!(cursor.is_at_end());
}

#[test]
fn blank_line_in_multiline_command_declines() {
    install_tracing();
    assert_eq!(request("\n  \n", CandidateSet::from(MultilineCmdSentinel)), None);
}

#[test]
fn dollar_variable_emits_only_the_sigil() {
    assert_eq!(
        request("$foo", CandidateSet::from(DollarExpansion)),
        Some((DollarExpansion, "$", "foo"))
    );
}

#[test]
fn dollar_hash_before_identifier_declines() {
    assert_eq!(request("$#x", CandidateSet::from(DollarExpansion)), None);
}

#[test]
fn env_var_name_stops_before_equals() {
    assert_eq!(
        request("PATH=", CandidateSet::from(EnvVarName)),
        Some((EnvVarName, "PATH", "="))
    );
}

#[test]
fn const_declaration_needs_blank_after_equals() {
    assert_eq!(
        request("foo = ", CandidateSet::from(ConstDeclVar)),
        Some((ConstDeclVar, "foo", " = "))
    );
    assert_eq!(request("foo =", CandidateSet::from(ConstDeclVar)), None);
}

#[test]
fn double_equals_declines_instead_of_splitting() {
    install_tracing();
    assert_eq!(
        request("==x", CandidateSet::of(&[NamedParamEq, EnvEqual])),
        None
    );
}

#[test]
fn byte_string_marker_needs_a_quote() {
    assert_eq!(
        request("b'abc'", CandidateSet::from(ByteStringMarker)),
        Some((ByteStringMarker, "b", "'abc'"))
    );
    assert_eq!(request("bar", CandidateSet::from(ByteStringMarker)), None);
}

/// Cursor that records every call made on it.
#[derive(Default)]
struct RecordingCursor {
    chars: Vec<char>,
    position: usize,
    calls: Vec<String>,
}

impl RecordingCursor {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            ..Self::default()
        }
    }
}

impl InputCursor for RecordingCursor {
    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.position + offset).copied()
    }

    fn advance(&mut self, skip: bool) {
        self.position += 1;
        self.calls.push(format!("advance({skip})"));
    }

    fn mark_end(&mut self) {
        self.calls.push("mark_end".to_owned());
    }
}

#[test]
fn decline_makes_no_cursor_calls() {
    let mut cursor = RecordingCursor::new("  foo =x");
    let kind = resolve(CandidateSet::from(ConstDeclVar), &mut cursor);

    assert_eq!(kind, None);
    assert!(cursor.calls.is_empty());
    assert_eq!(cursor.position, 0);
}

#[test]
fn commit_skips_blanks_then_consumes_the_token() {
    let mut cursor = RecordingCursor::new(" \tPATH=/bin");
    let kind = resolve(CandidateSet::from(EnvVarName), &mut cursor);

    assert_eq!(kind, Some(EnvVarName));
    assert_eq!(
        cursor.calls,
        vec![
            "advance(true)",
            "advance(true)",
            "advance(false)",
            "advance(false)",
            "advance(false)",
            "advance(false)",
            "mark_end",
        ]
    );
}

#[test]
fn calls_are_independent() {
    let input = "$x";
    let mut first = StrCursor::new(input);
    first.begin_token();
    let first_kind = resolve(CandidateSet::from(DollarExpansion), &mut first);

    let mut second = StrCursor::new(input);
    second.begin_token();
    let second_kind = resolve(CandidateSet::from(DollarExpansion), &mut second);

    assert_eq!(first_kind, Some(DollarExpansion));
    assert_eq!(second_kind, Some(DollarExpansion));

    assert_eq!(first.token_span(), second.token_span());
    assert_eq!(second.position(), SourcePosition::default().after('$'));
}
