use crate::cursor::StrCursor;
use crate::{
    CandidateSet, ScannedToken, Scanner, ScannerError, ScannerOptions, SourcePosition,
};

pub use scan_session_builder::State as ScanSessionBuilderState;

impl<'a, S: scan_session_builder::IsComplete> ScanSessionBuilder<'a, S> {
    /// Returns a session configured from the builder.
    pub fn build(self) -> ScanSession<'a> {
        let settings = self.build_settings();
        ScanSession::new(settings.input, &settings.options)
    }
}

/// Settings for creating a new scan session.
#[derive(Clone, Debug, bon::Builder)]
#[builder(
    builder_type(
        name = ScanSessionBuilder,
        doc {
        /// Builder for [`ScanSession`]
    }),
    finish_fn(
        name = build_settings,
        vis = "pub(self)",
    ),
    start_fn(
        vis = "pub(self)"
    )
)]
pub struct SessionSettings<'a> {
    /// The source text to scan.
    #[builder(start_fn)]
    pub input: &'a str,
    /// Options controlling how the scanner operates.
    #[builder(default)]
    pub options: ScannerOptions,
}

/// Drives the scanner over an in-memory input, one token request at a time,
/// the way a host parser would.
#[derive(Clone, Debug)]
pub struct ScanSession<'a> {
    cursor: StrCursor<'a>,
    scanner: Scanner,
}

impl<'a> ScanSession<'a> {
    /// Returns a builder for a session over `input`.
    ///
    /// # Arguments
    ///
    /// * `input` - The source text to scan.
    pub fn builder(input: &'a str) -> ScanSessionBuilder<'a, scan_session_builder::Empty> {
        SessionSettings::builder(input)
    }

    /// Returns a session positioned at the start of `input`.
    ///
    /// # Arguments
    ///
    /// * `input` - The source text to scan.
    /// * `options` - Options controlling how the scanner operates.
    pub fn new(input: &'a str, options: &ScannerOptions) -> Self {
        Self {
            cursor: StrCursor::new(input),
            scanner: Scanner::new(options.clone()),
        }
    }

    /// Requests one token. On a decline, nothing is consumed.
    ///
    /// # Arguments
    ///
    /// * `candidates` - The token kinds currently valid in the grammar.
    pub fn next_token(&mut self, candidates: CandidateSet) -> Option<ScannedToken> {
        self.cursor.begin_token();

        let kind = self.scanner.resolve(candidates, &mut self.cursor)?;

        Some(ScannedToken {
            kind,
            text: self.cursor.token_text().to_owned(),
            span: self.cursor.token_span(),
        })
    }

    /// Returns the current position in the input.
    pub const fn position(&self) -> SourcePosition {
        self.cursor.position()
    }

    /// Returns the not-yet-consumed remainder of the input.
    pub fn remaining(&self) -> &'a str {
        self.cursor.remaining()
    }

    /// Returns true once only blanks (or nothing) remain.
    pub fn is_exhausted(&self) -> bool {
        self.remaining().trim_start_matches([' ', '\t']).is_empty()
    }
}

/// Scans a whole input, asking `candidates_fn` which token kinds are valid
/// before each request.
///
/// # Arguments
///
/// * `input` - The source text to scan.
/// * `options` - Options controlling how the scanner operates.
/// * `candidates_fn` - Called with the current position and the remaining input;
///   returns the candidate set for the next request.
pub fn scan_with<F>(
    input: &str,
    options: &ScannerOptions,
    mut candidates_fn: F,
) -> Result<Vec<ScannedToken>, ScannerError>
where
    F: FnMut(SourcePosition, &str) -> CandidateSet,
{
    let mut session = ScanSession::new(input, options);

    tracing::debug!(target: "scan", "Scanning...");

    let mut tokens = vec![];
    while !session.is_exhausted() {
        let candidates = candidates_fn(session.position(), session.remaining());
        let Some(token) = session.next_token(candidates) else {
            return Err(ScannerError::NoTokenAt(session.position()));
        };

        tracing::debug!(target: "scan", "TOKEN {}: {:?}", tokens.len(), token);
        tokens.push(token);
    }

    tracing::debug!(target: "scan", "  => {} token(s)", tokens.len());

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DollarSpan;
    use crate::TokenKind::{self, *};
    use anyhow::Result;
    use pretty_assertions::assert_eq;

    fn render(tokens: &[ScannedToken]) -> String {
        tokens
            .iter()
            .map(|t| format!("{}@{} {:?}", t.kind, t.span.start, t.text))
            .collect::<Vec<_>>()
            .join("\n")
    }

    const PUNCTUATION_AND_DOLLAR: &[TokenKind] = &[
        Comma,
        Semicolon,
        CloseParen,
        CloseBrace,
        CloseBracket,
        ClosingList,
        DollarExpansion,
        TerminatorSentinel,
    ];

    #[test]
    fn scan_punctuation_stream() -> Result<()> {
        let input = "$? , $# ;\n) $*}]|";
        let tokens = scan_with(input, &ScannerOptions::default(), |_, _| {
            CandidateSet::of(PUNCTUATION_AND_DOLLAR)
        })?;

        insta::assert_snapshot!(render(&tokens), @r#"
        dollar_expansion@1,1 "$?"
        comma@1,4 ","
        dollar_expansion@1,6 "$#"
        semicolon@1,9 ";"
        _newline@1,10 "\n"
        close_paren@2,1 ")"
        dollar_expansion@2,3 "$*"
        close_brace@2,5 "}"
        close_bracket@2,6 "]"
        closing_list@2,7 "|"
        "#);
        Ok(())
    }

    #[test]
    fn spans_reconstruct_the_input_without_blanks() -> Result<()> {
        let input = "  $? , $# ;\n) $*}]|  ";
        let tokens = scan_with(input, &ScannerOptions::default(), |_, _| {
            CandidateSet::of(PUNCTUATION_AND_DOLLAR)
        })?;

        let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect();
        let expected: String = input.chars().filter(|c| !matches!(c, ' ' | '\t')).collect();
        assert_eq!(rebuilt, expected);

        for token in &tokens {
            assert_eq!(input.get(token.span.byte_range()), Some(token.text.as_str()));
        }
        Ok(())
    }

    #[test]
    fn const_declaration_then_equals() -> Result<()> {
        let tokens = scan_with("answer = ", &ScannerOptions::default(), |_, rest| {
            if rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
                CandidateSet::from(ConstDeclVar)
            } else {
                CandidateSet::from(NamedParamEq)
            }
        })?;

        let kinds: Vec<_> = tokens.iter().map(|t| (t.kind, t.text.as_str())).collect();
        assert_eq!(kinds, vec![(ConstDeclVar, "answer"), (NamedParamEq, "=")]);
        Ok(())
    }

    #[test]
    fn decline_is_reported_with_position() {
        let result = scan_with("; x", &ScannerOptions::default(), |_, _| {
            CandidateSet::from(Semicolon)
        });

        assert!(matches!(
            result,
            Err(ScannerError::NoTokenAt(position))
                if position.index == 1 && position.to_string() == "1,2"
        ));
    }

    #[test]
    fn session_decline_leaves_input() {
        let mut session = ScanSession::new("bar", &ScannerOptions::default());
        assert_eq!(session.next_token(CandidateSet::from(ByteStringMarker)), None);
        assert_eq!(session.remaining(), "bar");
        assert_eq!(session.position(), SourcePosition::default());
    }

    #[test]
    fn builder_defaults_options() {
        let session = ScanSession::builder("$x").build();
        assert_eq!(session.scanner.options(), &ScannerOptions::default());
        assert_eq!(session.remaining(), "$x");
    }

    #[test]
    fn builder_takes_options() {
        let mut session = ScanSession::builder("$* x")
            .options(
                ScannerOptions::builder()
                    .dollar_span(DollarSpan::SigilOnly)
                    .build(),
            )
            .build();

        let token = session.next_token(CandidateSet::from(DollarExpansion));
        assert_eq!(token.map(|t| t.text), Some("$".to_owned()));
        assert_eq!(session.remaining(), "* x");
    }

    #[test]
    fn tokens_serialize_round_trip() -> Result<()> {
        let tokens = scan_with(";", &ScannerOptions::default(), |_, _| {
            CandidateSet::from(Semicolon)
        })?;

        let json = serde_json::to_string(&tokens)?;
        insta::assert_snapshot!(json, @r#"[{"kind":"Semicolon","text":";","span":{"start":{"index":0,"byte_offset":0,"line":1,"column":1},"end":{"index":1,"byte_offset":1,"line":1,"column":2}}}]"#);

        let parsed: Vec<ScannedToken> = serde_json::from_str(&json)?;
        assert_eq!(parsed, tokens);
        Ok(())
    }

    #[test]
    fn empty_input_scans_to_nothing() -> Result<()> {
        let tokens = scan_with(" \t", &ScannerOptions::default(), |_, _| CandidateSet::all())?;
        assert!(tokens.is_empty());
        Ok(())
    }
}
