//! Scans a file for punctuation and expansions, reporting failures with miette.

use miette::{IntoDiagnostic, LabeledSpan, NamedSource, miette};
use ysh_scanner::TokenKind::{
    CloseBrace, CloseBracket, CloseParen, ClosingList, Comma, DollarExpansion, HatExpansion,
    Semicolon, TerminatorSentinel,
};
use ysh_scanner::{CandidateSet, ScannerError, ScannerOptions, scan_with};

const CANDIDATES: CandidateSet = CandidateSet::of(&[
    Comma,
    Semicolon,
    CloseParen,
    CloseBrace,
    CloseBracket,
    ClosingList,
    DollarExpansion,
    HatExpansion,
    TerminatorSentinel,
]);

fn main() -> miette::Result<()> {
    let f = std::env::args()
        .nth(1)
        .ok_or_else(|| miette!("Please provide a file name"))?;

    let source = std::fs::read_to_string(&f).into_diagnostic()?;

    match scan_with(&source, &ScannerOptions::default(), |_, _| CANDIDATES) {
        Ok(tokens) => {
            for token in &tokens {
                let span = miette::SourceSpan::from(token);
                println!("{:>6} {:<20} {:?}", span.offset(), token.kind, token.text);
            }
            Ok(())
        }
        Err(ScannerError::NoTokenAt(position)) => Err(miette!(
            labels = vec![LabeledSpan::at_offset(
                position.byte_offset,
                "no candidate matches here"
            )],
            "scanning stopped at {position}"
        )
        .with_source_code(NamedSource::new(f, source))),
        Err(e) => Err(e).into_diagnostic(),
    }
}
