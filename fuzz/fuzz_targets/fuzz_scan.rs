#![no_main]
#![allow(missing_docs)]

use libfuzzer_sys::fuzz_target;
use ysh_scanner::{CandidateSet, ScannerOptions, ScanSession, TokenKind};

fuzz_target!(|input: (CandidateSet, String)| {
    let (candidates, text) = input;
    let mut session = ScanSession::new(&text, &ScannerOptions::default());

    match session.next_token(candidates) {
        None => assert_eq!(session.remaining(), text.as_str()),
        Some(token) => {
            assert!(!token.text.is_empty());
            assert!(!token.kind.is_sentinel());
            assert!(candidates.contains(token.kind) || token.kind == TokenKind::Newline);
            assert_eq!(text.get(token.span.byte_range()), Some(token.text.as_str()));
        }
    }
});
