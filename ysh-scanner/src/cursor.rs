//! The input cursor through which the scanner reads source text.

use crate::{SourcePosition, SourceSpan};

/// The host's view of the input at the position where a token is requested.
///
/// A cursor tracks a *pending token*: it starts wherever the host began the
/// request, moves past insignificant whitespace advanced with `skip`, and ends
/// either at the position frozen by [`InputCursor::mark_end`] or, if that was
/// never called, at the current position.
pub trait InputCursor {
    /// Returns the character `offset` positions past the current lookahead,
    /// without consuming anything. `peek(0)` is the lookahead itself. Returns
    /// `None` past the end of the input.
    fn peek(&self, offset: usize) -> Option<char>;

    /// Consumes the lookahead character.
    ///
    /// # Arguments
    ///
    /// * `skip` - If true, the character is insignificant whitespace; when no
    ///   significant character has been consumed yet, the pending token's start
    ///   moves past it.
    fn advance(&mut self, skip: bool);

    /// Freezes the pending token's end at the current position.
    fn mark_end(&mut self);

    /// Returns the current lookahead character.
    fn lookahead(&self) -> Option<char> {
        self.peek(0)
    }
}

/// An [`InputCursor`] over an in-memory string.
#[derive(Clone, Debug)]
pub struct StrCursor<'a> {
    input: &'a str,
    /// The input's characters, indexed by [`SourcePosition::index`].
    chars: Vec<char>,
    position: SourcePosition,
    token_start: SourcePosition,
    token_end: Option<SourcePosition>,
    started: bool,
}

impl<'a> StrCursor<'a> {
    /// Returns a cursor positioned at the start of `input`.
    ///
    /// # Arguments
    ///
    /// * `input` - The source text to read.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().collect(),
            position: SourcePosition::default(),
            token_start: SourcePosition::default(),
            token_end: None,
            started: false,
        }
    }

    /// Starts a new pending token at the current position.
    pub const fn begin_token(&mut self) {
        self.token_start = self.position;
        self.token_end = None;
        self.started = false;
    }

    /// Returns the current position of the cursor.
    pub const fn position(&self) -> SourcePosition {
        self.position
    }

    /// Returns the not-yet-consumed remainder of the input.
    pub fn remaining(&self) -> &'a str {
        self.input.get(self.position.byte_offset..).unwrap_or_default()
    }

    /// Returns true once every character has been consumed.
    pub fn is_at_end(&self) -> bool {
        self.remaining().is_empty()
    }

    /// Returns the span of the pending token.
    pub fn token_span(&self) -> SourceSpan {
        SourceSpan {
            start: self.token_start,
            end: self.token_end.unwrap_or(self.position),
        }
    }

    /// Returns the text of the pending token.
    pub fn token_text(&self) -> &'a str {
        self.input
            .get(self.token_span().byte_range())
            .unwrap_or_default()
    }
}

impl InputCursor for StrCursor<'_> {
    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.position.index + offset).copied()
    }

    fn advance(&mut self, skip: bool) {
        let Some(c) = self.lookahead() else {
            return;
        };

        self.position = self.position.after(c);

        if !skip {
            self.started = true;
        } else if !self.started {
            self.token_start = self.position;
        }
    }

    fn mark_end(&mut self) {
        self.token_end = Some(self.position);
    }
}
