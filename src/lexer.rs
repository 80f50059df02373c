//! Tokenizer over FOL source text. Generic over any `Iterator<Item = char>` so callers can feed
//! it a `String`'s `.chars()` or a chunked stream; an identifier may not span a chunk boundary
//! (the lexer never buffers across a `None` the iterator hasn't actually produced — a true
//! chunked source must concatenate before handing chars over).

use crate::error::ParseError;

/// A coordinate in the input: byte-ish character index plus 1-based line/column, matching the
/// position bookkeeping used throughout this crate's diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct InputCoord {
    pub pos: usize,
    pub line: usize,
    pub col: usize,
}

impl InputCoord {
    pub fn start() -> Self {
        Self { pos: 0, line: 1, col: 1 }
    }

    fn newline(&mut self) {
        self.pos += 1;
        self.line += 1;
        self.col = 1;
    }

    fn advance(&mut self) {
        self.pos += 1;
        self.col += 1;
    }
}

impl std::fmt::Display for InputCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// The kind of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `!`, `&`, `|`, `->`, `<->`, `forall`, `exists`.
    Operator,
    /// A maximal run of alphanumerics that isn't a keyword.
    Identifier,
    /// `(` or `)`.
    Bracket,
    /// `,`.
    Comma,
}

/// A single lexed token: its kind, its exact source text, and the range it spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub from: InputCoord,
    pub to: InputCoord,
}

/// The tokenizer. Supports one token of lookahead via [`Lexer::peek`].
pub struct Lexer<I>
where
    I: Iterator<Item = char>,
{
    pos: InputCoord,
    buf: String,
    la: Option<char>,
    itr: I,
    peeked: Option<Option<Token>>,
}

const KEYWORDS: &[&str] = &["forall", "exists"];

impl<I> Lexer<I>
where
    I: Iterator<Item = char>,
{
    pub fn new(mut itr: I) -> Self {
        Self {
            pos: InputCoord::start(),
            buf: String::new(),
            la: itr.next(),
            itr,
            peeked: None,
        }
    }

    /// The coordinate the lexer is currently positioned at.
    pub fn pos(&self) -> InputCoord {
        self.pos
    }

    fn shift(&mut self) {
        let Some(c) = self.la else { return };
        self.la = self.itr.next();
        if c == '\n' {
            self.pos.newline();
        } else {
            self.pos.advance();
        }
    }

    fn push_shift(&mut self) {
        if let Some(c) = self.la {
            self.buf.push(c);
        }
        self.shift();
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.la, Some(c) if c.is_whitespace()) {
            self.shift();
        }
    }

    fn ident(&mut self) -> String {
        while matches!(self.la, Some(c) if c.is_ascii_alphanumeric()) {
            self.push_shift();
        }
        self.buf.clone()
    }

    fn read_token(&mut self) -> Result<Option<Token>, ParseError> {
        self.skip_whitespace();
        self.buf.clear();
        let from = self.pos;

        let Some(c) = self.la else { return Ok(None) };

        let (text, kind) = match c {
            c if c.is_ascii_alphanumeric() => {
                let text = self.ident();
                let kind = if KEYWORDS.contains(&text.as_str()) {
                    TokenKind::Operator
                } else {
                    TokenKind::Identifier
                };
                (text, kind)
            }
            '!' | '&' | '|' => {
                self.push_shift();
                (self.buf.clone(), TokenKind::Operator)
            }
            '-' => {
                self.push_shift();
                match self.la {
                    Some('>') => {
                        self.push_shift();
                        (self.buf.clone(), TokenKind::Operator)
                    }
                    _ => {
                        return Err(ParseError::UnrecognizedChar { ch: '-', at: from });
                    }
                }
            }
            '<' => {
                self.push_shift();
                match self.la {
                    Some('-') => {
                        self.push_shift();
                        match self.la {
                            Some('>') => {
                                self.push_shift();
                                (self.buf.clone(), TokenKind::Operator)
                            }
                            _ => {
                                return Err(ParseError::UnrecognizedChar { ch: '<', at: from });
                            }
                        }
                    }
                    _ => return Err(ParseError::UnrecognizedChar { ch: '<', at: from }),
                }
            }
            '(' | ')' => {
                self.push_shift();
                (self.buf.clone(), TokenKind::Bracket)
            }
            ',' => {
                self.push_shift();
                (self.buf.clone(), TokenKind::Comma)
            }
            other => {
                return Err(ParseError::UnrecognizedChar { ch: other, at: from });
            }
        };

        let to = self.pos;
        Ok(Some(Token { kind, text, from, to }))
    }

    /// Consume and return the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        if let Some(t) = self.peeked.take() {
            return Ok(t);
        }
        self.read_token()
    }

    /// Look at the next token without consuming it.
    pub fn peek_token(&mut self) -> Result<Option<&Token>, ParseError> {
        if self.peeked.is_none() {
            self.peeked = Some(self.read_token()?);
        }
        Ok(self.peeked.as_ref().unwrap().as_ref())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn lex_all(s: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(s.chars());
        let mut out = Vec::new();
        while let Some(tok) = lexer.next_token().unwrap() {
            out.push(tok);
        }
        out
    }

    #[test]
    fn lexes_quantified_relation() {
        let toks = lex_all("forall x (exists y (!R(x, y)))");
        let texts: Vec<&str> = toks.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "forall", "x", "(", "exists", "y", "(", "!", "R", "(", "x", ",", "y", ")", ")",
                ")"
            ]
        );
    }

    #[test]
    fn lexes_all_operators() {
        let toks = lex_all("! & | -> <->");
        let texts: Vec<&str> = toks.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["!", "&", "|", "->", "<->"]);
        assert!(toks.iter().all(|t| t.kind == TokenKind::Operator));
    }

    #[test]
    fn round_trip_lex_print() {
        let original = "forall x (R(x, f(0)) & !Q(x))";
        let toks = lex_all(original);
        let rejoined = toks
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(lex_all(&rejoined), lex_all(original));
    }

    #[test]
    fn rejects_bad_character() {
        let mut lexer = Lexer::new("R(x) @ S(y)".chars());
        loop {
            match lexer.next_token() {
                Ok(Some(_)) => continue,
                Ok(None) => panic!("expected an error"),
                Err(ParseError::UnrecognizedChar { ch, .. }) => {
                    assert_eq!(ch, '@');
                    break;
                }
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn peek_does_not_consume() {
        let mut lexer = Lexer::new("A & B".chars());
        let peeked = lexer.peek_token().unwrap().cloned();
        let next = lexer.next_token().unwrap();
        assert_eq!(peeked, next);
    }
}
