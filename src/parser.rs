//! Recursive-descent, precedence-climbing parser from a [`Lexer`] token stream to a
//! [`Formula`]. Binary connectives are left-associative; `!`, `forall`, and `exists` bind
//! tightest and are themselves right-associative by virtue of recursing into
//! [`parse_operand`] rather than [`parse_formula`].

use crate::ast::{is_variable_name, BinaryOp, Formula, QuantifierKind, Term, UnaryOp};
use crate::error::ParseError;
use crate::lexer::{Lexer, Token, TokenKind};

/// Binding power, high to low: `!`/`forall`/`exists` (3), `&` (2), `|` (1), `->`/`<->` (0).
/// `Begin` is a sentinel lower than every real operator, used as the precedence floor at the
/// top of an expression or just inside an opening parenthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Begin,
    Implies,
    Or,
    And,
    Unary,
}

fn precedence_of(op: &str) -> Precedence {
    match op {
        "&" => Precedence::And,
        "|" => Precedence::Or,
        "->" | "<->" => Precedence::Implies,
        _ => Precedence::Unary,
    }
}

/// Parses an entire formula from the given lexer. Fails if trailing tokens remain after a
/// complete formula is read (mirroring `StopIteration` at top level meaning a clean finish).
pub fn parse<I>(lexer: &mut Lexer<I>) -> Result<Formula, ParseError>
where
    I: Iterator<Item = char>,
{
    parse_formula(lexer, Precedence::Begin, false, false)
}

/// Parse starting from an operand, then keep consuming binary connectives left-associatively
/// as long as the next operator outranks `floor`. `parenthesized` tracks whether we are inside
/// an explicit `( ... )`; `top_level_paren` additionally tracks whether *this* call opened that
/// parenthesis, so only it is responsible for consuming the matching `)`.
fn parse_formula<I>(
    lexer: &mut Lexer<I>,
    floor: Precedence,
    parenthesized: bool,
    top_level_paren: bool,
) -> Result<Formula, ParseError>
where
    I: Iterator<Item = char>,
{
    let mut left = parse_operand(lexer)?;

    loop {
        let peeked = lexer.peek_token()?;
        let Some(tok) = peeked else {
            if parenthesized {
                return Err(ParseError::UnexpectedEof { expected: ")", at: lexer.pos() });
            }
            return Ok(left);
        };

        match tok.kind {
            TokenKind::Bracket if tok.text == ")" => {
                if parenthesized {
                    if top_level_paren {
                        lexer.next_token()?;
                    }
                    return Ok(left);
                }
                return Err(ParseError::StrayCloseBracket { at: tok.from });
            }
            TokenKind::Operator if !matches!(tok.text.as_str(), "!" | "forall" | "exists") => {
                if floor >= precedence_of(&tok.text) {
                    return Ok(left);
                }
            }
            _ => {
                return Err(ParseError::UnexpectedToken {
                    expected: "a binary connective",
                    found: tok.text.clone(),
                    at: tok.from,
                });
            }
        }

        let op_tok = lexer.next_token()?.expect("peeked token must still be there");
        let op = binary_op(&op_tok.text);
        let right = parse_formula(lexer, precedence_of(&op_tok.text), parenthesized, false)?;
        left = Formula::Binary(op, Box::new(left), Box::new(right));
    }
}

fn binary_op(text: &str) -> BinaryOp {
    match text {
        "&" => BinaryOp::And,
        "|" => BinaryOp::Or,
        "->" => BinaryOp::Implies,
        "<->" => BinaryOp::Iff,
        _ => unreachable!("binary_op called on non-binary-connective text {text:?}"),
    }
}

/// Parse a single operand: a parenthesized formula, a relation, a negation, or a quantifier.
fn parse_operand<I>(lexer: &mut Lexer<I>) -> Result<Formula, ParseError>
where
    I: Iterator<Item = char>,
{
    let tok = require_next(lexer, "a formula")?;

    match (tok.kind, tok.text.as_str()) {
        (TokenKind::Bracket, "(") => parse_formula(lexer, Precedence::Begin, true, true),
        (TokenKind::Identifier, name) => parse_relation(lexer, name),
        (TokenKind::Operator, "!") => {
            let inner = parse_operand(lexer)?;
            Ok(Formula::Unary(UnaryOp::Not, Box::new(inner)))
        }
        (TokenKind::Operator, op @ ("forall" | "exists")) => {
            let var_tok = require_next(lexer, "a bound variable")?;
            if var_tok.kind != TokenKind::Identifier {
                return Err(ParseError::UnexpectedToken {
                    expected: "a bound variable",
                    found: var_tok.text,
                    at: var_tok.from,
                });
            }
            if !is_variable_name(&var_tok.text) {
                return Err(ParseError::InvalidBoundVariable {
                    name: var_tok.text,
                    at: var_tok.from,
                });
            }
            let kind = if op == "forall" {
                QuantifierKind::Forall
            } else {
                QuantifierKind::Exists
            };
            let body = parse_operand(lexer)?;
            Ok(Formula::Quantifier(kind, var_tok.text, Box::new(body)))
        }
        _ => Err(ParseError::UnexpectedToken {
            expected: "a formula",
            found: tok.text,
            at: tok.from,
        }),
    }
}

/// Parse a relation's argument list; `name` is the identifier already consumed.
fn parse_relation<I>(lexer: &mut Lexer<I>, name: String) -> Result<Formula, ParseError>
where
    I: Iterator<Item = char>,
{
    let args = parse_argument_list(lexer)?;
    Ok(Formula::Relation(name, args))
}

/// Shared by relations and functions: `( term , term ... )` with optional commas.
fn parse_argument_list<I>(lexer: &mut Lexer<I>) -> Result<Vec<Term>, ParseError>
where
    I: Iterator<Item = char>,
{
    let open = require_next(lexer, "(")?;
    if !(open.kind == TokenKind::Bracket && open.text == "(") {
        return Err(ParseError::UnexpectedToken {
            expected: "an open bracket",
            found: open.text,
            at: open.from,
        });
    }

    let mut terms = Vec::new();
    loop {
        let tok = require_next(lexer, "an argument or closing bracket")?;
        match (tok.kind, tok.text.as_str()) {
            (TokenKind::Bracket, ")") => break,
            (TokenKind::Comma, _) => continue,
            (TokenKind::Identifier, name) => {
                terms.push(parse_term(lexer, name.to_string())?);
            }
            _ => {
                return Err(ParseError::UnexpectedToken {
                    expected: "an argument",
                    found: tok.text,
                    at: tok.from,
                });
            }
        }
    }

    Ok(terms)
}

/// Parse a term whose leading identifier (`name`) has already been consumed; disambiguates
/// constant, variable, or function by peeking for a following `(`.
fn parse_term<I>(lexer: &mut Lexer<I>, name: String) -> Result<Term, ParseError>
where
    I: Iterator<Item = char>,
{
    let is_function = matches!(
        lexer.peek_token()?,
        Some(tok) if tok.kind == TokenKind::Bracket && tok.text == "("
    );

    if is_function {
        let at = lexer.peek_token()?.unwrap().from;
        let args = parse_argument_list(lexer)?;
        if args.is_empty() {
            return Err(ParseError::ZeroArityFunction { name, at });
        }
        return Ok(Term::Function(name, args));
    }

    if is_variable_name(&name) {
        Ok(Term::Variable(name))
    } else {
        Ok(Term::Constant(name))
    }
}

fn require_next<I>(lexer: &mut Lexer<I>, expected: &'static str) -> Result<Token, ParseError>
where
    I: Iterator<Item = char>,
{
    match lexer.next_token()? {
        Some(tok) => Ok(tok),
        None => Err(ParseError::UnexpectedEof {
            expected,
            at: lexer.pos(),
        }),
    }
}

/// Convenience entry point: parse a complete formula from a string.
pub fn parse_str(input: &str) -> Result<Formula, ParseError> {
    let mut lexer = Lexer::new(input.chars());
    parse(&mut lexer)
}
