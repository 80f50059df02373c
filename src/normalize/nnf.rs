//! Pass 2: negation normal form (§4.5.2). Pushes `!` inward via De Morgan, dual quantifiers,
//! and double-negation elimination until every `!` sits directly above a relation. Assumes
//! `Implies`/`Iff` have already been eliminated by [`super::simplify`]; encountering one here is
//! an internal invariant violation.

use crate::ast::{BinaryOp, Formula, QuantifierKind, UnaryOp};
use crate::error::EngineError;

pub fn nnf(f: Formula) -> Result<Formula, EngineError> {
    match f {
        Formula::Relation(..) => Ok(f),

        Formula::Unary(UnaryOp::Not, inner) => push_not(*inner),

        Formula::Binary(BinaryOp::And, l, r) => Ok(Formula::and(nnf(*l)?, nnf(*r)?)),
        Formula::Binary(BinaryOp::Or, l, r) => Ok(Formula::or(nnf(*l)?, nnf(*r)?)),

        Formula::Binary(op @ (BinaryOp::Implies | BinaryOp::Iff), ..) => Err(EngineError::internal(
            format!("NNF: {op:?} reached negation normal form; simplify() should have removed it"),
        )),

        Formula::Quantifier(kind, var, body) => {
            Ok(Formula::Quantifier(kind, var, Box::new(nnf(*body)?)))
        }
    }
}

/// Push a negation one level inward over `inner`, then continue normalizing what results.
fn push_not(inner: Formula) -> Result<Formula, EngineError> {
    match inner {
        Formula::Relation(..) => Ok(Formula::not(inner)),

        // Double-negation elimination: !!A => A.
        Formula::Unary(UnaryOp::Not, inner2) => nnf(*inner2),

        // De Morgan: !(A & B) => !A | !B, !(A | B) => !A & !B.
        Formula::Binary(BinaryOp::And, l, r) => {
            Ok(Formula::or(push_not(*l)?, push_not(*r)?))
        }
        Formula::Binary(BinaryOp::Or, l, r) => {
            Ok(Formula::and(push_not(*l)?, push_not(*r)?))
        }

        Formula::Binary(op @ (BinaryOp::Implies | BinaryOp::Iff), ..) => Err(EngineError::internal(
            format!("NNF: {op:?} reached negation normal form; simplify() should have removed it"),
        )),

        // Dual quantifiers: !forall x. A => exists x. !A, and vice versa.
        Formula::Quantifier(QuantifierKind::Forall, var, body) => {
            Ok(Formula::Quantifier(QuantifierKind::Exists, var, Box::new(push_not(*body)?)))
        }
        Formula::Quantifier(QuantifierKind::Exists, var, body) => {
            Ok(Formula::Quantifier(QuantifierKind::Forall, var, Box::new(push_not(*body)?)))
        }
    }
}
