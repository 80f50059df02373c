//! Pass 4: prenex (§4.5.4). Pulls every quantifier to the front. Variables are already
//! standardized apart (pass 3 ran first), so no capture is possible and a quantifier can move
//! out through `&`/`|` regardless of whether its variable occurs on the other side.

use crate::ast::{BinaryOp, Formula, QuantifierKind, UnaryOp};
use crate::error::EngineError;

/// A formula pulled into prenex form: a front-to-back list of quantifiers (outermost first)
/// followed by a quantifier-free matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prenex {
    pub prefix: Vec<(QuantifierKind, String)>,
    pub matrix: Formula,
}

pub fn prenex(f: Formula) -> Result<Prenex, EngineError> {
    match f {
        Formula::Relation(..) => Ok(Prenex { prefix: Vec::new(), matrix: f }),

        Formula::Unary(UnaryOp::Not, inner) => match *inner {
            Formula::Relation(..) => {
                Ok(Prenex { prefix: Vec::new(), matrix: Formula::not(*inner) })
            }
            // NNF guarantees `!` sits directly above a relation; this arm only exists to
            // defensively handle a stray `!` over a quantifier, per §4.5.4.
            other => {
                let inner = prenex(other)?;
                let prefix = inner.prefix.into_iter().map(|(k, v)| (flip(k), v)).collect();
                Ok(Prenex { prefix, matrix: Formula::not(inner.matrix) })
            }
        },

        Formula::Binary(op @ (BinaryOp::And | BinaryOp::Or), l, r) => {
            let left = prenex(*l)?;
            let right = prenex(*r)?;
            // Tie-break (open question i, §9): continue the right subtree's quantifier chain
            // outermost-first, then append the left subtree's chain innermost.
            let mut prefix = right.prefix;
            prefix.extend(left.prefix);
            Ok(Prenex {
                prefix,
                matrix: Formula::Binary(op, Box::new(left.matrix), Box::new(right.matrix)),
            })
        }

        Formula::Binary(op @ (BinaryOp::Implies | BinaryOp::Iff), ..) => Err(
            EngineError::internal(format!("prenex: {op:?} reached prenexing unsimplified")),
        ),

        Formula::Quantifier(kind, var, body) => {
            let inner = prenex(*body)?;
            let mut prefix = vec![(kind, var)];
            prefix.extend(inner.prefix);
            Ok(Prenex { prefix, matrix: inner.matrix })
        }
    }
}

fn flip(kind: QuantifierKind) -> QuantifierKind {
    match kind {
        QuantifierKind::Forall => QuantifierKind::Exists,
        QuantifierKind::Exists => QuantifierKind::Forall,
    }
}
