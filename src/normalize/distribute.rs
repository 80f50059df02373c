//! Pass 6: CNF distribution (§4.5.6). Distributes `|` over `&`. Each subtree is implicitly
//! "annotated" with the number of conjuncts it will contribute once fully distributed; when
//! distributing an `Or`, the side with the higher count is the one split (its two halves each
//! get a copy of the other side), since that duplicates the smaller side rather than the
//! larger one. Ties go left. This only affects how large the result is, never whether it is a
//! correct CNF.

use crate::ast::{BinaryOp, Formula, UnaryOp};
use crate::error::EngineError;

pub fn distribute(f: Formula) -> Result<Formula, EngineError> {
    match f {
        Formula::Relation(..) => Ok(f),
        Formula::Unary(UnaryOp::Not, inner) => {
            if matches!(*inner, Formula::Relation(..)) {
                Ok(Formula::Unary(UnaryOp::Not, inner))
            } else {
                Err(EngineError::internal(
                    "CNF distribution: a negation did not sit directly above a relation",
                ))
            }
        }
        Formula::Binary(BinaryOp::And, l, r) => Ok(Formula::and(distribute(*l)?, distribute(*r)?)),
        Formula::Binary(BinaryOp::Or, l, r) => {
            Ok(distribute_or(distribute(*l)?, distribute(*r)?))
        }
        other => Err(EngineError::internal(format!(
            "CNF distribution: unexpected node in the matrix: {other:?}"
        ))),
    }
}

fn conjunct_count(f: &Formula) -> u64 {
    match f {
        Formula::Binary(BinaryOp::And, l, r) => conjunct_count(l) + conjunct_count(r),
        Formula::Binary(BinaryOp::Or, l, r) => conjunct_count(l).max(1) * conjunct_count(r).max(1),
        _ => 1,
    }
}

fn is_and(f: &Formula) -> bool {
    matches!(f, Formula::Binary(BinaryOp::And, _, _))
}

/// Distribute `l | r`, where both `l` and `r` are already fully distributed (each is a
/// conjunction of disjunctions-of-literals, a single disjunction, or a literal).
fn distribute_or(l: Formula, r: Formula) -> Formula {
    if !is_and(&l) && !is_and(&r) {
        return Formula::or(l, r);
    }

    let push_left = if is_and(&l) && is_and(&r) {
        conjunct_count(&l) >= conjunct_count(&r)
    } else {
        is_and(&l)
    };

    if push_left {
        if let Formula::Binary(BinaryOp::And, la, lb) = l {
            return Formula::and(distribute_or(*la, r.clone()), distribute_or(*lb, r));
        }
        unreachable!("push_left implies l is an And node");
    }

    if let Formula::Binary(BinaryOp::And, ra, rb) = r {
        return Formula::and(distribute_or(l.clone(), *ra), distribute_or(l, *rb));
    }
    unreachable!("push_left false with an And present implies r is an And node");
}
