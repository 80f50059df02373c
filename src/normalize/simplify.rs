//! Pass 1: connective elimination (§4.5.1). Rewrites `A -> B` to `!A | B` and `A <-> B` to
//! `(!A | B) & (A | !B)`, bottom-up so both sides are already simplified before the rewrite at
//! this node fires.

use crate::ast::{BinaryOp, Formula};

pub fn simplify(f: Formula) -> Formula {
    match f {
        Formula::Relation(..) => f,
        Formula::Unary(op, arg) => Formula::Unary(op, Box::new(simplify(*arg))),
        Formula::Binary(BinaryOp::Implies, l, r) => {
            let l = simplify(*l);
            let r = simplify(*r);
            Formula::or(Formula::not(l), r)
        }
        Formula::Binary(BinaryOp::Iff, l, r) => {
            let l = simplify(*l);
            let r = simplify(*r);
            Formula::and(
                Formula::or(Formula::not(l.clone()), r.clone()),
                Formula::or(l, Formula::not(r)),
            )
        }
        Formula::Binary(op, l, r) => {
            Formula::Binary(op, Box::new(simplify(*l)), Box::new(simplify(*r)))
        }
        Formula::Quantifier(kind, var, body) => {
            Formula::Quantifier(kind, var, Box::new(simplify(*body)))
        }
    }
}
