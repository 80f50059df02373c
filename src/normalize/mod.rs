//! The normal-form pipeline (§4.5): six pure passes taking a user's formula down to Skolemized
//! CNF. Each pass is a plain `Formula -> Formula` function (or `-> Result<Formula, EngineError>`
//! where it can observe an internal invariant violation), composed here by straight-line
//! bindings rather than a generic visitor — matching how the pipeline this crate started from
//! chains its own passes.

mod distribute;
mod nnf;
mod prenex;
mod simplify;
mod skolemize;
mod standardize;

pub use distribute::distribute;
pub use nnf::nnf;
pub use prenex::{prenex, Prenex};
pub use simplify::simplify;
pub use standardize::standardize;

use log::trace;

use crate::ast::Formula;
use crate::error::EngineError;
use crate::symbols::VariableStandardizer;

/// Run every pass in order: simplify, NNF, standardize, prenex, Skolemize, distribute. The
/// result contains only `And`/`Or`/`Not`/`Relation` over ground terms (§3 invariant 1), ready
/// for [`crate::clause::extract_clauses`].
pub fn to_cnf(formula: Formula, std: &mut VariableStandardizer) -> Result<Formula, EngineError> {
    trace!("normalize: input  {formula}");

    let simplified = simplify(formula);
    trace!("normalize: simplify -> {simplified}");

    let in_nnf = nnf(simplified)?;
    trace!("normalize: nnf -> {in_nnf}");

    let standardized = standardize(in_nnf, std);
    trace!("normalize: standardize -> {standardized}");

    let in_prenex = prenex(standardized)?;
    trace!("normalize: prenex prefix {:?}", in_prenex.prefix);

    let skolemized = skolemize::skolemize(in_prenex, std)?;
    trace!("normalize: skolemize -> {skolemized}");

    let cnf = distribute(skolemized)?;
    trace!("normalize: distribute -> {cnf}");

    Ok(cnf)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::parse_str;
    use crate::symbols::SymbolManager;

    fn run(src: &str) -> Formula {
        let mut mgr = SymbolManager::new();
        let mut std = mgr.standardizer();
        to_cnf(parse_str(src).unwrap(), &mut std).unwrap()
    }

    fn is_cnf_shape(f: &Formula) -> bool {
        use crate::ast::{BinaryOp, UnaryOp};
        fn literal_or_quantified_away(f: &Formula) -> bool {
            matches!(f, Formula::Relation(..))
                || matches!(f, Formula::Unary(UnaryOp::Not, inner) if matches!(**inner, Formula::Relation(..)))
        }
        match f {
            Formula::Binary(BinaryOp::And, l, r) => is_cnf_shape(l) && is_cnf_shape(r),
            Formula::Binary(BinaryOp::Or, l, r) => is_cnf_shape(l) && is_cnf_shape(r),
            other => literal_or_quantified_away(other),
        }
    }

    #[test]
    fn full_pipeline_produces_cnf_shape() {
        let f = run("forall x (exists y ((A(x) -> B(y)) & (C(x) <-> D(y))))");
        assert!(is_cnf_shape(&f));
    }

    #[test]
    fn no_quantifiers_survive() {
        fn has_quantifier(f: &Formula) -> bool {
            match f {
                Formula::Quantifier(..) => true,
                Formula::Binary(_, l, r) => has_quantifier(l) || has_quantifier(r),
                Formula::Unary(_, arg) => has_quantifier(arg),
                Formula::Relation(..) => false,
            }
        }
        let f = run("forall x (exists y R(x, y))");
        assert!(!has_quantifier(&f));
    }
}
