//! Pass 5: Skolemization (§4.5.5). Walks the quantifier prefix front-to-back; each `exists y`
//! mints a fresh Skolem function of the enclosing universals (or a Skolem constant, if none
//! enclose it — arity-0 functions are forbidden, §3), and each `forall x` extends the
//! enclosing-universals list. The quantifiers are then gone and every existential reference in
//! the matrix is replaced by its Skolem term.

use rustc_hash::FxHashMap;

use crate::ast::{Formula, QuantifierKind, Term};
use crate::error::EngineError;
use crate::normalize::prenex::Prenex;
use crate::symbols::VariableStandardizer;

pub fn skolemize(p: Prenex, std: &mut VariableStandardizer) -> Result<Formula, EngineError> {
    let mut universals: Vec<String> = Vec::new();
    let mut replacements: FxHashMap<String, Term> = FxHashMap::default();

    for (kind, var) in p.prefix {
        match kind {
            QuantifierKind::Forall => universals.push(var),
            QuantifierKind::Exists => {
                let skolem_name = std.fresh_skolem();
                let term = if universals.is_empty() {
                    Term::Constant(skolem_name)
                } else {
                    Term::Function(
                        skolem_name,
                        universals.iter().map(|u| Term::Variable(u.clone())).collect(),
                    )
                };
                replacements.insert(var, term);
            }
        }
    }

    substitute(&p.matrix, &replacements)
}

fn substitute(f: &Formula, replacements: &FxHashMap<String, Term>) -> Result<Formula, EngineError> {
    match f {
        Formula::Relation(name, args) => Ok(Formula::Relation(
            name.clone(),
            args.iter().map(|t| substitute_term(t, replacements)).collect(),
        )),
        Formula::Unary(op, arg) => Ok(Formula::Unary(*op, Box::new(substitute(arg, replacements)?))),
        Formula::Binary(op, l, r) => Ok(Formula::Binary(
            *op,
            Box::new(substitute(l, replacements)?),
            Box::new(substitute(r, replacements)?),
        )),
        Formula::Quantifier(..) => Err(EngineError::internal(
            "Skolemization: a quantifier remained in the matrix after the prefix was consumed",
        )),
    }
}

fn substitute_term(t: &Term, replacements: &FxHashMap<String, Term>) -> Term {
    match t {
        Term::Variable(name) => replacements.get(name).cloned().unwrap_or_else(|| t.clone()),
        Term::Constant(_) => t.clone(),
        Term::Function(name, args) => Term::Function(
            name.clone(),
            args.iter().map(|a| substitute_term(a, replacements)).collect(),
        ),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ast::QuantifierKind::*;
    use crate::symbols::SymbolManager;

    fn rel(name: &str, args: Vec<Term>) -> Formula {
        Formula::Relation(name.to_string(), args)
    }

    #[test]
    fn existential_with_no_enclosing_universal_becomes_a_constant() {
        let mut mgr = SymbolManager::new();
        let mut std = mgr.standardizer();
        let p = Prenex {
            prefix: vec![(Exists, "y".into())],
            matrix: rel("P", vec![Term::Variable("y".into())]),
        };
        let f = skolemize(p, &mut std).unwrap();
        match f {
            Formula::Relation(_, args) => assert!(matches!(args[0], Term::Constant(_))),
            _ => panic!(),
        }
    }

    #[test]
    fn existential_with_enclosing_universal_becomes_a_function_of_it() {
        let mut mgr = SymbolManager::new();
        let mut std = mgr.standardizer();
        let p = Prenex {
            prefix: vec![(Forall, "x".into()), (Exists, "y".into())],
            matrix: rel("P", vec![Term::Variable("x".into()), Term::Variable("y".into())]),
        };
        let f = skolemize(p, &mut std).unwrap();
        match f {
            Formula::Relation(_, args) => {
                assert_eq!(args[0], Term::Variable("x".into()));
                match &args[1] {
                    Term::Function(_, fargs) => assert_eq!(fargs, &vec![Term::Variable("x".into())]),
                    other => panic!("expected a function term, got {other:?}"),
                }
            }
            _ => panic!(),
        }
    }

    #[test]
    fn skolem_names_never_collide_with_registered_functions() {
        let mut mgr = SymbolManager::new();
        mgr.register_function("s_0");
        let mut std = mgr.standardizer();
        let p = Prenex {
            prefix: vec![(Exists, "y".into())],
            matrix: rel("P", vec![Term::Variable("y".into())]),
        };
        let f = skolemize(p, &mut std).unwrap();
        match f {
            Formula::Relation(_, args) => match &args[0] {
                Term::Constant(name) => assert_ne!(name, "s_0"),
                other => panic!("expected a constant, got {other:?}"),
            },
            _ => panic!(),
        }
    }
}
