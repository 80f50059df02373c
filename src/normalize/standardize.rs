//! Pass 3: variable standardization (§4.5.3). Rebinds every quantifier through a
//! [`VariableStandardizer`] so distinct quantifier instances use distinct names, renames free
//! variables to stable fresh names, and registers every function name encountered so later
//! Skolemization never collides with a user-defined function.

use crate::ast::{Formula, Term};
use crate::symbols::VariableStandardizer;

pub fn standardize(f: Formula, std: &mut VariableStandardizer) -> Formula {
    match f {
        Formula::Relation(name, args) => {
            Formula::Relation(name, args.iter().map(|t| standardize_term(t, std)).collect())
        }
        Formula::Unary(op, arg) => Formula::Unary(op, Box::new(standardize(*arg, std))),
        Formula::Binary(op, l, r) => {
            Formula::Binary(op, Box::new(standardize(*l, std)), Box::new(standardize(*r, std)))
        }
        Formula::Quantifier(kind, var, body) => {
            let fresh = std.enter_quantifier(&var);
            let body = standardize(*body, std);
            std.exit_quantifier(&var);
            Formula::Quantifier(kind, fresh, Box::new(body))
        }
    }
}

fn standardize_term(t: &Term, std: &mut VariableStandardizer) -> Term {
    match t {
        Term::Variable(name) => Term::Variable(std.resolve(name)),
        Term::Constant(_) => t.clone(),
        Term::Function(name, args) => {
            std.register_function(name);
            Term::Function(name.clone(), args.iter().map(|a| standardize_term(a, std)).collect())
        }
    }
}
