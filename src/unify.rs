//! Most-general unification with occurs-check (§4.7). A [`Substitution`] is a plain map from
//! variable name to [`Term`]; nothing about it is hidden behind a callable interface, per
//! §9's "substitution-as-callable" note — callers read and apply it explicitly.

use rustc_hash::FxHashMap;

use crate::ast::Term;

/// `VarName -> Term`, built incrementally by [`unify`]/[`unify_lists`]. Bindings are chased
/// with path compression: reading a variable's image rewrites it to its fully-substituted
/// form so later lookups are O(1) rather than re-walking a chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitution {
    bindings: FxHashMap<String, Term>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn get(&self, var: &str) -> Option<&Term> {
        self.bindings.get(var)
    }

    /// Bind `var` to `term` directly, with no occurs-check and no chasing. Used internally by
    /// [`unify`]; exposed so callers composing substitutions by hand (e.g. test fixtures) don't
    /// need a second type.
    pub fn bind(&mut self, var: impl Into<String>, term: Term) {
        self.bindings.insert(var.into(), term);
    }

    /// Follow `v`'s binding chain to its fully-substituted image, rewriting the chain along the
    /// way (path compression). Returns `None` if `v` is unbound.
    fn chase(&mut self, v: &str) -> Option<Term> {
        let next = self.bindings.get(v)?.clone();
        let resolved = self.apply(&next);
        if resolved != next {
            self.bindings.insert(v.to_string(), resolved.clone());
        }
        Some(resolved)
    }

    /// Substitute this map into `term`, recursively.
    pub fn apply(&self, term: &Term) -> Term {
        match term {
            Term::Variable(name) => match self.bindings.get(name) {
                Some(bound) => self.apply(bound),
                None => term.clone(),
            },
            Term::Constant(_) => term.clone(),
            Term::Function(name, args) => {
                Term::Function(name.clone(), args.iter().map(|a| self.apply(a)).collect())
            }
        }
    }

    /// Substitute this map into every argument of `args`, recursively.
    pub fn apply_all(&self, args: &[Term]) -> Vec<Term> {
        args.iter().map(|a| self.apply(a)).collect()
    }
}

/// Find a most-general unifier of `left` and `right` (single terms), or fail. Equivalent to
/// `unify_lists(&[left.clone()], &[right.clone()])`.
pub fn unify(left: &Term, right: &Term) -> Option<Substitution> {
    let mut subst = Substitution::new();
    if unify_into(left, right, &mut subst) {
        Some(subst)
    } else {
        None
    }
}

/// Find a most-general unifier of two equal-length term lists (e.g. two literals' argument
/// lists), or fail. Fails immediately, without attempting any unification, if the lists differ
/// in length.
pub fn unify_lists(left: &[Term], right: &[Term]) -> Option<Substitution> {
    if left.len() != right.len() {
        return None;
    }
    let mut subst = Substitution::new();
    for (l, r) in left.iter().zip(right.iter()) {
        if !unify_into(l, r, &mut subst) {
            return None;
        }
    }
    Some(subst)
}

/// Unify `left` and `right` under the substitution built up so far, threading further bindings
/// into `subst`. Returns whether unification succeeded.
fn unify_into(left: &Term, right: &Term, subst: &mut Substitution) -> bool {
    let l = chase_or_clone(left, subst);
    let r = chase_or_clone(right, subst);

    match (&l, &r) {
        (Term::Variable(v), Term::Variable(w)) if v == w => true,

        (Term::Variable(v), Term::Variable(_)) => {
            subst.bind(v.clone(), r);
            true
        }

        (Term::Variable(v), _) => bind_variable(v, &r, subst),
        (_, Term::Variable(w)) => bind_variable(w, &l, subst),

        (Term::Constant(a), Term::Constant(b)) => a == b,

        (Term::Function(f, fargs), Term::Function(g, gargs)) => {
            if f != g || fargs.len() != gargs.len() {
                return false;
            }
            fargs.iter().zip(gargs.iter()).all(|(a, b)| unify_into(a, b, subst))
        }

        _ => false,
    }
}

/// Bind variable `v` to `term` after applying the occurs-check; `term` must already have
/// `subst` applied to it (callers pass the result of [`chase_or_clone`]).
fn bind_variable(v: &str, term: &Term, subst: &mut Substitution) -> bool {
    let substituted = subst.apply(term);
    if substituted.contains(&Term::Variable(v.to_string())) {
        return false;
    }
    subst.bind(v, substituted);
    true
}

/// If `term` is a variable bound in `subst`, return its chased image (with path compression
/// applied); otherwise clone `term` as-is.
fn chase_or_clone(term: &Term, subst: &mut Substitution) -> Term {
    match term {
        Term::Variable(name) => subst.chase(name).unwrap_or_else(|| term.clone()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn var(name: &str) -> Term {
        Term::Variable(name.into())
    }

    fn con(name: &str) -> Term {
        Term::Constant(name.into())
    }

    fn fun(name: &str, args: Vec<Term>) -> Term {
        Term::Function(name.into(), args)
    }

    #[test]
    fn unifies_variable_with_constant() {
        let subst = unify(&var("x"), &con("A")).unwrap();
        assert_eq!(subst.apply(&var("x")), con("A"));
    }

    #[test]
    fn unifies_nested_functions() {
        // f(x, y) vs f(A, f(B, x)) => x |-> A, y |-> f(B, A)
        let left = fun("f", vec![var("x"), var("y")]);
        let right = fun("f", vec![con("A"), fun("f", vec![con("B"), var("x")])]);

        let subst = unify(&left, &right).unwrap();
        assert_eq!(subst.apply(&left), subst.apply(&right));
        assert_eq!(subst.apply(&var("x")), con("A"));
        assert_eq!(subst.apply(&var("y")), fun("f", vec![con("B"), con("A")]));
    }

    #[test]
    fn occurs_check_fails() {
        assert!(unify(&var("x"), &fun("f", vec![var("x")])).is_none());
    }

    #[test]
    fn function_arity_mismatch_fails() {
        assert!(unify(&fun("f", vec![var("x")]), &fun("f", vec![con("A"), con("B")])).is_none());
    }

    #[test]
    fn different_constants_fail() {
        assert!(unify(&con("A"), &con("B")).is_none());
    }

    #[test]
    fn unify_lists_rejects_mismatched_length() {
        assert!(unify_lists(&[var("x")], &[con("A"), con("B")]).is_none());
    }

    #[test]
    fn soundness_property() {
        // If Unify(s, t) = sigma, then sigma(s) == sigma(t) structurally, for a handful of
        // representative pairs.
        let cases = [
            (var("x"), con("A")),
            (fun("f", vec![var("x"), var("y")]), fun("f", vec![var("y"), con("A")])),
            (fun("g", vec![var("x")]), fun("g", vec![fun("h", vec![var("z")])])),
        ];
        for (l, r) in cases {
            if let Some(subst) = unify(&l, &r) {
                assert_eq!(subst.apply(&l), subst.apply(&r));
            }
        }
    }

    #[test]
    fn minimality_mgu_factors_more_specific_unifier() {
        // s = x, t = y. The MGU binds x |-> y (or y |-> x). A more specific unifier tau that
        // binds both x and y to A must factor as rho . sigma.
        let s = var("x");
        let t = var("y");
        let sigma = unify(&s, &t).unwrap();

        let mut tau = Substitution::new();
        tau.bind("x", con("A"));
        tau.bind("y", con("A"));

        // rho is just tau restricted to sigma's codomain variable; applying sigma then tau's
        // binding for whichever var sigma mapped to must reproduce tau's effect on s and t.
        assert_eq!(tau.apply(&s), tau.apply(&sigma.apply(&s)));
        assert_eq!(tau.apply(&t), tau.apply(&sigma.apply(&t)));
    }
}
