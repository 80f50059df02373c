//! Literals and clauses (§3), and the final pass of the pipeline: splitting a CNF formula tree
//! into the set of clauses the resolution kernel consumes (§4.6).

use std::fmt;

use crate::ast::{BinaryOp, Formula, Term, UnaryOp};
use crate::error::EngineError;

/// An atomic formula or its negation: a relation name, a sign, and an ordered argument list
/// taken verbatim from the AST.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    pub relation: String,
    pub negated: bool,
    pub args: Vec<Term>,
}

impl Literal {
    pub fn positive(relation: impl Into<String>, args: Vec<Term>) -> Self {
        Self { relation: relation.into(), negated: false, args }
    }

    pub fn negative(relation: impl Into<String>, args: Vec<Term>) -> Self {
        Self { relation: relation.into(), negated: true, args }
    }

    /// The same atom with the sign flipped.
    pub fn negate(&self) -> Literal {
        Literal { relation: self.relation.clone(), negated: !self.negated, args: self.args.clone() }
    }

    /// Whether `self` and `other` are complementary: same relation name, opposite sign. Their
    /// argument lists are not compared here — that's the unifier's job.
    pub fn is_complementary_to(&self, other: &Literal) -> bool {
        self.relation == other.relation && self.negated != other.negated
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "!")?;
        }
        write!(f, "{}(", self.relation)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{arg}")?;
        }
        write!(f, ")")
    }
}

/// A disjunction of literals, represented as a set: order never matters, and two clauses with
/// the same literals are the same clause regardless of how each was derived. The empty clause
/// (⊥) represents a contradiction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Clause {
    literals: Vec<Literal>,
}

impl Clause {
    pub fn empty() -> Self {
        Self { literals: Vec::new() }
    }

    pub fn from_literals(mut literals: Vec<Literal>) -> Self {
        literals.sort();
        literals.dedup();
        Self { literals }
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    /// A clause is a tautology iff it contains both some literal `L` and its negation.
    pub fn is_tautology(&self) -> bool {
        self.literals.iter().any(|l| self.literals.iter().any(|other| l.is_complementary_to(other) && l.args == other.args))
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.literals.is_empty() {
            return write!(f, "\u{22a5}");
        }
        for (i, lit) in self.literals.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{lit}")?;
        }
        Ok(())
    }
}

/// Split a CNF formula tree (only `And`/`Or`/`Not`/`Relation` nodes, per §3 invariant 1) into
/// its clauses: top-level conjuncts become clauses, and within each clause the disjuncts
/// become literals. Any other node reaching here — a quantifier, `Implies`, `Iff` — is an
/// internal invariant violation: the normal-form pipeline should never hand this function
/// anything else.
pub fn extract_clauses(formula: &Formula) -> Result<Vec<Clause>, EngineError> {
    let mut clauses = Vec::new();
    collect_conjuncts(formula, &mut clauses)?;
    Ok(clauses)
}

fn collect_conjuncts(formula: &Formula, out: &mut Vec<Clause>) -> Result<(), EngineError> {
    match formula {
        Formula::Binary(BinaryOp::And, l, r) => {
            collect_conjuncts(l, out)?;
            collect_conjuncts(r, out)?;
            Ok(())
        }
        _ => {
            let mut literals = Vec::new();
            collect_disjuncts(formula, &mut literals)?;
            out.push(Clause::from_literals(literals));
            Ok(())
        }
    }
}

fn collect_disjuncts(formula: &Formula, out: &mut Vec<Literal>) -> Result<(), EngineError> {
    match formula {
        Formula::Binary(BinaryOp::Or, l, r) => {
            collect_disjuncts(l, out)?;
            collect_disjuncts(r, out)?;
            Ok(())
        }
        Formula::Relation(name, args) => {
            out.push(Literal::positive(name.clone(), args.clone()));
            Ok(())
        }
        Formula::Unary(UnaryOp::Not, inner) => match inner.as_ref() {
            Formula::Relation(name, args) => {
                out.push(Literal::negative(name.clone(), args.clone()));
                Ok(())
            }
            other => Err(EngineError::internal(format!(
                "clause extraction: expected NOT to sit directly above a relation, found {other:?}"
            ))),
        },
        other => Err(EngineError::internal(format!(
            "clause extraction: unexpected node in CNF matrix: {other:?}"
        ))),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ast::Term;

    fn rel(name: &str, args: Vec<Term>) -> Formula {
        Formula::Relation(name.to_string(), args)
    }

    #[test]
    fn splits_conjunction_into_clauses() {
        let f = Formula::and(rel("P", vec![]), rel("Q", vec![]));
        let clauses = extract_clauses(&f).unwrap();
        assert_eq!(clauses.len(), 2);
    }

    #[test]
    fn splits_disjunction_into_literals_within_one_clause() {
        let f = Formula::or(rel("P", vec![]), Formula::not(rel("Q", vec![])));
        let clauses = extract_clauses(&f).unwrap();
        assert_eq!(clauses.len(), 1);
        assert_eq!(clauses[0].literals().len(), 2);
    }

    #[test]
    fn detects_tautology() {
        let f = Formula::or(rel("P", vec![]), Formula::not(rel("P", vec![])));
        let clauses = extract_clauses(&f).unwrap();
        assert!(clauses[0].is_tautology());
    }

    #[test]
    fn quantifier_reaching_extraction_is_an_internal_error() {
        let f = Formula::Quantifier(
            crate::ast::QuantifierKind::Forall,
            "x".into(),
            Box::new(rel("P", vec![Term::Variable("x".into())])),
        );
        assert!(extract_clauses(&f).is_err());
    }

    #[test]
    fn display_joins_literals_with_pipe() {
        let f = Formula::or(rel("P", vec![]), Formula::not(rel("Q", vec![])));
        let clauses = extract_clauses(&f).unwrap();
        let rendered = clauses[0].to_string();
        assert!(rendered.contains(" | "));
    }

    #[test]
    fn empty_clause_renders_as_bottom() {
        assert_eq!(Clause::empty().to_string(), "\u{22a5}");
    }
}
