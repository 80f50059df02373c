//! Terms and formulas. Value types throughout: equality is structural, hashing follows
//! equality, and nothing here is ever mutated in place once built — passes in
//! [`crate::normalize`] consume a formula and return a new one.

use std::fmt;

/// A first-order term. Arity-0 functions are forbidden by construction; the parser rejects
/// them and nothing downstream ever builds one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    /// A lowercase-initial identifier, bound by some enclosing quantifier or free.
    Variable(String),

    /// An uppercase- or digit-initial identifier with no argument list.
    Constant(String),

    /// An uppercase- or digit-initial identifier applied to one or more arguments.
    Function(String, Vec<Term>),
}

impl Term {
    /// Whether `self` contains `other` anywhere within it (including being equal to it). Used
    /// by the unifier's occurs-check.
    pub fn contains(&self, other: &Term) -> bool {
        if self == other {
            return true;
        }
        match self {
            Term::Function(_, args) => args.iter().any(|a| a.contains(other)),
            _ => false,
        }
    }

    /// The variable names occurring in this term, in first-encounter order with duplicates
    /// removed.
    pub fn variables(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables(&self, out: &mut Vec<String>) {
        match self {
            Term::Variable(name) => {
                if !out.contains(name) {
                    out.push(name.clone());
                }
            }
            Term::Constant(_) => {}
            Term::Function(_, args) => {
                for a in args {
                    a.collect_variables(out);
                }
            }
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Variable(name) | Term::Constant(name) => write!(f, "{name}"),
            Term::Function(name, args) => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// A unary connective. FOL has exactly one: negation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UnaryOp {
    Not,
}

/// A binary connective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BinaryOp {
    And,
    Or,
    Implies,
    Iff,
}

/// Which quantifier a [`Formula::Quantifier`] node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QuantifierKind {
    Forall,
    Exists,
}

/// A formula tree. Well before resolution, [`crate::normalize`] rewrites every formula down to
/// a tree using only `And`/`Or`/`Not`/`Relation` over ground terms (§3 invariant 1 of this
/// crate's governing design) — the variants below are the full surface grammar a user may
/// write, not the restricted shape the resolver consumes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Formula {
    /// An atomic formula: a relation name applied to an ordered argument list.
    Relation(String, Vec<Term>),

    Unary(UnaryOp, Box<Formula>),

    Binary(BinaryOp, Box<Formula>, Box<Formula>),

    Quantifier(QuantifierKind, String, Box<Formula>),
}

impl Formula {
    pub fn not(f: Formula) -> Formula {
        Formula::Unary(UnaryOp::Not, Box::new(f))
    }

    pub fn and(l: Formula, r: Formula) -> Formula {
        Formula::Binary(BinaryOp::And, Box::new(l), Box::new(r))
    }

    pub fn or(l: Formula, r: Formula) -> Formula {
        Formula::Binary(BinaryOp::Or, Box::new(l), Box::new(r))
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Relation(name, args) => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Formula::Unary(UnaryOp::Not, arg) => write!(f, "!{arg}"),
            Formula::Binary(op, l, r) => {
                let sym = match op {
                    BinaryOp::And => "&",
                    BinaryOp::Or => "|",
                    BinaryOp::Implies => "->",
                    BinaryOp::Iff => "<->",
                };
                write!(f, "({l} {sym} {r})")
            }
            Formula::Quantifier(kind, var, body) => {
                let kw = match kind {
                    QuantifierKind::Forall => "forall",
                    QuantifierKind::Exists => "exists",
                };
                write!(f, "{kw} {var} ({body})")
            }
        }
    }
}

/// First character uppercase or digit ⇒ constant/function; lowercase ⇒ variable. This
/// classification is shared by the parser (to decide which [`Term`] variant to build) and by
/// the symbol manager (to validate a quantifier's bound-variable name).
pub fn is_variable_name(name: &str) -> bool {
    matches!(name.chars().next(), Some(c) if c.is_ascii_lowercase())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn occurs_check_term() {
        let x = Term::Variable("x".into());
        let fx = Term::Function("f".into(), vec![x.clone()]);
        assert!(fx.contains(&x));
        assert!(!x.contains(&fx));
    }

    #[test]
    fn display_function() {
        let t = Term::Function(
            "f".into(),
            vec![Term::Constant("A".into()), Term::Variable("x".into())],
        );
        assert_eq!(t.to_string(), "f(A, x)");
    }

    #[test]
    fn classify_names() {
        assert!(is_variable_name("x"));
        assert!(!is_variable_name("X"));
        assert!(!is_variable_name("0abc"));
    }
}
