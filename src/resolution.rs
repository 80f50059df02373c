//! The given-clause resolution kernel (§4.8) and the A3 cooperative-cancellation abstraction
//! (§5). [`saturate`] drives a FIFO given-clause loop over [`ProofClause`]s until it derives
//! the empty clause, the pending queue empties, or the supplied [`Budget`] is exhausted.

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use log::{debug, trace};

use crate::ast::Term;
use crate::clause::{Clause, Literal};
use crate::error::{EngineError, ResolutionError};
use crate::unify::{unify_lists, Substitution};

/// Where a [`ProofClause`] came from. Ordered `Premise < Conclusion < Derived`, the total order
/// the proof extractor (§4.9) sorts reachable clauses by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Origin {
    Premise,
    Conclusion,
    Derived,
}

/// Identifies the axiom or theorem a premise clause was extracted from: `true` for an axiom,
/// `false` for a previously proved theorem, plus that sequence's stable index.
pub type Source = (bool, usize);

/// A clause plus its bookkeeping metadata (§3): the index it was assigned when it entered the
/// search log, where it came from, and — if derived — the indices of the two parents it was
/// resolved from. Both parent indices are always strictly smaller than `index` (invariant 5).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofClause {
    pub clause: Clause,
    pub index: usize,
    pub origin: Origin,
    pub source: Option<Source>,
    pub resolvents: Option<(usize, usize)>,
}

impl fmt::Display for ProofClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {} (", self.index, self.clause)?;
        match self.origin {
            Origin::Premise => match self.source {
                Some((true, i)) => write!(f, "Premise, Axiom {i}")?,
                Some((false, i)) => write!(f, "Premise, Theorem {i}")?,
                None => write!(f, "Premise")?,
            },
            Origin::Conclusion => write!(f, "Conclusion")?,
            Origin::Derived => {
                let (p1, p2) =
                    self.resolvents.expect("a Derived ProofClause always carries its resolvents");
                write!(f, "Resolve {p1}, {p2}")?;
            }
        }
        write!(f, ")")
    }
}

/// A clause waiting to enter the search log: everything [`ProofClause`] carries except the
/// index, which is only assigned at dequeue time.
#[derive(Debug, Clone)]
pub struct PendingClause {
    pub clause: Clause,
    pub origin: Origin,
    pub source: Option<Source>,
    pub resolvents: Option<(usize, usize)>,
}

impl PendingClause {
    pub fn premise(clause: Clause, source: Source) -> Self {
        Self { clause, origin: Origin::Premise, source: Some(source), resolvents: None }
    }

    pub fn conclusion(clause: Clause) -> Self {
        Self { clause, origin: Origin::Conclusion, source: None, resolvents: None }
    }
}

/// The outcome of a successful saturation run: the empty clause found, plus the full processed
/// log it was found in (needed by the proof extractor, §4.9, to walk `resolvents` pointers).
#[derive(Debug, Clone)]
pub struct Refutation {
    pub empty_clause: ProofClause,
    pub processed: Vec<ProofClause>,
}

/// The A3 cooperative-cancellation abstraction (§5). The resolution loop checks this between
/// dequeuing a clause and again between scanning successive members of `processed` for
/// resolvents against it, so a budget that runs out mid-scan returns promptly.
pub trait Budget {
    fn check(&mut self) -> Result<(), ResolutionError>;
}

/// The default: never exhausted.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBudget;

impl Budget for NoBudget {
    fn check(&mut self) -> Result<(), ResolutionError> {
        Ok(())
    }
}

/// Fails once a fixed number of checks have been made.
#[derive(Debug, Clone, Copy)]
pub struct StepBudget {
    remaining: u64,
}

impl StepBudget {
    pub fn new(steps: u64) -> Self {
        Self { remaining: steps }
    }
}

impl Budget for StepBudget {
    fn check(&mut self) -> Result<(), ResolutionError> {
        if self.remaining == 0 {
            return Err(ResolutionError::StepBudgetExhausted);
        }
        self.remaining -= 1;
        Ok(())
    }
}

/// Fails once an injected clock reading passes a deadline. The clock is a caller-supplied
/// closure rather than a call to a real clock internally, so the resolution kernel stays free
/// of hidden I/O and a fixture can drive it with a fake, advancing clock in tests.
pub struct TimeBudget<F: FnMut() -> Duration> {
    now: F,
    deadline: Duration,
}

impl<F: FnMut() -> Duration> TimeBudget<F> {
    pub fn new(now: F, deadline: Duration) -> Self {
        Self { now, deadline }
    }
}

impl<F: FnMut() -> Duration> Budget for TimeBudget<F> {
    fn check(&mut self) -> Result<(), ResolutionError> {
        if (self.now)() >= self.deadline {
            Err(ResolutionError::TimeBudgetExhausted)
        } else {
            Ok(())
        }
    }
}

/// Run the given-clause saturation loop (§4.8) to completion, to a refutation, or to budget
/// exhaustion. `initial` seeds the pending queue in order: every premise clause, then every
/// clause of the negated conclusion (the session façade is responsible for building it in that
/// order; any order that preserves fairness is otherwise acceptable per §4.8).
pub fn saturate(
    initial: Vec<PendingClause>,
    budget: &mut dyn Budget,
) -> Result<Option<Refutation>, EngineError> {
    let mut pending: VecDeque<PendingClause> = VecDeque::new();
    let mut generation: u64 = 0;
    for seed in initial {
        enqueue(&mut pending, &mut generation, seed);
    }

    let mut processed: Vec<ProofClause> = Vec::new();

    while let Some(next) = pending.pop_front() {
        budget.check().map_err(EngineError::from)?;

        if next.clause.is_tautology() {
            trace!("resolution: dropping tautological clause {} before it enters the log", next.clause);
            continue;
        }

        let index = processed.len();
        let c = ProofClause {
            clause: next.clause,
            index,
            origin: next.origin,
            source: next.source,
            resolvents: next.resolvents,
        };

        if c.clause.is_empty() {
            debug!("resolution: empty clause found at index {index}");
            processed.push(c.clone());
            return Ok(Some(Refutation { empty_clause: c, processed }));
        }

        let mut new_resolvents: Vec<PendingClause> = Vec::new();
        let mut found_empty: Option<(Clause, usize, usize)> = None;

        'earlier: for d in &processed[..index] {
            budget.check().map_err(EngineError::from)?;

            for lc in c.clause.literals() {
                for ld in d.clause.literals() {
                    if !lc.is_complementary_to(ld) {
                        continue;
                    }
                    let Some(subst) = unify_lists(&lc.args, &ld.args) else {
                        continue;
                    };

                    let resolvent = resolve_clauses(&c.clause, lc, &d.clause, ld, &subst);
                    if resolvent.is_tautology() {
                        continue;
                    }

                    if resolvent.is_empty() {
                        found_empty = Some((resolvent, c.index, d.index));
                        break 'earlier;
                    }

                    trace!("resolution: enqueue resolvent {resolvent} from {} and {}", c.index, d.index);
                    new_resolvents.push(PendingClause {
                        clause: resolvent,
                        origin: Origin::Derived,
                        source: None,
                        resolvents: Some((c.index, d.index)),
                    });
                }
            }
        }

        processed.push(c);

        if let Some((clause, p1, p2)) = found_empty {
            let index = processed.len();
            debug!("resolution: empty clause found at index {index}, resolved from {p1}, {p2}");
            let empty = ProofClause {
                clause,
                index,
                origin: Origin::Derived,
                source: None,
                resolvents: Some((p1, p2)),
            };
            processed.push(empty.clone());
            return Ok(Some(Refutation { empty_clause: empty, processed }));
        }

        for r in new_resolvents {
            enqueue(&mut pending, &mut generation, r);
        }
    }

    Ok(None)
}

/// Build the resolvent of `c`'s literal `lc` against `d`'s literal `ld` under `subst`: every
/// other literal of both clauses, substituted, deduplicated by [`Clause::from_literals`].
fn resolve_clauses(c: &Clause, lc: &Literal, d: &Clause, ld: &Literal, subst: &Substitution) -> Clause {
    let mut literals = Vec::new();
    for l in c.literals() {
        if l != lc {
            literals.push(apply_literal(subst, l));
        }
    }
    for l in d.literals() {
        if l != ld {
            literals.push(apply_literal(subst, l));
        }
    }
    Clause::from_literals(literals)
}

fn apply_literal(subst: &Substitution, lit: &Literal) -> Literal {
    Literal { relation: lit.relation.clone(), negated: lit.negated, args: subst.apply_all(&lit.args) }
}

/// Standardize `candidate` apart from every other clause ever enqueued by suffixing each of its
/// variables with a fresh generation tag, then push it onto `pending`. This is how this kernel
/// satisfies §4.7's "standardize apart" requirement: the unifier itself never special-cases
/// which clause a variable came from, because no two enqueued clauses ever share one.
fn enqueue(pending: &mut VecDeque<PendingClause>, generation: &mut u64, mut candidate: PendingClause) {
    let tag = generation.to_string();
    *generation += 1;
    candidate.clause = rename_apart(&candidate.clause, &tag);
    pending.push_back(candidate);
}

fn rename_apart(clause: &Clause, tag: &str) -> Clause {
    let literals = clause
        .literals()
        .iter()
        .map(|l| Literal {
            relation: l.relation.clone(),
            negated: l.negated,
            args: l.args.iter().map(|t| rename_term(t, tag)).collect(),
        })
        .collect();
    Clause::from_literals(literals)
}

fn rename_term(t: &Term, tag: &str) -> Term {
    match t {
        Term::Variable(name) => Term::Variable(format!("{name}#{tag}")),
        Term::Constant(_) => t.clone(),
        Term::Function(name, args) => {
            Term::Function(name.clone(), args.iter().map(|a| rename_term(a, tag)).collect())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::clause::Literal;

    fn rel(name: &str) -> Literal {
        Literal::positive(name, vec![])
    }

    fn not_rel(name: &str) -> Literal {
        Literal::negative(name, vec![])
    }

    #[test]
    fn derives_empty_clause_from_unit_contradiction() {
        let initial = vec![
            PendingClause::premise(Clause::from_literals(vec![rel("P")]), (true, 0)),
            PendingClause::premise(Clause::from_literals(vec![not_rel("P")]), (true, 1)),
        ];
        let mut budget = NoBudget;
        let result = saturate(initial, &mut budget).unwrap();
        let refutation = result.expect("expected a refutation");
        assert!(refutation.empty_clause.clause.is_empty());
    }

    #[test]
    fn no_refutation_when_clauses_are_consistent() {
        let initial = vec![PendingClause::premise(Clause::from_literals(vec![rel("P")]), (true, 0))];
        let mut budget = NoBudget;
        let result = saturate(initial, &mut budget).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn step_budget_exhaustion_surfaces_as_an_error() {
        let initial = vec![
            PendingClause::premise(Clause::from_literals(vec![rel("P")]), (true, 0)),
            PendingClause::premise(Clause::from_literals(vec![not_rel("P")]), (true, 1)),
        ];
        let mut budget = StepBudget::new(0);
        let err = saturate(initial, &mut budget).unwrap_err();
        assert!(matches!(err, EngineError::Resolution(ResolutionError::StepBudgetExhausted)));
    }

    #[test]
    fn derived_clauses_only_reference_strictly_smaller_indices() {
        let initial = vec![
            PendingClause::premise(Clause::from_literals(vec![rel("P"), rel("Q")]), (true, 0)),
            PendingClause::premise(Clause::from_literals(vec![not_rel("P")]), (true, 1)),
            PendingClause::premise(Clause::from_literals(vec![not_rel("Q")]), (true, 2)),
        ];
        let mut budget = NoBudget;
        let refutation = saturate(initial, &mut budget).unwrap().unwrap();
        for pc in &refutation.processed {
            if let Some((p1, p2)) = pc.resolvents {
                assert!(p1 < pc.index);
                assert!(p2 < pc.index);
            }
        }
    }

    #[test]
    fn no_tautology_ever_enters_the_log() {
        let initial = vec![
            PendingClause::premise(Clause::from_literals(vec![rel("P"), rel("Q")]), (true, 0)),
            PendingClause::premise(Clause::from_literals(vec![not_rel("P"), rel("Q")]), (true, 1)),
        ];
        let mut budget = NoBudget;
        let result = saturate(initial, &mut budget).unwrap();
        let processed = result.map(|r| r.processed).unwrap_or_default();
        assert!(processed.iter().all(|pc| !pc.clause.is_tautology()));
    }

    #[test]
    fn tautological_premise_is_dropped_before_entering_the_log() {
        // Q(x) | !Q(x) is a tautology and must never appear in `processed` (invariant 4),
        // even though it was handed in as an initial premise rather than a derived resolvent.
        let initial = vec![
            PendingClause::premise(
                Clause::from_literals(vec![rel("Q"), not_rel("Q")]),
                (true, 0),
            ),
            PendingClause::premise(Clause::from_literals(vec![rel("P")]), (true, 1)),
        ];
        let mut budget = NoBudget;
        let result = saturate(initial, &mut budget).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn rendering_matches_the_normative_forms() {
        let premise = ProofClause {
            clause: Clause::from_literals(vec![rel("P")]),
            index: 0,
            origin: Origin::Premise,
            source: Some((true, 2)),
            resolvents: None,
        };
        assert_eq!(premise.to_string(), "0. P() (Premise, Axiom 2)");

        let conclusion = ProofClause {
            clause: Clause::from_literals(vec![not_rel("P")]),
            index: 1,
            origin: Origin::Conclusion,
            source: None,
            resolvents: None,
        };
        assert_eq!(conclusion.to_string(), "1. !P() (Conclusion)");

        let derived = ProofClause {
            clause: Clause::empty(),
            index: 2,
            origin: Origin::Derived,
            source: None,
            resolvents: Some((0, 1)),
        };
        assert_eq!(derived.to_string(), "2. \u{22a5} (Resolve 0, 1)");
    }
}
