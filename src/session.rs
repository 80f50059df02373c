//! The proof session façade (§4.10). A [`Session`] owns the symbol manager and the axiom and
//! theorem sequences for as long as a caller wants Skolem-function names to stay unique across
//! everything it proves; two threads must never share one (§5).

use log::debug;

use crate::ast::Formula;
use crate::clause::{extract_clauses, Clause};
use crate::error::{ParseError, SessionError};
use crate::normalize::to_cnf;
use crate::parser::parse_str;
use crate::proof::{extract_proof, Proof};
use crate::resolution::{saturate, Budget, NoBudget, PendingClause};
use crate::symbols::SymbolManager;

/// One axiom or theorem the session has accepted: its original text, the clauses extracted
/// from it, its stable index within its sequence, and an optional description used only by a
/// [`PremiseSelector`].
#[derive(Debug, Clone)]
pub struct FormulaRecord {
    pub text: String,
    pub clauses: Vec<Clause>,
    pub index: usize,
    pub description: Option<String>,
}

/// A premise a selector chose: either an axiom or a previously proved theorem, by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PremiseRef {
    Axiom(usize),
    Theorem(usize),
}

/// Chooses which axioms and theorems to feed a [`Session::prove`] call, given the conjecture's
/// optional natural-language description and how many axioms/theorems the session currently
/// holds. Must return a subset of `{axioms} ∪ {proved theorems}` (§4.10); must be pure with
/// respect to engine state (§9).
///
/// This engine implements exactly one selector, [`AllAxioms`] — the default. Anything richer
/// (e.g. embedding-based similarity against the description) is an external collaborator a
/// caller supplies; the engine depends only on this trait, never on a concrete scorer.
pub trait PremiseSelector {
    fn select(&self, description: Option<&str>, axiom_count: usize, theorem_count: usize) -> Vec<PremiseRef>;
}

/// The default selector: every axiom, every time, ignoring the description entirely.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllAxioms;

impl PremiseSelector for AllAxioms {
    fn select(&self, _description: Option<&str>, axiom_count: usize, _theorem_count: usize) -> Vec<PremiseRef> {
        (0..axiom_count).map(PremiseRef::Axiom).collect()
    }
}

impl<F> PremiseSelector for F
where
    F: Fn(Option<&str>, usize, usize) -> Vec<PremiseRef>,
{
    fn select(&self, description: Option<&str>, axiom_count: usize, theorem_count: usize) -> Vec<PremiseRef> {
        self(description, axiom_count, theorem_count)
    }
}

/// The axiom/theorem store and the owner of the session-wide [`SymbolManager`]. Thread-affine:
/// nothing here is `Sync`, and the spec forbids sharing one instance across threads regardless.
pub struct Session {
    symbols: SymbolManager,
    axioms: Vec<FormulaRecord>,
    theorems: Vec<FormulaRecord>,
    selector: Box<dyn PremiseSelector>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            symbols: SymbolManager::new(),
            axioms: Vec::new(),
            theorems: Vec::new(),
            selector: Box::new(AllAxioms),
        }
    }

    /// A session using a premise selector other than [`AllAxioms`].
    pub fn with_selector(selector: impl PremiseSelector + 'static) -> Self {
        Self { selector: Box::new(selector), ..Self::new() }
    }

    pub fn axioms(&self) -> &[FormulaRecord] {
        &self.axioms
    }

    pub fn theorems(&self) -> &[FormulaRecord] {
        &self.theorems
    }

    /// Parse, normalize, and extract the clauses of `text`, then append it to the axiom
    /// sequence. Fails only on malformed input; a normal-form pipeline invariant violation on
    /// already-parsed input is an engine bug, not something this signature reports to a caller
    /// (§7) — it aborts the call via panic rather than being folded into "bad syntax".
    pub fn add_axiom(&mut self, text: &str, description: Option<&str>) -> Result<(), ParseError> {
        let formula = parse_str(text)?;
        let clauses = self.normalize_and_extract(formula);

        let index = self.axioms.len();
        debug!("session: axiom {index} -> {} clauses", clauses.len());
        self.axioms.push(FormulaRecord {
            text: text.to_string(),
            clauses,
            index,
            description: description.map(str::to_string),
        });
        Ok(())
    }

    /// Attempt to prove `text` using the premise selector's chosen axioms/theorems, with no
    /// resource bound. `Ok(None)` means the search exhausted without finding a refutation;
    /// `Ok(Some(proof))` means it did, and the theorem is now recorded for future reuse as a
    /// premise.
    pub fn prove(&mut self, text: &str, description: Option<&str>) -> Result<Option<Proof>, SessionError> {
        self.prove_with_budget(text, description, &mut NoBudget)
    }

    /// As [`Session::prove`], but checked against an explicit [`Budget`] (§5) instead of
    /// running unbounded.
    pub fn prove_with_budget(
        &mut self,
        text: &str,
        description: Option<&str>,
        budget: &mut dyn Budget,
    ) -> Result<Option<Proof>, SessionError> {
        let conjecture = parse_str(text)?;
        let negated = Formula::not(conjecture.clone());
        let negated_clauses = self.normalize_and_extract(negated);
        debug!("session: conjecture negation -> {} clauses", negated_clauses.len());

        let selected = self.selector.select(description, self.axioms.len(), self.theorems.len());

        let mut pending = Vec::new();
        for premise in &selected {
            let (clauses, source) = match *premise {
                PremiseRef::Axiom(i) => (&self.axioms[i].clauses, (true, i)),
                PremiseRef::Theorem(i) => (&self.theorems[i].clauses, (false, i)),
            };
            for clause in clauses {
                pending.push(PendingClause::premise(clause.clone(), source));
            }
        }
        for clause in negated_clauses {
            pending.push(PendingClause::conclusion(clause));
        }

        let refutation = saturate(pending, budget)?;

        let Some(refutation) = refutation else {
            return Ok(None);
        };

        let proof = extract_proof(&refutation);

        let own_clauses = self.normalize_and_extract(conjecture);
        let index = self.theorems.len();
        self.theorems.push(FormulaRecord {
            text: text.to_string(),
            clauses: own_clauses,
            index,
            description: description.map(str::to_string),
        });

        Ok(Some(proof))
    }

    /// Run passes 1-6 of the normal-form pipeline followed by clause extraction. Both steps
    /// can only fail on an internal invariant violation, which here means the session's own
    /// earlier passes produced something later passes don't recognize — a bug in this crate,
    /// not in the caller's input (which already survived parsing). Per §7 such a violation
    /// aborts the operation rather than being reported as ordinary negative result.
    fn normalize_and_extract(&mut self, formula: Formula) -> Vec<Clause> {
        let mut standardizer = self.symbols.standardizer();
        let cnf = to_cnf(formula, &mut standardizer).expect("normal-form pipeline invariant violated");
        extract_clauses(&cnf).expect("clause extraction invariant violated")
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
