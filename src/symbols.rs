//! Session-scoped fresh-name allocation: Skolem functions (shared across every formula the
//! session ever normalizes) and per-formula variable standardization (scoped to a single call
//! to [`crate::normalize::standardize`]).

use rustc_hash::{FxHashMap, FxHashSet};

/// Allocates function names that no user-defined function, constant, or previously generated
/// Skolem function has used. Owned by a [`crate::session::Session`] for its whole lifetime so
/// that Skolem names stay unique across every axiom and theorem it ever normalizes (§3
/// invariant 3).
#[derive(Debug, Default)]
pub struct SymbolManager {
    taken: FxHashSet<String>,
    next_skolem: u64,
}

impl SymbolManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `name` is now taken, so a later Skolem function avoids it. Called for
    /// every function symbol encountered while standardizing a formula's variables.
    pub fn register_function(&mut self, name: &str) {
        self.taken.insert(name.to_string());
    }

    /// Mint a function name not yet used by any user-defined or previously generated symbol.
    pub fn fresh_skolem(&mut self) -> String {
        loop {
            let candidate = format!("s_{}", self.next_skolem);
            self.next_skolem += 1;
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    /// Begin standardizing the variables of one formula. The returned standardizer borrows
    /// this manager only to register function names and mint free-variable renames that won't
    /// collide with anything seen so far; the session's Skolem counter itself is untouched
    /// until [`SymbolManager::fresh_skolem`] is called during Skolemization.
    pub fn standardizer(&mut self) -> VariableStandardizer<'_> {
        VariableStandardizer::new(self)
    }
}

/// Per-formula context for pass 3 of the normal-form pipeline (§4.5). Tracks every name seen
/// so far (to avoid renaming collisions), a stack of currently-active bound renames keyed by
/// the quantifier's original name, and a stable rename for each free variable encountered.
///
/// A fresh standardizer is created for every call to `add_axiom`/`prove` (open question ii,
/// §9): only the symbol manager's Skolem counter and taken-name set are session-global.
pub struct VariableStandardizer<'a> {
    symbols: &'a mut SymbolManager,
    seen: FxHashSet<String>,
    active: FxHashMap<String, Vec<String>>,
    free: FxHashMap<String, String>,
}

impl<'a> VariableStandardizer<'a> {
    fn new(symbols: &'a mut SymbolManager) -> Self {
        Self {
            symbols,
            seen: FxHashSet::default(),
            active: FxHashMap::default(),
            free: FxHashMap::default(),
        }
    }

    /// Enter a quantifier binding `name`: mint a name not yet seen anywhere in this formula,
    /// push it as `name`'s active rename, and return it. Call [`VariableStandardizer::exit_quantifier`]
    /// with the same `name` when leaving the quantifier's scope.
    pub fn enter_quantifier(&mut self, name: &str) -> String {
        let fresh = self.mint(name);
        self.seen.insert(fresh.clone());
        self.active.entry(name.to_string()).or_default().push(fresh.clone());
        fresh
    }

    /// Leave the scope of the innermost still-active quantifier that bound `name`, restoring
    /// whatever rename (if any) was active before it.
    pub fn exit_quantifier(&mut self, name: &str) {
        if let Some(stack) = self.active.get_mut(name) {
            stack.pop();
            if stack.is_empty() {
                self.active.remove(name);
            }
        }
    }

    /// Resolve an occurrence of `name`: if a quantifier currently binds it, return that active
    /// rename; otherwise treat it as free and assign (on first encounter) a stable fresh name.
    pub fn resolve(&mut self, name: &str) -> String {
        if let Some(stack) = self.active.get(name) {
            if let Some(top) = stack.last() {
                return top.clone();
            }
        }
        if let Some(existing) = self.free.get(name) {
            return existing.clone();
        }
        let fresh = self.mint(name);
        self.seen.insert(fresh.clone());
        self.free.insert(name.to_string(), fresh.clone());
        fresh
    }

    /// Record that `name` names a function, so later Skolem functions avoid it (§4.4(iii)).
    pub fn register_function(&mut self, name: &str) {
        self.symbols.register_function(name);
    }

    /// Mint a Skolem function name, delegating to the session-wide counter.
    pub fn fresh_skolem(&mut self) -> String {
        self.symbols.fresh_skolem()
    }

    /// `name` if it has not already been used in this formula, else `name_k` for the smallest
    /// unused `k`.
    fn mint(&self, name: &str) -> String {
        if !self.seen.contains(name) && !self.symbols.taken.contains(name) {
            return name.to_string();
        }
        let mut k = 0u64;
        loop {
            let candidate = format!("{name}_{k}");
            if !self.seen.contains(&candidate) && !self.symbols.taken.contains(&candidate) {
                return candidate;
            }
            k += 1;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn skolem_names_avoid_registered_functions() {
        let mut mgr = SymbolManager::new();
        mgr.register_function("s_0");
        mgr.register_function("s_1");
        let name = mgr.fresh_skolem();
        assert_eq!(name, "s_2");
    }

    #[test]
    fn skolem_names_are_unique_across_formulas() {
        let mut mgr = SymbolManager::new();
        let a = mgr.fresh_skolem();
        let b = mgr.fresh_skolem();
        assert_ne!(a, b);
    }

    #[test]
    fn nested_quantifier_shadowing_restores_outer_binding() {
        let mut mgr = SymbolManager::new();
        let mut std = mgr.standardizer();

        let outer = std.enter_quantifier("x");
        assert_eq!(std.resolve("x"), outer);

        let inner = std.enter_quantifier("x");
        assert_ne!(inner, outer);
        assert_eq!(std.resolve("x"), inner);

        std.exit_quantifier("x");
        assert_eq!(std.resolve("x"), outer);
    }

    #[test]
    fn free_variables_get_stable_renames() {
        let mut mgr = SymbolManager::new();
        let mut std = mgr.standardizer();

        let first = std.resolve("u");
        let second = std.resolve("u");
        assert_eq!(first, second);
    }

    #[test]
    fn bound_and_free_names_never_collide() {
        let mut mgr = SymbolManager::new();
        let mut std = mgr.standardizer();

        // "x" occurs free first...
        let free_x = std.resolve("x");
        // ...then a quantifier tries to bind the same original name "x".
        let bound_x = std.enter_quantifier("x");

        assert_ne!(free_x, bound_x);
    }
}
