/// Error types shared across the front-end and the engine.
pub mod error;

/// Terms and formulas: the value types everything else is built from.
pub mod ast;

/// Tokenizer over FOL source text.
pub mod lexer;

/// Recursive-descent parser producing formula trees.
pub mod parser;

/// Fresh-name allocation: Skolem functions and variable standardization.
pub mod symbols;

/// The normal-form pipeline: connective elimination through CNF distribution.
pub mod normalize;

/// CNF tree to clause-set extraction.
pub mod clause;

/// Most-general unification with occurs-check.
pub mod unify;

/// The given-clause resolution kernel.
pub mod resolution;

/// Dependency-ordered proof reconstruction.
pub mod proof;

/// The proof session façade: axioms, theorems, premise selection.
pub mod session;
