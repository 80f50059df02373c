//! The proof extractor (§4.9): turns a contradiction witness and the full search log into the
//! minimal, dependency-ordered, freshly-reindexed derivation a caller actually wants to see.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::resolution::{ProofClause, Refutation};

/// A finite, linear derivation: for every step with `resolvents = (a, b)`, both `a` and `b`
/// are indices of earlier steps in this same vector; the last step is the empty clause.
pub type Proof = Vec<ProofClause>;

/// Extract the minimal proof witnessed by `refutation`: every clause transitively reachable
/// from the empty clause via `resolvents` pointers, sorted `Premise < Conclusion < Derived`
/// (and by original index within a group), reindexed from 0, with the empty clause appended
/// last.
pub fn extract_proof(refutation: &Refutation) -> Proof {
    let processed = &refutation.processed;
    let empty = &refutation.empty_clause;

    let ancestor_indices = reachable_ancestors(empty, processed);

    let mut ancestors: Vec<&ProofClause> =
        ancestor_indices.iter().map(|&i| &processed[i]).collect();
    ancestors.sort_by_key(|pc| (pc.origin, pc.index));

    let mut remap: FxHashMap<usize, usize> = FxHashMap::default();
    for (new_index, pc) in ancestors.iter().enumerate() {
        remap.insert(pc.index, new_index);
    }

    let mut proof: Proof = Vec::with_capacity(ancestors.len() + 1);
    for pc in ancestors {
        proof.push(ProofClause {
            clause: pc.clause.clone(),
            index: remap[&pc.index],
            origin: pc.origin,
            source: pc.source,
            resolvents: pc.resolvents.map(|(a, b)| (remap[&a], remap[&b])),
        });
    }

    proof.push(ProofClause {
        clause: empty.clause.clone(),
        index: proof.len(),
        origin: empty.origin,
        source: empty.source,
        resolvents: empty.resolvents.map(|(a, b)| (remap[&a], remap[&b])),
    });

    proof
}

/// Reverse-BFS over `resolvents` pointers starting at `empty`'s parents; returns the original
/// indices of every ancestor (not including `empty` itself).
fn reachable_ancestors(empty: &ProofClause, processed: &[ProofClause]) -> FxHashSet<usize> {
    let mut visited = FxHashSet::default();
    let mut queue: VecDeque<usize> = VecDeque::new();

    if let Some((p1, p2)) = empty.resolvents {
        queue.push_back(p1);
        queue.push_back(p2);
    }

    while let Some(i) = queue.pop_front() {
        if !visited.insert(i) {
            continue;
        }
        if let Some((p1, p2)) = processed[i].resolvents {
            queue.push_back(p1);
            queue.push_back(p2);
        }
    }

    visited
}
