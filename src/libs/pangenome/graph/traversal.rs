use super::Pangenome;
use crate::libs::pangenome::edge::EdgeId;
use crate::libs::pangenome::family::FamilyId;
use fixedbitset::FixedBitSet;
use std::collections::BTreeSet;

/// Vertex-induced subgraph: a set of families and every live edge between two of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subgraph {
    pub families: BTreeSet<FamilyId>,
    pub edges: BTreeSet<EdgeId>,
}

impl Subgraph {
    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    pub fn contains(&self, fam: FamilyId) -> bool {
        self.families.contains(&fam)
    }
}

/// Build the subgraph induced by `fams`. Unknown or removed families are ignored.
pub fn subgraph(pan: &Pangenome, fams: &BTreeSet<FamilyId>) -> Subgraph {
    let families: BTreeSet<FamilyId> = fams
        .iter()
        .copied()
        .filter(|&f| pan.get_family(f).is_some())
        .collect();

    let mut edges = BTreeSet::new();
    for &fam in &families {
        for (neighbor, &edge) in &pan.family(fam).edges {
            if families.contains(neighbor) {
                edges.insert(edge);
            }
        }
    }

    Subgraph { families, edges }
}

/// Families reachable from `source` and not yet in `seen`, level by level (BFS).
///
/// Visited families are added to `seen`, so one set can be shared by successive calls.
pub fn plain_bfs(pan: &Pangenome, source: FamilyId, seen: &mut FixedBitSet) -> Vec<FamilyId> {
    seen.grow(pan.families.len());
    let mut result = Vec::new();
    let mut next_level = vec![source];

    while !next_level.is_empty() {
        let this_level = std::mem::take(&mut next_level);
        for fam in this_level {
            if seen.contains(fam) {
                continue;
            }
            seen.insert(fam);
            result.push(fam);
            next_level.extend(pan.family(fam).neighbors().filter(|&n| !seen.contains(n)));
        }
    }

    result
}

/// Lazy iterator over the connected components of the family graph.
///
/// Each call to `Pangenome::connected_components` starts a fresh traversal.
pub struct ConnectedComponents<'a> {
    pan: &'a Pangenome,
    seen: FixedBitSet,
    cursor: usize,
}

impl<'a> ConnectedComponents<'a> {
    pub fn new(pan: &'a Pangenome) -> Self {
        Self {
            pan,
            seen: FixedBitSet::with_capacity(pan.families.len()),
            cursor: 0,
        }
    }
}

impl Iterator for ConnectedComponents<'_> {
    type Item = Subgraph;

    fn next(&mut self) -> Option<Subgraph> {
        while self.cursor < self.pan.families.len() {
            let fam = self.cursor;
            self.cursor += 1;

            if self.seen.contains(fam) || self.pan.families[fam].removed {
                continue;
            }

            let component: BTreeSet<FamilyId> =
                plain_bfs(self.pan, fam, &mut self.seen).into_iter().collect();
            return Some(subgraph(self.pan, &component));
        }
        None
    }
}
