use super::family::FamilyId;
use super::genome::{GeneId, OrgId};
use indexmap::IndexMap;

/// EdgeId is an index into the Pangenome's edge arena.
pub type EdgeId = usize;

/// Undirected link between two gene families that are adjacent in at least one genome.
///
/// The weight of an edge is the list of adjacent gene pairs supporting it, grouped by
/// organism. A family can be duplicated in a genome, so one organism may contribute
/// several pairs.
#[derive(Debug, Clone)]
pub struct Edge {
    pub id: EdgeId,
    pub source: FamilyId,
    pub target: FamilyId,

    /// Organism -> (source gene, target gene) pairs, in insertion order
    pub organisms: IndexMap<OrgId, Vec<(GeneId, GeneId)>>,

    pub removed: bool,
}

impl Edge {
    pub fn new(id: EdgeId, source: FamilyId, target: FamilyId) -> Self {
        Self {
            id,
            source,
            target,
            organisms: IndexMap::new(),
            removed: false,
        }
    }

    /// Record one more adjacency. Pairs are never deduplicated.
    pub fn add_genes(&mut self, org: OrgId, source_gene: GeneId, target_gene: GeneId) {
        self.organisms
            .entry(org)
            .or_default()
            .push((source_gene, target_gene));
    }

    /// Unordered key of the family pair
    pub fn key(&self) -> (FamilyId, FamilyId) {
        edge_key(self.source, self.target)
    }

    /// The endpoint opposite to `fam`
    pub fn other(&self, fam: FamilyId) -> Option<FamilyId> {
        if fam == self.source {
            Some(self.target)
        } else if fam == self.target {
            Some(self.source)
        } else {
            None
        }
    }

    pub fn gene_pairs(&self) -> impl Iterator<Item = &(GeneId, GeneId)> {
        self.organisms.values().flatten()
    }

    pub fn number_of_organisms(&self) -> usize {
        self.organisms.len()
    }

    /// Total number of gene pairs over all organisms
    pub fn weight(&self) -> usize {
        self.organisms.values().map(|v| v.len()).sum()
    }
}

pub fn edge_key(a: FamilyId, b: FamilyId) -> (FamilyId, FamilyId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
