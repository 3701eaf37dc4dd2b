//! Annotated genomes: organisms, their contigs, and the genes and RNAs on them.
//!
//! These records are filled by an annotation reader and are read-only for the
//! graph engine afterwards. All of them live in arenas owned by
//! [`Pangenome`](super::Pangenome) and refer to each other by index.

use super::family::FamilyId;
use super::region::RegionId;
use indexmap::IndexMap;

/// Index of an organism in the pangenome arena.
pub type OrgId = usize;
/// Index of a contig in the pangenome arena.
pub type ContigId = usize;
/// Index of a gene in the pangenome arena.
pub type GeneId = usize;

#[derive(Debug, Clone)]
pub struct Organism {
    /// Arena index, set when the organism is registered
    pub id: OrgId,

    /// Genome name, unique in a pangenome
    pub name: String,

    /// Contig name -> contig id, in insertion order
    pub contigs: IndexMap<String, ContigId>,
}

impl Organism {
    /// Create an unregistered organism. The id is assigned by `Pangenome::add_organism`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            contigs: IndexMap::new(),
        }
    }

    pub fn number_of_contigs(&self) -> usize {
        self.contigs.len()
    }
}

#[derive(Debug, Clone)]
pub struct Contig {
    pub id: ContigId,
    pub name: String,
    pub organism: OrgId,
    pub is_circular: bool,

    /// Gene ids ordered by position; `genes[p]` is the gene at position `p`
    pub genes: Vec<GeneId>,

    pub rnas: Vec<Rna>,
}

impl Contig {
    /// Number of genes on the contig
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Gene at a position, if any
    pub fn get(&self, position: usize) -> Option<GeneId> {
        self.genes.get(position).copied()
    }
}

#[derive(Debug, Clone)]
pub struct Gene {
    pub id: GeneId,

    /// Gene identifier as given by the annotation (e.g. a locus tag)
    pub name: String,

    pub organism: OrgId,
    pub contig: ContigId,

    /// 0-based index of the gene in its contig
    pub position: usize,

    pub start: u64,
    pub stop: u64,
    pub strand: char,

    /// Gene family, once clustering has assigned one
    pub family: Option<FamilyId>,

    /// Region of genomic plasticity containing this gene
    pub rgp: Option<RegionId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rna {
    pub name: String,
    pub start: u64,
    pub stop: u64,
    pub strand: char,
}
