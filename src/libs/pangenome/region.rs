//! Regions of genomic plasticity (RGPs).
//!
//! A region is a run of genes of one contig, keyed by their contig
//! positions. Regions are produced by an RGP detection step and then compared
//! to each other by their gene family order and content, see [`Spot`](super::Spot).

use super::error::{PangenomeError, Result};
use super::family::FamilyId;
use super::genome::{ContigId, GeneId, OrgId, Rna};
use super::graph::Pangenome;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// RegionId is an index into the Pangenome's region arena.
pub type RegionId = usize;

#[derive(Debug, Clone)]
pub struct Region {
    /// Unique name in the pangenome
    pub name: String,

    /// Set by the detection algorithm
    pub score: f64,

    /// Contig position -> gene
    genes: BTreeMap<usize, GeneId>,

    /// Gene family of each stored gene, in position order of `genes`
    families: BTreeMap<usize, FamilyId>,

    organism: Option<OrgId>,
    contig: Option<ContigId>,
}

impl Region {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            score: 0.0,
            genes: BTreeMap::new(),
            families: BTreeMap::new(),
            organism: None,
            contig: None,
        }
    }

    /// Store `gene` at `position`.
    ///
    /// All genes of a region come from the same organism and contig and carry a
    /// gene family. Starter and stopper follow the smallest and largest positions.
    pub fn set_gene(&mut self, pan: &Pangenome, position: usize, gene: GeneId) -> Result<()> {
        let record = pan.gene(gene);
        let fam = record.family.ok_or_else(|| {
            PangenomeError::InvalidGraph(format!(
                "Gene {} has no gene family and cannot be part of RGP {}",
                record.name, self.name
            ))
        })?;

        if !self.genes.is_empty() {
            if Some(record.organism) != self.organism {
                return Err(PangenomeError::Consistency(format!(
                    "Gene {} is from a different organism than the first defined in RGP {}",
                    record.name, self.name
                )));
            }
            if Some(record.contig) != self.contig {
                return Err(PangenomeError::Consistency(format!(
                    "Gene {} is from a different contig than the first defined in RGP {}",
                    record.name, self.name
                )));
            }
        }
        if let Some(&existing) = self.genes.get(&position) {
            if existing != gene {
                return Err(PangenomeError::DuplicateKey(format!(
                    "Another gene already exists at position {} in RGP {}",
                    position, self.name
                )));
            }
        }

        self.organism = Some(record.organism);
        self.contig = Some(record.contig);
        self.genes.insert(position, gene);
        self.families.insert(position, fam);
        Ok(())
    }

    /// Store a gene at its own contig position.
    pub fn add_gene(&mut self, pan: &Pangenome, gene: GeneId) -> Result<()> {
        self.set_gene(pan, pan.gene(gene).position, gene)
    }

    pub fn get(&self, position: usize) -> Result<GeneId> {
        self.genes.get(&position).copied().ok_or_else(|| {
            PangenomeError::Lookup(format!(
                "There is no gene at position {} in RGP {}",
                position, self.name
            ))
        })
    }

    pub fn remove(&mut self, position: usize) -> Result<GeneId> {
        let gene = self.genes.remove(&position).ok_or_else(|| {
            PangenomeError::Lookup(format!(
                "There is no gene at position {} in RGP {}",
                position, self.name
            ))
        })?;
        self.families.remove(&position);
        if self.genes.is_empty() {
            self.organism = None;
            self.contig = None;
        }
        Ok(gene)
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Gene with the smallest position
    pub fn starter(&self) -> Option<GeneId> {
        self.genes.values().next().copied()
    }

    /// Gene with the largest position
    pub fn stopper(&self) -> Option<GeneId> {
        self.genes.values().next_back().copied()
    }

    /// Genes in contig order
    pub fn genes(&self) -> impl DoubleEndedIterator<Item = GeneId> + '_ {
        self.genes.values().copied()
    }

    /// Gene families in contig order, repeats included
    pub fn families(&self) -> impl DoubleEndedIterator<Item = FamilyId> + '_ {
        self.families.values().copied()
    }

    pub fn family_set(&self) -> BTreeSet<FamilyId> {
        self.families().collect()
    }

    pub fn number_of_families(&self) -> usize {
        self.family_set().len()
    }

    pub fn organism(&self) -> Option<OrgId> {
        self.organism
    }

    pub fn contig(&self) -> Option<ContigId> {
        self.contig
    }

    /// Same gene family order, read forward or backward.
    pub fn same_synteny(&self, other: &Region) -> bool {
        self.families.len() == other.families.len()
            && (self.families().eq(other.families()) || self.families().eq(other.families().rev()))
    }

    /// Same set of gene families, regardless of order and copy number.
    pub fn same_content(&self, other: &Region) -> bool {
        self.family_set() == other.family_set()
    }

    fn bounds(&self, pan: &Pangenome) -> Result<(usize, usize)> {
        match (self.starter(), self.stopper()) {
            (Some(starter), Some(stopper)) => {
                Ok((pan.gene(starter).position, pan.gene(stopper).position))
            }
            _ => Err(PangenomeError::Consistency(format!(
                "RGP {} has no genes",
                self.name
            ))),
        }
    }

    fn contig_len(&self, pan: &Pangenome) -> Result<(usize, bool)> {
        match self.contig {
            Some(contig) => {
                let contig = pan.contig(contig);
                Ok((contig.len(), contig.is_circular))
            }
            None => Err(PangenomeError::Consistency(format!(
                "RGP {} has no genes",
                self.name
            ))),
        }
    }

    /// Span in base pairs from the starter's start to the stopper's stop
    pub fn length(&self, pan: &Pangenome) -> Result<u64> {
        let (starter, stopper) = match (self.starter(), self.stopper()) {
            (Some(a), Some(b)) => (pan.gene(a), pan.gene(b)),
            _ => {
                return Err(PangenomeError::Consistency(format!(
                    "RGP {} has no genes",
                    self.name
                )))
            }
        };
        Ok(stopper.stop.saturating_sub(starter.start))
    }

    /// The region spans its contig from the first to the last gene
    pub fn is_whole_contig(&self, pan: &Pangenome) -> Result<bool> {
        let (first, last) = self.bounds(pan)?;
        let (len, _) = self.contig_len(pan)?;
        Ok(first == 0 && last + 1 == len)
    }

    /// The region touches an end of a linear contig. Circular contigs have no ends.
    pub fn is_contig_border(&self, pan: &Pangenome) -> Result<bool> {
        let (first, last) = self.bounds(pan)?;
        let (len, is_circular) = self.contig_len(pan)?;
        if is_circular {
            return Ok(false);
        }
        Ok(first == 0 || last + 1 == len)
    }

    /// RNAs of the contig lying inside the region
    pub fn get_rnas<'a>(&self, pan: &'a Pangenome) -> Vec<&'a Rna> {
        let (Some(starter), Some(stopper), Some(contig)) =
            (self.starter(), self.stopper(), self.contig)
        else {
            return Vec::new();
        };
        let (start, stop) = (pan.gene(starter).start, pan.gene(stopper).stop);
        pan.contig(contig)
            .rnas
            .iter()
            .filter(|rna| rna.start >= start && rna.stop <= stop)
            .collect()
    }

    /// Up to `n` landmark genes on each side of the region.
    ///
    /// Landmarks are genes of persistent families that are not multigenic. The upstream
    /// walk starts before the starter and goes down, the downstream walk starts after the
    /// stopper and goes up. Circular contigs wrap around; a walk ends when it reaches the
    /// span of the region, and the downstream border skips genes already taken upstream.
    pub fn get_bordering_genes(
        &self,
        pan: &Pangenome,
        n: usize,
        multigenics: &BTreeSet<FamilyId>,
    ) -> Result<(Vec<GeneId>, Vec<GeneId>)> {
        let (first, last) = self.bounds(pan)?;
        let contig = pan.contig(self.contig.ok_or_else(|| {
            PangenomeError::Consistency(format!("RGP {} has no contig", self.name))
        })?);
        let len = contig.len();
        let in_region = |pos: usize| (first..=last).contains(&pos);

        let is_landmark = |gene: GeneId| -> bool {
            match pan.gene(gene).family {
                Some(fam) => pan.family(fam).is_persistent() && !multigenics.contains(&fam),
                None => false,
            }
        };

        let mut upstream = Vec::new();
        let mut pos = first;
        while upstream.len() < n {
            let prev = match pos {
                0 if contig.is_circular => len - 1,
                0 => break,
                p => p - 1,
            };
            if in_region(prev) {
                break;
            }
            if let Some(gene) = contig.get(prev) {
                if is_landmark(gene) {
                    upstream.push(gene);
                }
            }
            pos = prev;
        }

        let mut downstream = Vec::new();
        let mut pos = last;
        while downstream.len() < n {
            let next = if pos + 1 == len {
                if contig.is_circular {
                    0
                } else {
                    break;
                }
            } else {
                pos + 1
            };
            if in_region(next) {
                break;
            }
            if let Some(gene) = contig.get(next) {
                if is_landmark(gene) && !upstream.contains(&gene) {
                    downstream.push(gene);
                }
            }
            pos = next;
        }

        Ok((upstream, downstream))
    }
}

/// Regions are equal when their gene family sequences match forward or reversed.
impl PartialEq for Region {
    fn eq(&self, other: &Self) -> bool {
        self.same_synteny(other)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
