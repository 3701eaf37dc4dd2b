pub mod bitarray;
pub mod cliques;
pub mod ops;
#[cfg(test)]
pub mod tests;
pub mod traversal;

pub use bitarray::Margin;
pub use cliques::Cliques;
pub use traversal::{ConnectedComponents, Subgraph};

use super::edge::{edge_key, Edge, EdgeId};
use super::error::{PangenomeError, Result};
use super::family::{FamilyId, GeneFamily};
use super::genome::{Contig, ContigId, Gene, GeneId, OrgId, Organism};
use super::module::{Module, ModuleId};
use super::region::{Region, RegionId};
use super::spot::{Spot, SpotId};
use indexmap::IndexMap;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// The pangenome graph and every registry attached to it.
///
/// All entities live in arenas and refer to each other by index, so relations like
/// family <-> edge <-> family or family <-> module are plain id sets.
/// Mutation needs `&mut self`; traversals and queries only borrow.
#[derive(Debug, Default, Clone)]
pub struct Pangenome {
    pub(crate) families: Vec<GeneFamily>,
    pub(crate) fam_getter: IndexMap<String, FamilyId>,

    pub(crate) organisms: Vec<Organism>,
    pub(crate) org_getter: IndexMap<String, OrgId>,
    pub(crate) contigs: Vec<Contig>,
    pub(crate) genes: Vec<Gene>,

    pub(crate) edges: Vec<Edge>,
    pub(crate) edge_getter: HashMap<(FamilyId, FamilyId), EdgeId>,

    pub(crate) regions: Vec<Region>,
    pub(crate) region_getter: IndexMap<String, RegionId>,
    pub(crate) spots: BTreeMap<SpotId, Spot>,
    pub(crate) modules: BTreeMap<ModuleId, Module>,

    /// Gene name -> gene id. Built on demand, dropped whenever a gene is added.
    pub(crate) gene_getter: Option<HashMap<String, GeneId>>,

    /// Organism -> bit position. Built on demand and kept until `invalidate_org_index`.
    pub(crate) org_index: Option<IndexMap<OrgId, usize>>,
}

impl Pangenome {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of gene families (removed ones excluded)
    pub fn len(&self) -> usize {
        self.fam_getter.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn number_of_fams(&self) -> usize {
        self.fam_getter.len()
    }

    pub fn number_of_organisms(&self) -> usize {
        self.organisms.len()
    }

    pub fn number_of_contigs(&self) -> usize {
        self.contigs.len()
    }

    pub fn number_of_genes(&self) -> usize {
        self.genes.len()
    }

    pub fn number_of_edges(&self) -> usize {
        self.edge_getter.len()
    }

    // --- Arena access ---

    /// Family by id, including removed ones.
    ///
    /// Panics if `id` was not produced by this pangenome.
    pub fn family(&self, id: FamilyId) -> &GeneFamily {
        &self.families[id]
    }

    /// Family by id, `None` for unknown or removed families.
    pub fn get_family(&self, id: FamilyId) -> Option<&GeneFamily> {
        self.families.get(id).filter(|f| !f.removed)
    }

    pub fn get_family_mut(&mut self, id: FamilyId) -> Option<&mut GeneFamily> {
        self.families.get_mut(id).filter(|f| !f.removed)
    }

    pub fn get_family_by_name(&self, name: &str) -> Result<FamilyId> {
        self.fam_getter
            .get(name)
            .copied()
            .ok_or_else(|| PangenomeError::Lookup(format!("No gene family named {}", name)))
    }

    /// Live families in id order
    pub fn families(&self) -> impl Iterator<Item = &GeneFamily> {
        self.families.iter().filter(|f| !f.removed)
    }

    pub fn family_ids(&self) -> Vec<FamilyId> {
        self.families().map(|f| f.id).collect()
    }

    pub fn organism(&self, id: OrgId) -> &Organism {
        &self.organisms[id]
    }

    pub fn organisms(&self) -> impl Iterator<Item = &Organism> {
        self.organisms.iter()
    }

    pub fn get_organism_by_name(&self, name: &str) -> Result<OrgId> {
        self.org_getter
            .get(name)
            .copied()
            .ok_or_else(|| PangenomeError::Lookup(format!("No organism named {}", name)))
    }

    pub fn contig(&self, id: ContigId) -> &Contig {
        &self.contigs[id]
    }

    pub fn contigs(&self) -> impl Iterator<Item = &Contig> {
        self.contigs.iter()
    }

    pub fn gene(&self, id: GeneId) -> &Gene {
        &self.genes[id]
    }

    pub fn genes(&self) -> impl Iterator<Item = &Gene> {
        self.genes.iter()
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id]
    }

    /// Live edges in id order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(|e| !e.removed)
    }

    /// The edge linking two families, if any
    pub fn get_edge(&self, a: FamilyId, b: FamilyId) -> Option<EdgeId> {
        self.edge_getter.get(&edge_key(a, b)).copied()
    }

    pub fn region(&self, id: RegionId) -> &Region {
        &self.regions[id]
    }

    pub fn region_mut(&mut self, id: RegionId) -> &mut Region {
        &mut self.regions[id]
    }

    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    pub fn get_region(&self, name: &str) -> Result<RegionId> {
        self.region_getter
            .get(name)
            .copied()
            .ok_or_else(|| PangenomeError::Lookup(format!("No region named {}", name)))
    }

    pub fn spot(&self, id: SpotId) -> Result<&Spot> {
        self.spots
            .get(&id)
            .ok_or_else(|| PangenomeError::Lookup(format!("No spot with id {}", id)))
    }

    pub fn spots(&self) -> impl Iterator<Item = &Spot> {
        self.spots.values()
    }

    pub fn module(&self, id: ModuleId) -> Result<&Module> {
        self.modules
            .get(&id)
            .ok_or_else(|| PangenomeError::Lookup(format!("No module with id {}", id)))
    }

    pub fn module_mut(&mut self, id: ModuleId) -> Result<&mut Module> {
        self.modules
            .get_mut(&id)
            .ok_or_else(|| PangenomeError::Lookup(format!("No module with id {}", id)))
    }

    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    // --- Delegation to ops ---

    pub fn get_organism(&mut self, name: &str) -> OrgId {
        ops::get_organism(self, name)
    }

    pub fn add_organism(&mut self, org: Organism) -> Result<OrgId> {
        ops::add_organism(self, org)
    }

    pub fn add_contig(&mut self, org: OrgId, name: &str, is_circular: bool) -> ContigId {
        ops::add_contig(self, org, name, is_circular)
    }

    pub fn add_gene(
        &mut self,
        contig: ContigId,
        name: &str,
        start: u64,
        stop: u64,
        strand: char,
    ) -> GeneId {
        ops::add_gene(self, contig, name, start, stop, strand)
    }

    pub fn add_rna(&mut self, contig: ContigId, name: &str, start: u64, stop: u64, strand: char) {
        ops::add_rna(self, contig, name, start, stop, strand)
    }

    pub fn add_gene_family(&mut self, name: &str) -> FamilyId {
        ops::add_gene_family(self, name)
    }

    pub fn add_gene_to_family(&mut self, gene: GeneId, fam: FamilyId) -> Result<()> {
        ops::add_gene_to_family(self, gene, fam)
    }

    pub fn add_edge(&mut self, gene1: GeneId, gene2: GeneId) -> Result<EdgeId> {
        ops::add_edge(self, gene1, gene2)
    }

    pub fn remove_fams_from(&mut self, fams: &[FamilyId]) -> Result<()> {
        ops::remove_fams_from(self, fams)
    }

    pub fn compute_neighbors_graph(&mut self) -> Result<usize> {
        ops::compute_neighbors_graph(self)
    }

    pub fn add_region(&mut self, region: Region) -> Result<RegionId> {
        ops::add_region(self, region)
    }

    pub fn add_spot(&mut self, spot: Spot) -> Result<SpotId> {
        ops::add_spot(self, spot)
    }

    pub fn add_region_to_spot(&mut self, spot: SpotId, region: RegionId) -> Result<()> {
        ops::add_region_to_spot(self, spot, region)
    }

    pub fn add_module(&mut self, module: Module) -> Result<ModuleId> {
        ops::add_module(self, module)
    }

    pub fn add_family_to_module(&mut self, module: ModuleId, fam: FamilyId) -> Result<()> {
        ops::add_family_to_module(self, module, fam)
    }

    /// Link every family of a spot back to it
    pub fn spot_2_families(&mut self, spot: SpotId) -> Result<()> {
        let fams = self.spot(spot)?.families(self);
        for fam in fams {
            self.families[fam].add_spot(spot);
        }
        Ok(())
    }

    // --- Gene getter ---

    /// Look a gene up by its annotation identifier.
    ///
    /// The name index is built on first use from the organisms' contigs, or from the
    /// families' genes when no organism is loaded.
    pub fn get_gene(&mut self, name: &str) -> Result<GeneId> {
        if self.gene_getter.is_none() {
            self.gene_getter = Some(self.mk_gene_getter());
        }
        self.gene_getter
            .as_ref()
            .and_then(|getter| getter.get(name).copied())
            .ok_or_else(|| PangenomeError::Lookup(format!("No gene with identifier {}", name)))
    }

    pub fn invalidate_gene_getter(&mut self) {
        self.gene_getter = None;
    }

    fn mk_gene_getter(&self) -> HashMap<String, GeneId> {
        let mut getter = HashMap::with_capacity(self.genes.len());
        if !self.organisms.is_empty() {
            for org in &self.organisms {
                for &contig in org.contigs.values() {
                    for &gene in &self.contigs[contig].genes {
                        getter.insert(self.genes[gene].name.clone(), gene);
                    }
                }
            }
        } else {
            for fam in self.families() {
                for &gene in &fam.genes {
                    getter.insert(self.genes[gene].name.clone(), gene);
                }
            }
        }
        log::debug!("Gene getter built with {} genes", getter.len());
        getter
    }

    // --- Delegation to traversal ---

    pub fn connected_components(&self) -> ConnectedComponents<'_> {
        traversal::ConnectedComponents::new(self)
    }

    pub fn subgraph(&self, fams: &BTreeSet<FamilyId>) -> Subgraph {
        traversal::subgraph(self, fams)
    }

    // --- Delegation to cliques ---

    /// Maximal cliques of the subgraph induced by `fams`, or of the whole graph when empty
    pub fn find_cliques(&self, fams: &[FamilyId]) -> Cliques<'_> {
        cliques::Cliques::new(self, fams)
    }

    // --- Delegation to bitarray ---

    pub fn compute_org_index(&mut self) -> &IndexMap<OrgId, usize> {
        bitarray::compute_org_index(self)
    }

    pub fn org_index(&self) -> Option<&IndexMap<OrgId, usize>> {
        self.org_index.as_ref()
    }

    pub fn invalidate_org_index(&mut self) {
        self.org_index = None;
    }

    pub fn compute_family_bitarrays(&mut self) -> &IndexMap<OrgId, usize> {
        bitarray::compute_family_bitarrays(self)
    }

    pub fn get_multigenics(&self, dup_margin: f64) -> BTreeSet<FamilyId> {
        bitarray::get_multigenics(self, dup_margin, Margin::default())
    }

    pub fn get_multigenics_with(&self, dup_margin: f64, margin: Margin) -> BTreeSet<FamilyId> {
        bitarray::get_multigenics(self, dup_margin, margin)
    }

    pub fn duplication_ratio(&self, fam: FamilyId) -> Option<f64> {
        bitarray::duplication_ratio(self, fam)
    }

    /// Organisms in which a family has at least one gene
    pub fn family_organisms(&self, fam: FamilyId) -> BTreeSet<OrgId> {
        self.families[fam]
            .genes
            .iter()
            .map(|&g| self.genes[g].organism)
            .collect()
    }

    /// Organism -> member genes of a family
    pub fn family_org_dict(&self, fam: FamilyId) -> BTreeMap<OrgId, Vec<GeneId>> {
        let mut dict: BTreeMap<OrgId, Vec<GeneId>> = BTreeMap::new();
        for &g in &self.families[fam].genes {
            dict.entry(self.genes[g].organism).or_default().push(g);
        }
        dict
    }

    /// Summary of the registry sizes
    pub fn info(&self) -> String {
        let mut info = String::new();
        info += &format!("Gene families\t{}\n", self.number_of_fams());
        info += &format!("Organisms\t{}\n", self.number_of_organisms());
        info += &format!("Contigs\t{}\n", self.number_of_contigs());
        info += &format!("Genes\t{}\n", self.number_of_genes());
        info += &format!("Edges\t{}\n", self.number_of_edges());
        if !self.regions.is_empty() {
            info += &format!("RGPs\t{}\n", self.regions.len());
        }
        if !self.spots.is_empty() {
            info += &format!("Spots\t{}\n", self.spots.len());
        }
        if !self.modules.is_empty() {
            info += &format!("Modules\t{}\n", self.modules.len());
        }
        info
    }
}
