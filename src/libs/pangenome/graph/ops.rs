use super::Pangenome;
use crate::libs::pangenome::edge::{edge_key, Edge, EdgeId};
use crate::libs::pangenome::error::{PangenomeError, Result};
use crate::libs::pangenome::family::{FamilyId, GeneFamily};
use crate::libs::pangenome::genome::{Contig, ContigId, Gene, GeneId, OrgId, Organism, Rna};
use crate::libs::pangenome::module::{Module, ModuleId};
use crate::libs::pangenome::region::{Region, RegionId};
use crate::libs::pangenome::spot::{Spot, SpotId};
use std::collections::BTreeSet;

/// Return an existing organism or register a new one with the given name.
pub fn get_organism(pan: &mut Pangenome, name: &str) -> OrgId {
    if let Some(&id) = pan.org_getter.get(name) {
        return id;
    }
    // The name is free, so registration cannot collide.
    register_organism(pan, Organism::new(name))
}

/// Register an organism that must not exist yet.
pub fn add_organism(pan: &mut Pangenome, org: Organism) -> Result<OrgId> {
    if pan.org_getter.contains_key(&org.name) {
        return Err(PangenomeError::DuplicateKey(format!(
            "Redundant organism name was found ({}). All organisms must have unique names.",
            org.name
        )));
    }
    Ok(register_organism(pan, org))
}

fn register_organism(pan: &mut Pangenome, mut org: Organism) -> OrgId {
    if pan.org_index.is_some() {
        log::warn!(
            "Organism {} added after the organism index was built; bit-vectors are stale until the index is rebuilt",
            org.name
        );
    }
    let id = pan.organisms.len();
    org.id = id;
    pan.org_getter.insert(org.name.clone(), id);
    pan.organisms.push(org);
    id
}

/// Return the contig `name` of an organism, creating it if needed.
pub fn add_contig(pan: &mut Pangenome, org: OrgId, name: &str, is_circular: bool) -> ContigId {
    if let Some(&id) = pan.organisms[org].contigs.get(name) {
        if pan.contigs[id].is_circular != is_circular {
            log::warn!(
                "Contig {} of {} already registered with another topology",
                name,
                pan.organisms[org].name
            );
        }
        return id;
    }

    let id = pan.contigs.len();
    pan.contigs.push(Contig {
        id,
        name: name.to_string(),
        organism: org,
        is_circular,
        genes: Vec::new(),
        rnas: Vec::new(),
    });
    pan.organisms[org].contigs.insert(name.to_string(), id);
    id
}

/// Append a gene at the next position of a contig.
pub fn add_gene(
    pan: &mut Pangenome,
    contig: ContigId,
    name: &str,
    start: u64,
    stop: u64,
    strand: char,
) -> GeneId {
    let id = pan.genes.len();
    let position = pan.contigs[contig].genes.len();
    pan.genes.push(Gene {
        id,
        name: name.to_string(),
        organism: pan.contigs[contig].organism,
        contig,
        position,
        start,
        stop,
        strand,
        family: None,
        rgp: None,
    });
    pan.contigs[contig].genes.push(id);

    pan.gene_getter = None;
    id
}

pub fn add_rna(pan: &mut Pangenome, contig: ContigId, name: &str, start: u64, stop: u64, strand: char) {
    pan.contigs[contig].rnas.push(Rna {
        name: name.to_string(),
        start,
        stop,
        strand,
    });
}

/// Get or create the family `name`. Ids come from a counter and are never reused.
pub fn add_gene_family(pan: &mut Pangenome, name: &str) -> FamilyId {
    if let Some(&id) = pan.fam_getter.get(name) {
        return id;
    }
    let id = pan.families.len();
    pan.families.push(GeneFamily::new(id, name));
    pan.fam_getter.insert(name.to_string(), id);
    id
}

pub fn add_gene_to_family(pan: &mut Pangenome, gene: GeneId, fam: FamilyId) -> Result<()> {
    if pan.get_family(fam).is_none() {
        return Err(PangenomeError::Lookup(format!(
            "Gene family {} does not exist",
            fam
        )));
    }
    match pan.genes[gene].family {
        Some(current) if current != fam => {
            return Err(PangenomeError::Consistency(format!(
                "Gene {} already belongs to family {}",
                pan.genes[gene].name, pan.families[current].name
            )));
        }
        _ => {}
    }
    pan.genes[gene].family = Some(fam);
    pan.families[fam].genes.insert(gene);
    Ok(())
}

/// Get or create the edge between the families of two adjacent genes and record the pair.
pub fn add_edge(pan: &mut Pangenome, gene1: GeneId, gene2: GeneId) -> Result<EdgeId> {
    let (g1, g2) = (&pan.genes[gene1], &pan.genes[gene2]);
    let (f1, f2) = match (g1.family, g2.family) {
        (Some(f1), Some(f2)) => (f1, f2),
        _ => {
            return Err(PangenomeError::InvalidGraph(format!(
                "Cannot link genes {} and {}: both need a gene family",
                g1.name, g2.name
            )))
        }
    };
    if g1.organism != g2.organism {
        return Err(PangenomeError::InvalidGraph(format!(
            "Genes {} and {} are from different organisms",
            g1.name, g2.name
        )));
    }
    if f1 == f2 {
        return Err(PangenomeError::InvalidGraph(format!(
            "Genes {} and {} are in the same family {}",
            g1.name, g2.name, pan.families[f1].name
        )));
    }
    if pan.families[f1].removed || pan.families[f2].removed {
        return Err(PangenomeError::InvalidGraph(format!(
            "Cannot link genes {} and {}: a family was removed",
            g1.name, g2.name
        )));
    }
    let org = g1.organism;

    let key = edge_key(f1, f2);
    let id = match pan.edge_getter.get(&key) {
        Some(&id) => id,
        None => {
            let id = pan.edges.len();
            pan.edges.push(Edge::new(id, f1, f2));
            pan.edge_getter.insert(key, id);
            pan.families[f1].edges.insert(f2, id);
            pan.families[f2].edges.insert(f1, id);
            id
        }
    };
    pan.edges[id].add_genes(org, gene1, gene2);

    Ok(id)
}

/// Remove a set of families and all of their edges.
pub fn remove_fams_from(pan: &mut Pangenome, fams: &[FamilyId]) -> Result<()> {
    let distinct: BTreeSet<FamilyId> = fams.iter().copied().collect();
    if distinct.len() != fams.len() {
        return Err(PangenomeError::Consistency(
            "A family is listed more than once for removal".to_string(),
        ));
    }
    if let Some(&missing) = distinct.iter().find(|&&f| pan.get_family(f).is_none()) {
        return Err(PangenomeError::Lookup(format!(
            "Gene family {} is not in the pangenome",
            missing
        )));
    }

    let old_size = pan.fam_getter.len();
    for &fam in fams {
        let edges = std::mem::take(&mut pan.families[fam].edges);
        for (neighbor, edge) in edges {
            pan.families[neighbor].edges.remove(&fam);
            pan.edge_getter.remove(&edge_key(fam, neighbor));
            pan.edges[edge].removed = true;
        }
        let name = pan.families[fam].name.clone();
        pan.fam_getter.shift_remove(&name);
        pan.families[fam].removed = true;
    }

    if pan.fam_getter.len() + fams.len() != old_size {
        return Err(PangenomeError::Consistency(
            "Problems in the family removal from the pangenome".to_string(),
        ));
    }
    log::debug!("Removed {} gene families", fams.len());
    Ok(())
}

/// Link consecutive genes of every contig; circular contigs are closed last -> first.
///
/// Genes without a live family are stepped over, and consecutive genes of the same
/// family do not make an edge. Returns the number of edges in the graph.
pub fn compute_neighbors_graph(pan: &mut Pangenome) -> Result<usize> {
    for contig in 0..pan.contigs.len() {
        let genes: Vec<GeneId> = pan.contigs[contig]
            .genes
            .iter()
            .copied()
            .filter(|&g| {
                pan.genes[g]
                    .family
                    .is_some_and(|f| !pan.families[f].removed)
            })
            .collect();

        let mut prev: Option<GeneId> = None;
        for &gene in &genes {
            if let Some(p) = prev {
                if pan.genes[p].family != pan.genes[gene].family {
                    add_edge(pan, p, gene)?;
                }
            }
            prev = Some(gene);
        }

        if pan.contigs[contig].is_circular && genes.len() > 1 {
            let (first, last) = (genes[0], genes[genes.len() - 1]);
            if pan.genes[first].family != pan.genes[last].family {
                add_edge(pan, last, first)?;
            }
        }
    }
    log::info!(
        "Neighbors graph: {} families, {} edges",
        pan.number_of_fams(),
        pan.number_of_edges()
    );
    Ok(pan.number_of_edges())
}

/// Register a region and link its genes back to it.
pub fn add_region(pan: &mut Pangenome, region: Region) -> Result<RegionId> {
    if pan.region_getter.contains_key(&region.name) {
        return Err(PangenomeError::DuplicateKey(format!(
            "A region named {} already exists",
            region.name
        )));
    }
    let id = pan.regions.len();
    for gene in region.genes() {
        pan.genes[gene].rgp = Some(id);
    }
    pan.region_getter.insert(region.name.clone(), id);
    pan.regions.push(region);
    Ok(id)
}

pub fn add_spot(pan: &mut Pangenome, spot: Spot) -> Result<SpotId> {
    let id = spot.id;
    if pan.spots.contains_key(&id) {
        return Err(PangenomeError::DuplicateKey(format!(
            "A spot with id {} already exists",
            id
        )));
    }
    pan.spots.insert(id, spot);
    Ok(id)
}

pub fn add_region_to_spot(pan: &mut Pangenome, spot_id: SpotId, region: RegionId) -> Result<()> {
    let name = pan
        .regions
        .get(region)
        .map(|r| r.name.clone())
        .ok_or_else(|| PangenomeError::Lookup(format!("No region with id {}", region)))?;
    let spot = pan
        .spots
        .get_mut(&spot_id)
        .ok_or_else(|| PangenomeError::Lookup(format!("No spot with id {}", spot_id)))?;
    spot.insert_region(name, region)
}

/// Register a module and link its families back to it.
pub fn add_module(pan: &mut Pangenome, module: Module) -> Result<ModuleId> {
    let id = module.id;
    if pan.modules.contains_key(&id) {
        return Err(PangenomeError::DuplicateKey(format!(
            "A module with id {} already exists",
            id
        )));
    }
    for fam in module.families() {
        if pan.get_family(fam).is_none() {
            return Err(PangenomeError::Lookup(format!(
                "Module {} refers to unknown gene family {}",
                id, fam
            )));
        }
    }
    for fam in module.families() {
        pan.families[fam].add_module(id);
    }
    pan.modules.insert(id, module);
    Ok(id)
}

pub fn add_family_to_module(pan: &mut Pangenome, module: ModuleId, fam: FamilyId) -> Result<()> {
    let name = match pan.get_family(fam) {
        Some(f) => f.name.clone(),
        None => {
            return Err(PangenomeError::Lookup(format!(
                "Gene family {} does not exist",
                fam
            )))
        }
    };
    pan.module_mut(module)?.insert_family(name, fam)?;
    pan.families[fam].add_module(module);
    Ok(())
}
