use super::error::{PangenomeError, Result};
use super::family::FamilyId;
use super::genome::GeneId;
use super::graph::Pangenome;
use super::region::{Region, RegionId};
use indexmap::{IndexMap, IndexSet};
use std::cell::OnceCell;
use std::collections::BTreeSet;
use std::fmt;

/// Spot identifier, chosen by the caller
pub type SpotId = usize;

/// Families bordering a region: upstream and downstream landmarks
pub type BorderPair = [Vec<FamilyId>; 2];

/// Representative region -> every region equivalent to it (representative included)
pub type RegionClasses = IndexMap<RegionId, Vec<RegionId>>;

/// A set of RGPs sharing one insertion site across genomes.
///
/// The synteny and content classes are computed on first request and kept. Adding or
/// removing regions afterwards does not refresh them; call `invalidate` to do so.
#[derive(Debug, Clone, Default)]
pub struct Spot {
    pub id: SpotId,
    regions: IndexMap<String, RegionId>,
    uniq_ordered_set: OnceCell<RegionClasses>,
    uniq_content: OnceCell<RegionClasses>,
}

impl Spot {
    pub fn new(id: SpotId) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Add a registered region under its own name
    pub fn add_region(&mut self, pan: &Pangenome, region: RegionId) -> Result<()> {
        let name = pan
            .regions
            .get(region)
            .map(|r| r.name.clone())
            .ok_or_else(|| PangenomeError::Lookup(format!("No region with id {}", region)))?;
        self.insert_region(name, region)
    }

    pub(crate) fn insert_region(&mut self, name: String, region: RegionId) -> Result<()> {
        if let Some(&existing) = self.regions.get(&name) {
            if existing != region {
                return Err(PangenomeError::DuplicateKey(format!(
                    "A region named {} already exists in spot {}",
                    name, self.id
                )));
            }
        }
        if self.uniq_ordered_set.get().is_some() || self.uniq_content.get().is_some() {
            log::warn!(
                "Region {} added to {} after its unique classes were computed",
                name,
                self
            );
        }
        self.regions.insert(name, region);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<RegionId> {
        self.regions.get(name).copied().ok_or_else(|| {
            PangenomeError::Lookup(format!("Region {} does not exist in spot {}", name, self.id))
        })
    }

    pub fn remove(&mut self, name: &str) -> Result<RegionId> {
        self.regions.shift_remove(name).ok_or_else(|| {
            PangenomeError::Lookup(format!("Region {} does not exist in spot {}", name, self.id))
        })
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn regions(&self) -> impl Iterator<Item = RegionId> + '_ {
        self.regions.values().copied()
    }

    /// Distinct gene families of all regions, in first-seen order
    pub fn families(&self, pan: &Pangenome) -> IndexSet<FamilyId> {
        self.regions()
            .flat_map(|r| pan.region(r).families())
            .collect()
    }

    pub fn number_of_families(&self, pan: &Pangenome) -> usize {
        self.families(pan).len()
    }

    /// Bordering families of every region, grouped.
    ///
    /// Two regions share a border when their (upstream, downstream) family lists are
    /// identical, or identical once the two sides are swapped. Returns each distinct
    /// border with the number of regions having it, in first-seen order.
    pub fn borders(
        &self,
        pan: &Pangenome,
        set_size: usize,
        multigenics: &BTreeSet<FamilyId>,
    ) -> Result<Vec<(usize, BorderPair)>> {
        let mut family_borders: Vec<(usize, BorderPair)> = Vec::new();

        for rgp in self.regions() {
            let (up, down) = pan
                .region(rgp)
                .get_bordering_genes(pan, set_size, multigenics)?;
            let to_fams = |genes: Vec<GeneId>| -> Vec<FamilyId> {
                genes.into_iter().filter_map(|g| pan.gene(g).family).collect()
            };
            let current: BorderPair = [to_fams(up), to_fams(down)];

            let seen = family_borders.iter().position(|(_, former)| {
                *former == current || (former[0] == current[1] && former[1] == current[0])
            });
            match seen {
                Some(i) => family_borders[i].0 += 1,
                None => family_borders.push((1, current)),
            }
        }

        Ok(family_borders)
    }

    /// Regions grouped by identical synteny (family order, either direction)
    pub fn get_uniq_to_rgp(&self, pan: &Pangenome) -> &RegionClasses {
        self.uniq_ordered_set
            .get_or_init(|| self.cluster(pan, Region::same_synteny))
    }

    fn get_content(&self, pan: &Pangenome) -> &RegionClasses {
        self.uniq_content
            .get_or_init(|| self.cluster(pan, Region::same_content))
    }

    /// One representative region per distinct synteny
    pub fn get_uniq_ordered_set(&self, pan: &Pangenome) -> Vec<RegionId> {
        self.get_uniq_to_rgp(pan).keys().copied().collect()
    }

    /// One representative region per distinct family content
    pub fn get_uniq_content(&self, pan: &Pangenome) -> Vec<RegionId> {
        self.get_content(pan).keys().copied().collect()
    }

    pub fn count_uniq_ordered_set(&self, pan: &Pangenome) -> IndexMap<RegionId, usize> {
        self.get_uniq_to_rgp(pan)
            .iter()
            .map(|(&k, v)| (k, v.len()))
            .collect()
    }

    pub fn count_uniq_content(&self, pan: &Pangenome) -> IndexMap<RegionId, usize> {
        self.get_content(pan)
            .iter()
            .map(|(&k, v)| (k, v.len()))
            .collect()
    }

    /// Drop the cached synteny and content classes
    pub fn invalidate(&mut self) {
        self.uniq_ordered_set.take();
        self.uniq_content.take();
    }

    /// Pairwise clustering: each region joins the first representative it matches,
    /// or becomes a representative itself.
    fn cluster<F>(&self, pan: &Pangenome, same: F) -> RegionClasses
    where
        F: Fn(&Region, &Region) -> bool,
    {
        let mut classes = RegionClasses::new();
        for rgp in self.regions() {
            let region = pan.region(rgp);
            let rep = classes
                .keys()
                .copied()
                .find(|&seen| same(region, pan.region(seen)));
            match rep {
                Some(rep) => classes.entry(rep).or_default().push(rgp),
                None => {
                    classes.insert(rgp, vec![rgp]);
                }
            }
        }
        log::debug!(
            "{}: {} regions in {} classes",
            self,
            self.regions.len(),
            classes.len()
        );
        classes
    }
}

impl fmt::Display for Spot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "spot_{}", self.id)
    }
}
