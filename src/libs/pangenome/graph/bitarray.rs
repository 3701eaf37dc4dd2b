use super::Pangenome;
use crate::libs::pangenome::family::FamilyId;
use crate::libs::pangenome::genome::OrgId;
use fixedbitset::FixedBitSet;
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// How a duplication ratio is compared against the multigenic threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Margin {
    /// ratio >= threshold
    #[default]
    Inclusive,
    /// ratio > threshold
    Exclusive,
}

impl Margin {
    pub fn accepts(&self, ratio: f64, threshold: f64) -> bool {
        match self {
            Margin::Inclusive => ratio >= threshold,
            Margin::Exclusive => ratio > threshold,
        }
    }
}

/// Build the organism index if needed and return it.
///
/// Organisms get bit positions in registration order. An existing index is returned
/// unchanged, even if organisms were added since.
pub fn compute_org_index(pan: &mut Pangenome) -> &IndexMap<OrgId, usize> {
    if pan.org_index.is_none() {
        let index: IndexMap<OrgId, usize> = pan
            .org_getter
            .values()
            .enumerate()
            .map(|(i, &org)| (org, i))
            .collect();
        log::debug!("Organism index built for {} organisms", index.len());
        pan.org_index = Some(index);
    }
    pan.org_index.get_or_insert_with(IndexMap::new)
}

/// Presence vector of a set of organisms against an index.
/// Organisms missing from the index are skipped.
pub fn presence_bitarray<I>(orgs: I, index: &IndexMap<OrgId, usize>) -> FixedBitSet
where
    I: IntoIterator<Item = OrgId>,
{
    let mut bits = FixedBitSet::with_capacity(index.len());
    for org in orgs {
        if let Some(&i) = index.get(&org) {
            bits.insert(i);
        }
    }
    bits
}

/// Attach a presence/absence vector to every live family.
pub fn compute_family_bitarrays(pan: &mut Pangenome) -> &IndexMap<OrgId, usize> {
    compute_org_index(pan);

    let Pangenome {
        families,
        genes,
        org_index,
        ..
    } = &mut *pan;
    if let Some(index) = org_index.as_ref() {
        for fam in families.iter_mut().filter(|f| !f.removed) {
            let orgs = fam.genes.iter().map(|&g| genes[g].organism);
            fam.bitarray = Some(presence_bitarray(orgs, index));
        }
    }

    compute_org_index(pan)
}

/// Organisms holding more than one gene of the family over organisms holding any.
/// `None` for a family without genes.
pub fn duplication_ratio(pan: &Pangenome, fam: FamilyId) -> Option<f64> {
    let org_dict = pan.family_org_dict(fam);
    if org_dict.is_empty() {
        return None;
    }
    let dup = org_dict.values().filter(|genes| genes.len() > 1).count();
    Some(dup as f64 / org_dict.len() as f64)
}

/// Persistent families duplicated in a large enough share of their organisms.
pub fn get_multigenics(pan: &Pangenome, dup_margin: f64, margin: Margin) -> BTreeSet<FamilyId> {
    let mut multigenics = BTreeSet::new();
    for fam in pan.families().filter(|f| f.is_persistent()) {
        if let Some(ratio) = duplication_ratio(pan, fam.id) {
            if margin.accepts(ratio, dup_margin) {
                multigenics.insert(fam.id);
            }
        }
    }
    log::info!(
        "{} gene families are defined as persistent multigenic",
        multigenics.len()
    );
    multigenics
}
