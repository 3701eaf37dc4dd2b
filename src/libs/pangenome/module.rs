use super::error::{PangenomeError, Result};
use super::family::FamilyId;
use super::genome::OrgId;
use super::graph::bitarray::presence_bitarray;
use super::graph::Pangenome;
use fixedbitset::FixedBitSet;
use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::fmt;

/// Module identifier, chosen by the caller
pub type ModuleId = usize;

/// Gene families that co-occur as a conserved cluster.
///
/// Families are linked back to the module when it is registered with
/// `Pangenome::add_module`, or when added through `Pangenome::add_family_to_module`.
#[derive(Debug, Clone, Default)]
pub struct Module {
    pub id: ModuleId,
    families: IndexMap<String, FamilyId>,
    pub bitarray: Option<FixedBitSet>,
}

impl Module {
    pub fn new(id: ModuleId) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Module made of the given families
    pub fn with_families(id: ModuleId, pan: &Pangenome, fams: &[FamilyId]) -> Result<Self> {
        let mut module = Self::new(id);
        for &fam in fams {
            module.add_family(pan, fam)?;
        }
        Ok(module)
    }

    /// Add a family under its own name. Use `Pangenome::add_family_to_module` once the
    /// module is registered, so that the family gets its back-link.
    pub fn add_family(&mut self, pan: &Pangenome, fam: FamilyId) -> Result<()> {
        let family = pan.get_family(fam).ok_or_else(|| {
            PangenomeError::Lookup(format!("Gene family {} does not exist", fam))
        })?;
        self.insert_family(family.name.clone(), fam)
    }

    pub(crate) fn insert_family(&mut self, name: String, fam: FamilyId) -> Result<()> {
        if let Some(&existing) = self.families.get(&name) {
            if existing != fam {
                return Err(PangenomeError::DuplicateKey(format!(
                    "A different gene family named {} already exists in {}",
                    name, self
                )));
            }
        }
        self.families.insert(name, fam);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<FamilyId> {
        self.families.get(name).copied().ok_or_else(|| {
            PangenomeError::Lookup(format!("There is no gene family named {} in {}", name, self))
        })
    }

    pub fn remove(&mut self, name: &str) -> Result<FamilyId> {
        self.families.shift_remove(name).ok_or_else(|| {
            PangenomeError::Lookup(format!("There is no gene family named {} in {}", name, self))
        })
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    pub fn families(&self) -> impl Iterator<Item = FamilyId> + '_ {
        self.families.values().copied()
    }

    pub fn family_set(&self) -> BTreeSet<FamilyId> {
        self.families().collect()
    }

    /// Presence/absence of the module over organisms: bit i is set when any family of
    /// the module has a gene in the organism at index i.
    pub fn mk_bitarray(&mut self, pan: &Pangenome, index: &IndexMap<OrgId, usize>) {
        let orgs = self
            .families()
            .flat_map(|fam| pan.family(fam).genes.iter())
            .map(|&g| pan.gene(g).organism);
        self.bitarray = Some(presence_bitarray(orgs, index));
    }
}

/// Modules are equal when they hold the same families
impl PartialEq for Module {
    fn eq(&self, other: &Self) -> bool {
        self.family_set() == other.family_set()
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "module_{}", self.id)
    }
}

/// Unordered set of gene families around a gene of interest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneContext {
    pub id: usize,
    pub families: BTreeSet<FamilyId>,
}

impl GeneContext {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            families: BTreeSet::new(),
        }
    }

    /// Context made of live families of `pan`
    pub fn with_families(id: usize, pan: &Pangenome, fams: &[FamilyId]) -> Result<Self> {
        let mut context = Self::new(id);
        for &fam in fams {
            context.add_family(pan, fam)?;
        }
        Ok(context)
    }

    pub fn add_family(&mut self, pan: &Pangenome, fam: FamilyId) -> Result<()> {
        if pan.get_family(fam).is_none() {
            return Err(PangenomeError::Lookup(format!(
                "Gene family {} does not exist; gene contexts are only made of gene families",
                fam
            )));
        }
        self.families.insert(fam);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two organisms; `a` and `b` in org1, `c` in org2
    fn toy() -> Pangenome {
        let mut pan = Pangenome::new();
        for (org, fams) in [("org1", vec!["a", "b"]), ("org2", vec!["c"])] {
            let org = pan.get_organism(org);
            let contig = pan.add_contig(org, "ctg", false);
            for (i, name) in fams.into_iter().enumerate() {
                let gene_name = format!("{}_{}", org, i);
                let gene = pan.add_gene(contig, &gene_name, 1, 100, '+');
                let fam = pan.add_gene_family(name);
                pan.add_gene_to_family(gene, fam).unwrap();
            }
        }
        pan
    }

    #[test]
    fn test_module_back_link() {
        let mut pan = toy();
        let a = pan.get_family_by_name("a").unwrap();
        let b = pan.get_family_by_name("b").unwrap();
        let c = pan.get_family_by_name("c").unwrap();

        let module = Module::with_families(0, &pan, &[a, b]).unwrap();
        assert!(pan.family(a).modules.is_empty());
        pan.add_module(module).unwrap();
        assert!(pan.family(a).modules.contains(&0));
        assert!(pan.family(b).modules.contains(&0));

        pan.add_family_to_module(0, c).unwrap();
        assert!(pan.family(c).modules.contains(&0));
        assert_eq!(pan.module(0).unwrap().len(), 3);
        assert_eq!(pan.module(0).unwrap().get("c").unwrap(), c);

        assert!(matches!(
            pan.add_module(Module::new(0)),
            Err(PangenomeError::DuplicateKey(_))
        ));
    }

    #[test]
    fn test_module_duplicate_name() {
        let pan = toy();
        let mut module = Module::new(1);
        module.insert_family("a".to_string(), 0).unwrap();
        assert!(matches!(
            module.insert_family("a".to_string(), 1),
            Err(PangenomeError::DuplicateKey(_))
        ));
        assert!(matches!(module.get("z"), Err(PangenomeError::Lookup(_))));
        assert!(matches!(
            module.add_family(&pan, 99),
            Err(PangenomeError::Lookup(_))
        ));
        assert_eq!(module.remove("a").unwrap(), 0);
        assert!(module.is_empty());
    }

    #[test]
    fn test_module_equality_ignores_order() {
        let pan = toy();
        let m1 = Module::with_families(1, &pan, &[0, 1]).unwrap();
        let m2 = Module::with_families(2, &pan, &[1, 0]).unwrap();
        let m3 = Module::with_families(3, &pan, &[1, 2]).unwrap();
        assert_eq!(m1, m2);
        assert_ne!(m1, m3);
    }

    #[test]
    fn test_module_bitarray() {
        let mut pan = toy();
        let index = pan.compute_org_index().clone();
        let a = pan.get_family_by_name("a").unwrap();
        let c = pan.get_family_by_name("c").unwrap();

        let mut module = Module::with_families(0, &pan, &[a]).unwrap();
        module.mk_bitarray(&pan, &index);
        let bits = module.bitarray.as_ref().unwrap();
        assert_eq!(bits.len(), 2);
        assert!(bits.contains(0));
        assert!(!bits.contains(1));

        let mut module = Module::with_families(1, &pan, &[a, c]).unwrap();
        module.mk_bitarray(&pan, &index);
        assert_eq!(module.bitarray.as_ref().unwrap().count_ones(..), 2);
    }

    #[test]
    fn test_gene_context() {
        let mut pan = toy();
        let context = GeneContext::with_families(5, &pan, &[0, 1, 1]).unwrap();
        assert_eq!(context.len(), 2);

        assert!(GeneContext::with_families(6, &pan, &[0, 42]).is_err());

        pan.remove_fams_from(&[2]).unwrap();
        let mut context = GeneContext::new(7);
        assert!(matches!(
            context.add_family(&pan, 2),
            Err(PangenomeError::Lookup(_))
        ));
    }
}
