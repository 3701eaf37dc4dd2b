use super::edge::EdgeId;
use super::genome::GeneId;
use super::module::ModuleId;
use super::spot::SpotId;
use fixedbitset::FixedBitSet;
use indexmap::IndexSet;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// FamilyId is the index of a family in the Pangenome's family arena.
/// Ids follow creation order and are never reused.
pub type FamilyId = usize;

/// Pangenome partition of a gene family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Partition {
    Persistent,
    Shell,
    Cloud,
    #[default]
    Unclassified,
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Partition::Persistent => "persistent",
            Partition::Shell => "shell",
            Partition::Cloud => "cloud",
            Partition::Unclassified => "unclassified",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Partition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "persistent" | "p" => Ok(Partition::Persistent),
            "shell" | "s" => Ok(Partition::Shell),
            "cloud" | "c" => Ok(Partition::Cloud),
            "unclassified" | "undefined" | "u" | "" => Ok(Partition::Unclassified),
            _ => Err(format!("Unknown partition: {}", s)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeneFamily {
    /// Unique identifier (index in the arena)
    pub id: FamilyId,

    /// Unique name in the pangenome
    pub name: String,

    /// Member genes
    pub genes: IndexSet<GeneId>,

    /// Neighbor family -> shared edge.
    /// The same edge id is stored on both endpoints.
    pub edges: BTreeMap<FamilyId, EdgeId>,

    pub partition: Partition,

    /// Presence/absence over organisms, see `Pangenome::compute_family_bitarrays`
    pub bitarray: Option<FixedBitSet>,

    /// Representative protein sequence
    pub sequence: Option<String>,

    pub modules: BTreeSet<ModuleId>,
    pub spots: BTreeSet<SpotId>,

    /// Soft deletion flag, set by `Pangenome::remove_fams_from`.
    pub removed: bool,
}

impl GeneFamily {
    pub fn new(id: FamilyId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            genes: IndexSet::new(),
            edges: BTreeMap::new(),
            partition: Partition::default(),
            bitarray: None,
            sequence: None,
            modules: BTreeSet::new(),
            spots: BTreeSet::new(),
            removed: false,
        }
    }

    pub fn add_sequence(&mut self, seq: impl Into<String>) {
        self.sequence = Some(seq.into());
    }

    pub fn add_module(&mut self, module: ModuleId) {
        self.modules.insert(module);
    }

    pub fn add_spot(&mut self, spot: SpotId) {
        self.spots.insert(spot);
    }

    pub fn is_persistent(&self) -> bool {
        self.partition == Partition::Persistent
    }

    /// Adjacent families
    pub fn neighbors(&self) -> impl Iterator<Item = FamilyId> + '_ {
        self.edges.keys().copied()
    }

    pub fn neighbor_set(&self) -> BTreeSet<FamilyId> {
        self.edges.keys().copied().collect()
    }

    pub fn is_neighbor(&self, other: FamilyId) -> bool {
        self.edges.contains_key(&other)
    }

    pub fn number_of_genes(&self) -> usize {
        self.genes.len()
    }
}

impl fmt::Display for GeneFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_from_str() {
        assert_eq!("persistent".parse::<Partition>(), Ok(Partition::Persistent));
        assert_eq!("S".parse::<Partition>(), Ok(Partition::Shell));
        assert_eq!("c".parse::<Partition>(), Ok(Partition::Cloud));
        assert_eq!("undefined".parse::<Partition>(), Ok(Partition::Unclassified));
        assert!("core".parse::<Partition>().is_err());
        assert_eq!(Partition::Shell.to_string(), "shell");
    }

    #[test]
    fn test_family_defaults() {
        let mut fam = GeneFamily::new(3, "dnaA");
        assert_eq!(fam.partition, Partition::Unclassified);
        assert!(!fam.is_persistent());
        assert!(fam.sequence.is_none());

        fam.add_sequence("MSLSLWQQCLARLQDELPATEFSMWIRPLQAEL");
        assert!(fam.sequence.as_deref().unwrap().starts_with("MSL"));
        assert_eq!(fam.to_string(), "dnaA");
    }
}
