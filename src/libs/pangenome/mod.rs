//! Pangenome graph: gene families linked by genomic adjacency, with regions of genomic
//! plasticity, spots and modules on top of it.

pub mod edge;
pub mod error;
pub mod family;
pub mod genome;
pub mod graph;
pub mod io;
pub mod module;
pub mod region;
pub mod spot;

pub use edge::{Edge, EdgeId};
pub use error::{PangenomeError, Result};
pub use family::{FamilyId, GeneFamily, Partition};
pub use genome::{Contig, ContigId, Gene, GeneId, OrgId, Organism, Rna};
pub use graph::{Cliques, ConnectedComponents, Margin, Pangenome, Subgraph};
pub use module::{GeneContext, Module, ModuleId};
pub use region::{Region, RegionId};
pub use spot::{BorderPair, Spot, SpotId};
