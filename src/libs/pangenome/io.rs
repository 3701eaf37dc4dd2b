//! Tab-separated interchange files.
//!
//! Gene table, one gene per line:
//!
//! ```text
//! #organism  contig  topology  gene  start  stop  strand  family  partition
//! org1       ctg1    circular  g1    1      900   +       fam1    persistent
//! ```
//!
//! `family` is `-` for unclustered genes; `partition` accepts full names or
//! P/S/C/U. Genes of a contig are positioned by ascending start.
//!
//! Region table: `spot  region  gene` (spot `-` for a region outside spots).
//! Module table: `module  family`.

use super::error::PangenomeError;
use super::family::Partition;
use super::graph::Pangenome;
use super::module::{Module, ModuleId};
use super::region::Region;
use super::spot::{Spot, SpotId};
use fixedbitset::FixedBitSet;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::io::BufRead;

struct GeneRow {
    name: String,
    start: u64,
    stop: u64,
    strand: char,
    family: Option<String>,
}

fn parse_error(line: usize, message: impl Into<String>) -> PangenomeError {
    PangenomeError::ParseError {
        message: message.into(),
        line,
    }
}

/// Non-empty, non-comment lines split on tabs, with 1-based line numbers
fn records(infile: &str) -> anyhow::Result<Vec<(usize, Vec<String>)>> {
    let reader = intspan::reader(infile);
    let mut records = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim_end();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        records.push((i + 1, trimmed.split('\t').map(|s| s.to_string()).collect()));
    }
    Ok(records)
}

fn parse_field<T: std::str::FromStr>(field: &str, what: &str, line: usize) -> anyhow::Result<T> {
    field
        .parse::<T>()
        .map_err(|_| parse_error(line, format!("Invalid {}: {}", what, field)).into())
}

/// Load organisms, contigs, genes and gene families from a gene table.
pub fn read_genes(pan: &mut Pangenome, infile: &str) -> anyhow::Result<()> {
    // (organism, contig) -> (circular, rows)
    let mut contigs: IndexMap<(String, String), (bool, Vec<GeneRow>)> = IndexMap::new();
    let mut partitions: HashMap<String, (Partition, usize)> = HashMap::new();

    for (line, fields) in records(infile)? {
        if fields.len() < 8 {
            return Err(parse_error(
                line,
                format!("Expected at least 8 columns, found {}", fields.len()),
            )
            .into());
        }
        let is_circular = match fields[2].as_str() {
            "circular" | "c" => true,
            "linear" | "l" => false,
            other => return Err(parse_error(line, format!("Invalid topology: {}", other)).into()),
        };
        let start: u64 = parse_field(&fields[4], "start", line)?;
        let stop: u64 = parse_field(&fields[5], "stop", line)?;
        let strand = match fields[6].as_str() {
            "+" => '+',
            "-" => '-',
            other => return Err(parse_error(line, format!("Invalid strand: {}", other)).into()),
        };
        let family = match fields[7].as_str() {
            "-" | "" => None,
            name => Some(name.to_string()),
        };
        if let Some(name) = &family {
            let partition = match fields.get(8) {
                Some(p) => p
                    .parse::<Partition>()
                    .map_err(|e| parse_error(line, e))?,
                None => Partition::Unclassified,
            };
            match partitions.get(name) {
                Some(&(previous, first_line)) if previous != partition => {
                    return Err(PangenomeError::Consistency(format!(
                        "Gene family {} is {} at line {} but {} at line {}",
                        name, previous, first_line, partition, line
                    ))
                    .into());
                }
                Some(_) => {}
                None => {
                    partitions.insert(name.clone(), (partition, line));
                }
            }
        }

        let entry = contigs
            .entry((fields[0].clone(), fields[1].clone()))
            .or_insert_with(|| (is_circular, Vec::new()));
        if entry.0 != is_circular {
            return Err(parse_error(
                line,
                format!("Contig {} has conflicting topologies", fields[1]),
            )
            .into());
        }
        entry.1.push(GeneRow {
            name: fields[3].clone(),
            start,
            stop,
            strand,
            family,
        });
    }

    for ((org_name, contig_name), (is_circular, mut rows)) in contigs {
        rows.sort_by_key(|r| r.start);
        let org = pan.get_organism(&org_name);
        let contig = pan.add_contig(org, &contig_name, is_circular);
        for row in rows {
            let gene = pan.add_gene(contig, &row.name, row.start, row.stop, row.strand);
            if let Some(name) = row.family {
                let fam = pan.add_gene_family(&name);
                pan.add_gene_to_family(gene, fam)?;
            }
        }
    }

    for (name, (partition, _)) in partitions {
        let fam = pan.get_family_by_name(&name)?;
        if let Some(family) = pan.get_family_mut(fam) {
            family.partition = partition;
        }
    }

    log::info!(
        "Loaded {} genes of {} organisms into {} gene families",
        pan.number_of_genes(),
        pan.number_of_organisms(),
        pan.number_of_fams()
    );
    Ok(())
}

/// Load regions, and the spots they belong to, from a region table.
///
/// Genes are looked up by name, so the gene table must be loaded first.
pub fn read_regions(pan: &mut Pangenome, infile: &str) -> anyhow::Result<()> {
    // region -> (spot, genes)
    let mut regions: IndexMap<String, (Option<SpotId>, Vec<String>)> = IndexMap::new();

    for (line, fields) in records(infile)? {
        if fields.len() < 3 {
            return Err(parse_error(
                line,
                format!("Expected 3 columns, found {}", fields.len()),
            )
            .into());
        }
        let spot = match fields[0].as_str() {
            "-" | "" => None,
            id => Some(parse_field::<SpotId>(id, "spot id", line)?),
        };
        let entry = regions
            .entry(fields[1].clone())
            .or_insert_with(|| (spot, Vec::new()));
        if entry.0 != spot {
            return Err(parse_error(
                line,
                format!("Region {} is assigned to more than one spot", fields[1]),
            )
            .into());
        }
        entry.1.push(fields[2].clone());
    }

    for (name, (spot, genes)) in regions {
        let mut region = Region::new(&name);
        for gene in genes {
            let gene = pan.get_gene(&gene)?;
            region.add_gene(pan, gene)?;
        }
        let region = pan.add_region(region)?;

        if let Some(spot) = spot {
            if pan.spot(spot).is_err() {
                pan.add_spot(Spot::new(spot))?;
            }
            pan.add_region_to_spot(spot, region)?;
        }
    }

    log::info!(
        "Loaded {} regions in {} spots",
        pan.regions().count(),
        pan.spots().count()
    );
    Ok(())
}

/// Load modules from a module table and link their families.
pub fn read_modules(pan: &mut Pangenome, infile: &str) -> anyhow::Result<()> {
    let mut modules: IndexMap<ModuleId, Module> = IndexMap::new();

    for (line, fields) in records(infile)? {
        if fields.len() < 2 {
            return Err(parse_error(
                line,
                format!("Expected 2 columns, found {}", fields.len()),
            )
            .into());
        }
        let id: ModuleId = parse_field(&fields[0], "module id", line)?;
        let fam = pan.get_family_by_name(&fields[1])?;
        modules
            .entry(id)
            .or_insert_with(|| Module::new(id))
            .add_family(pan, fam)?;
    }

    for (_, module) in modules {
        pan.add_module(module)?;
    }
    Ok(())
}

/// Render the first `len` bits as `0`/`1` characters
pub fn bits_to_string(bits: &FixedBitSet, len: usize) -> String {
    (0..len)
        .map(|i| if bits.contains(i) { '1' } else { '0' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tmp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_genes_orders_by_start() {
        let file = write_tmp(
            "#organism\tcontig\ttopology\tgene\tstart\tstop\tstrand\tfamily\tpartition
org1\tctg1\tlinear\tg2\t1001\t1900\t+\tB\tshell
org1\tctg1\tlinear\tg1\t1\t900\t+\tA\tpersistent
org1\tctg1\tlinear\tg3\t2001\t2900\t-\t-\t-
",
        );
        let mut pan = Pangenome::new();
        read_genes(&mut pan, file.path().to_str().unwrap()).unwrap();

        assert_eq!(pan.number_of_genes(), 3);
        assert_eq!(pan.number_of_fams(), 2);
        let g1 = pan.get_gene("g1").unwrap();
        let g3 = pan.get_gene("g3").unwrap();
        assert_eq!(pan.gene(g1).position, 0);
        assert_eq!(pan.gene(g3).position, 2);
        assert!(pan.gene(g3).family.is_none());

        let a = pan.get_family_by_name("A").unwrap();
        assert_eq!(pan.family(a).partition, Partition::Persistent);
    }

    #[test]
    fn test_read_genes_rejects_conflicting_partition() {
        let file = write_tmp(
            "org1\tctg1\tlinear\tg1\t1\t900\t+\tA\tP
org2\tctg1\tlinear\tg2\t1\t900\t+\tA\tS
",
        );
        let mut pan = Pangenome::new();
        let err = read_genes(&mut pan, file.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("Consistency"));
    }

    #[test]
    fn test_read_genes_reports_line() {
        let file = write_tmp("org1\tctg1\tlinear\tg1\tone\t900\t+\tA\tP\n");
        let mut pan = Pangenome::new();
        let err = read_genes(&mut pan, file.path().to_str().unwrap()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parse error at line 1: Invalid start: one"
        );
    }

    #[test]
    fn test_bits_to_string() {
        let mut bits = FixedBitSet::with_capacity(3);
        bits.insert(0);
        bits.insert(2);
        assert_eq!(bits_to_string(&bits, 3), "101");
    }
}
