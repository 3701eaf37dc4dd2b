use clap::*;
use itertools::Itertools;
use pangr::libs::pangenome::io::bits_to_string;
use pangr::libs::pangenome::Partition;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("bitarray")
        .about("Presence/absence vectors of gene families")
        .after_help(
            r###"
Organisms get bit positions in the order they first appear in the gene table.
The header line lists them in that order; each following line is a family and
its vector, `1` where the family has at least one gene in the organism.

Output format:
  #family	org1,org2,org3
  dnaA	111
  abc	100

Examples:
1. All families:
   pangr bitarray tests/pangenome/genes.tsv

2. Persistent families only:
   pangr bitarray tests/pangenome/genes.tsv --partition persistent
"###,
        )
        .arg(
            Arg::new("infile")
                .required(true)
                .num_args(1)
                .index(1)
                .help("Gene table. [stdin] for standard input"),
        )
        .arg(
            Arg::new("partition")
                .long("partition")
                .num_args(1)
                .value_parser(["persistent", "shell", "cloud", "unclassified"])
                .help("Only families of this partition"),
        )
        .arg(
            Arg::new("outfile")
                .short('o')
                .long("outfile")
                .num_args(1)
                .default_value("stdout")
                .help("Output filename. [stdout] for screen"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let mut writer = intspan::writer(args.get_one::<String>("outfile").unwrap());
    let infile = args.get_one::<String>("infile").unwrap();
    let opt_partition = match args.get_one::<String>("partition") {
        Some(p) => Some(p.parse::<Partition>().map_err(anyhow::Error::msg)?),
        None => None,
    };

    let mut pan = super::utils::load_pangenome(infile)?;
    let index = pan.compute_family_bitarrays().clone();

    let header = index
        .keys()
        .map(|&org| pan.organism(org).name.as_str())
        .join(",");
    writer.write_fmt(format_args!("#family\t{}\n", header))?;

    for fam in pan.families() {
        if opt_partition.is_some_and(|p| p != fam.partition) {
            continue;
        }
        if let Some(bits) = &fam.bitarray {
            writer.write_fmt(format_args!(
                "{}\t{}\n",
                fam.name,
                bits_to_string(bits, index.len())
            ))?;
        }
    }

    Ok(())
}
