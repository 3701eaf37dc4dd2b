use clap::*;
use pangr::libs::pangenome::io;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("info")
        .about("Prints counts of the pangenome registries")
        .after_help(
            r###"
Loads a gene table, builds the family graph and prints the size of each registry.

Input format:
* Gene table (TSV): organism contig topology gene start stop strand family partition
* Region table (TSV, --regions): spot region gene
* Module table (TSV, --modules): module family

Output format:
  Gene families	6
  Organisms	3
  ...

Examples:
1. Graph counts:
   pangr info tests/pangenome/genes.tsv

2. With RGPs, spots and modules:
   pangr info tests/pangenome/genes.tsv --regions tests/pangenome/regions.tsv --modules tests/pangenome/modules.tsv
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
            Arg::new("regions")
                .long("regions")
                .num_args(1)
                .help("Region table"),
        )
        .arg(
            Arg::new("modules")
                .long("modules")
                .num_args(1)
                .help("Module table"),
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

    let mut pan = super::utils::load_pangenome(infile)?;
    if let Some(regions) = args.get_one::<String>("regions") {
        io::read_regions(&mut pan, regions)?;
    }
    if let Some(modules) = args.get_one::<String>("modules") {
        io::read_modules(&mut pan, modules)?;
    }

    writer.write_all(pan.info().as_ref())?;

    Ok(())
}
