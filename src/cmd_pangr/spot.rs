use clap::*;
use itertools::Itertools;
use pangr::libs::pangenome::{io, BorderPair, Pangenome};
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("spot")
        .about("Borders and diversity of RGP spots")
        .after_help(
            r###"
A spot groups regions of genomic plasticity (RGPs) inserted at the same place.
For each spot, prints its number of regions and of families, the number of
distinct syntenies and contents among its regions, and its borders.

Borders are the --set-size persistent, non-multigenic families on each side of
the regions. Regions whose borders match, in either orientation, share one entry.
A border is written as `upstream|downstream:count`, families comma-separated;
entries are separated by `;`.

Output format:
  #spot	regions	families	synteny	content	borders
  spot_0	3	4	2	1	dnaA,dnaN|recF,gyrB:3

Examples:
1. Spot summary:
   pangr spot tests/pangenome/genes.tsv tests/pangenome/regions.tsv

2. Shorter borders:
   pangr spot tests/pangenome/genes.tsv tests/pangenome/regions.tsv --set-size 1
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
                .required(true)
                .num_args(1)
                .index(2)
                .help("Region table"),
        )
        .arg(
            Arg::new("set_size")
                .long("set-size")
                .num_args(1)
                .default_value("3")
                .value_parser(value_parser!(usize))
                .help("Number of bordering families on each side"),
        )
        .arg(
            Arg::new("dup_margin")
                .long("dup-margin")
                .num_args(1)
                .default_value("0.05")
                .value_parser(value_parser!(f64))
                .help("Multigenic threshold; multigenic families are skipped in borders"),
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

fn format_border(pan: &Pangenome, count: usize, border: &BorderPair) -> String {
    let side = |fams: &Vec<usize>| fams.iter().map(|&f| pan.family(f).name.as_str()).join(",");
    format!("{}|{}:{}", side(&border[0]), side(&border[1]), count)
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let mut writer = intspan::writer(args.get_one::<String>("outfile").unwrap());
    let infile = args.get_one::<String>("infile").unwrap();
    let regions = args.get_one::<String>("regions").unwrap();
    let opt_set_size = *args.get_one::<usize>("set_size").unwrap();
    let opt_dup_margin = *args.get_one::<f64>("dup_margin").unwrap();

    if opt_set_size == 0 {
        return Err(anyhow::anyhow!("--set-size must be at least 1"));
    }

    let mut pan = super::utils::load_pangenome(infile)?;
    io::read_regions(&mut pan, regions)?;
    let multigenics = pan.get_multigenics(opt_dup_margin);

    writer.write_fmt(format_args!(
        "#spot\tregions\tfamilies\tsynteny\tcontent\tborders\n"
    ))?;
    for spot in pan.spots() {
        let borders = spot
            .borders(&pan, opt_set_size, &multigenics)?
            .iter()
            .map(|(count, border)| format_border(&pan, *count, border))
            .join(";");
        writer.write_fmt(format_args!(
            "{}\t{}\t{}\t{}\t{}\t{}\n",
            spot,
            spot.len(),
            spot.number_of_families(&pan),
            spot.get_uniq_ordered_set(&pan).len(),
            spot.get_uniq_content(&pan).len(),
            borders
        ))?;
    }

    Ok(())
}
