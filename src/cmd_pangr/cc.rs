use clap::*;
use itertools::Itertools;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("cc")
        .about("Connected components of the family graph")
        .after_help(
            r###"
Two gene families are linked when genes of them are adjacent on a contig.
Each output line is one connected component, its families separated by tabs.
Components are ordered by their first family; singletons are included.

Examples:
1. All components:
   pangr cc tests/pangenome/genes.tsv

2. Component sizes:
   pangr cc tests/pangenome/genes.tsv | awk '{print NF}'
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
            Arg::new("min")
                .long("min")
                .num_args(1)
                .default_value("1")
                .value_parser(value_parser!(usize))
                .help("Skip components with fewer families"),
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
    let opt_min = *args.get_one::<usize>("min").unwrap();

    let pan = super::utils::load_pangenome(infile)?;

    let mut count = 0;
    for component in pan.connected_components() {
        if component.len() < opt_min {
            continue;
        }
        count += 1;
        let names = super::utils::family_names(&pan, component.families.iter().copied());
        writer.write_fmt(format_args!("{}\n", names.iter().join("\t")))?;
    }
    log::info!("{} connected components", count);

    Ok(())
}
