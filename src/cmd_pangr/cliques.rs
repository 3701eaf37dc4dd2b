use clap::*;
use itertools::Itertools;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("cliques")
        .about("Maximal cliques of the family graph")
        .after_help(
            r###"
Enumerates maximal cliques (Bron-Kerbosch with pivoting).
Each output line is one clique, its families sorted by name and separated by tabs.
Lines are sorted.

With --family, only the subgraph induced by the given families is searched.

Examples:
1. All maximal cliques:
   pangr cliques tests/pangenome/genes.tsv

2. Cliques among three families:
   pangr cliques tests/pangenome/genes.tsv --family dnaA --family dnaN --family recF
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
            Arg::new("family")
                .long("family")
                .short('f')
                .num_args(1)
                .action(ArgAction::Append)
                .help("Restrict the search to these families"),
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

    let pan = super::utils::load_pangenome(infile)?;

    let mut fams = vec![];
    if let Some(names) = args.get_many::<String>("family") {
        for name in names {
            fams.push(pan.get_family_by_name(name)?);
        }
    }

    let lines: Vec<String> = pan
        .find_cliques(&fams)
        .map(|clique| {
            super::utils::family_names(&pan, clique)
                .into_iter()
                .sorted()
                .join("\t")
        })
        .sorted()
        .collect();

    for line in &lines {
        writer.write_fmt(format_args!("{}\n", line))?;
    }
    log::info!("{} maximal cliques", lines.len());

    Ok(())
}
