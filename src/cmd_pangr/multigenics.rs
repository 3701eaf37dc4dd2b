use clap::*;
use pangr::libs::pangenome::Margin;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("multigenics")
        .about("Persistent gene families that are duplicated in many genomes")
        .after_help(
            r###"
For each persistent family, the duplication ratio is the number of organisms
with more than one of its genes over the number of organisms with any.
A family is multigenic when the ratio reaches --threshold (ratio >= threshold),
or exceeds it with --exclusive (ratio > threshold).

Output: one family per line, with its ratio.

Examples:
1. Default threshold:
   pangr multigenics tests/pangenome/genes.tsv

2. Strictly more than half of the genomes:
   pangr multigenics tests/pangenome/genes.tsv --threshold 0.5 --exclusive
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
            Arg::new("threshold")
                .long("threshold")
                .num_args(1)
                .default_value("0.05")
                .value_parser(value_parser!(f64))
                .help("Duplication ratio threshold"),
        )
        .arg(
            Arg::new("exclusive")
                .long("exclusive")
                .action(ArgAction::SetTrue)
                .help("Compare with > instead of >="),
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
    let opt_threshold = *args.get_one::<f64>("threshold").unwrap();
    let margin = if args.get_flag("exclusive") {
        Margin::Exclusive
    } else {
        Margin::Inclusive
    };

    if !(0.0..=1.0).contains(&opt_threshold) {
        return Err(anyhow::anyhow!(
            "--threshold must be between 0 and 1, got {}",
            opt_threshold
        ));
    }

    let pan = super::utils::load_pangenome(infile)?;

    for fam in pan.get_multigenics_with(opt_threshold, margin) {
        if let Some(ratio) = pan.duplication_ratio(fam) {
            writer.write_fmt(format_args!(
                "{}\t{:.4}\n",
                pan.family(fam).name,
                ratio
            ))?;
        }
    }

    Ok(())
}
