extern crate clap;
use clap::*;

mod cmd_pangr;

fn main() -> anyhow::Result<()> {
    let app = Command::new("pangr")
        .version(crate_version!())
        .author(crate_authors!())
        .about("`pangr` - Pangenome graph, RGP spots and modules")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Raise log verbosity; -v for info, -vv for debug"),
        )
        .subcommand(cmd_pangr::info::make_subcommand())
        .subcommand(cmd_pangr::cc::make_subcommand())
        .subcommand(cmd_pangr::cliques::make_subcommand())
        .subcommand(cmd_pangr::multigenics::make_subcommand())
        .subcommand(cmd_pangr::bitarray::make_subcommand())
        .subcommand(cmd_pangr::spot::make_subcommand())
        .subcommand(cmd_pangr::module::make_subcommand())
        .subcommand(cmd_pangr::to_dot::make_subcommand())
        .after_help(
            r###"Subcommand groups:

* Graph:
    * info        - Counts of families, organisms, genes and edges
    * cc          - Connected components of the family graph
    * cliques     - Maximal cliques of the family graph
    * to-dot      - Graphviz export of the family graph

* Presence/absence:
    * multigenics - Persistent families duplicated in many genomes
    * bitarray    - Per-family presence vectors

* Plasticity:
    * spot        - Borders and diversity of RGP spots
    * module      - Per-module presence vectors

Logging goes to stderr; use -v/-vv or set RUST_LOG.

"###,
        );

    let matches = app.get_matches();
    init_logger(matches.get_count("verbose"));

    // Check which subcomamnd the user ran...
    match matches.subcommand() {
        Some(("info", sub_matches)) => cmd_pangr::info::execute(sub_matches),
        Some(("cc", sub_matches)) => cmd_pangr::cc::execute(sub_matches),
        Some(("cliques", sub_matches)) => cmd_pangr::cliques::execute(sub_matches),
        Some(("multigenics", sub_matches)) => cmd_pangr::multigenics::execute(sub_matches),
        Some(("bitarray", sub_matches)) => cmd_pangr::bitarray::execute(sub_matches),
        Some(("spot", sub_matches)) => cmd_pangr::spot::execute(sub_matches),
        Some(("module", sub_matches)) => cmd_pangr::module::execute(sub_matches),
        Some(("to-dot", sub_matches)) => cmd_pangr::to_dot::execute(sub_matches),
        _ => unreachable!(),
    }?;

    Ok(())
}

fn init_logger(verbose: u8) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(log::LevelFilter::Info);
        }
        _ => {
            builder.filter_level(log::LevelFilter::Debug);
        }
    }
    builder.format_timestamp(None).format_target(false).init();
}
