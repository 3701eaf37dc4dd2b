use clap::*;
use itertools::Itertools;
use pangr::libs::pangenome::io;
use pangr::libs::pangenome::io::bits_to_string;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("module")
        .about("Presence/absence vectors of modules")
        .after_help(
            r###"
A module is present in an organism when any of its families has a gene there.

Output format:
  #module	org1,org2,org3
  module_0	110	famA,famB

Examples:
1. Module vectors:
   pangr module tests/pangenome/genes.tsv tests/pangenome/modules.tsv
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
            Arg::new("modules")
                .required(true)
                .num_args(1)
                .index(2)
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
    let modules = args.get_one::<String>("modules").unwrap();

    let mut pan = super::utils::load_pangenome(infile)?;
    io::read_modules(&mut pan, modules)?;
    let index = pan.compute_org_index().clone();

    let header = index
        .keys()
        .map(|&org| pan.organism(org).name.as_str())
        .join(",");
    writer.write_fmt(format_args!("#module\t{}\n", header))?;

    let ids: Vec<_> = pan.modules().map(|m| m.id).collect();
    for id in ids {
        let mut module = pan.module(id)?.clone();
        module.mk_bitarray(&pan, &index);
        let names = super::utils::family_names(&pan, module.families());
        if let Some(bits) = &module.bitarray {
            writer.write_fmt(format_args!(
                "{}\t{}\t{}\n",
                module,
                bits_to_string(bits, index.len()),
                names.join(",")
            ))?;
        }
        *pan.module_mut(id)? = module;
    }

    Ok(())
}
