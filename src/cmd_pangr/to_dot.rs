use clap::*;
use petgraph::dot::Dot;
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::HashMap;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("to-dot")
        .about("Convert the family graph to Graphviz DOT format")
        .after_help(
            r###"
Nodes are gene families, labelled by name. Edges are labelled by the number of
adjacent gene pairs supporting them.

Examples:
1. Convert to DOT:
   pangr to-dot tests/pangenome/genes.tsv

2. Create an image (requires Graphviz installed):
   pangr to-dot tests/pangenome/genes.tsv | dot -Tpng -o graph.png
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

    let mut graph: UnGraph<String, usize> = UnGraph::default();
    let mut node_of: HashMap<usize, NodeIndex> = HashMap::new();
    for fam in pan.families() {
        node_of.insert(fam.id, graph.add_node(fam.name.clone()));
    }
    for edge in pan.edges() {
        if let (Some(&s), Some(&t)) = (node_of.get(&edge.source), node_of.get(&edge.target)) {
            graph.add_edge(s, t, edge.weight());
        }
    }

    writer.write_all(format!("{}\n", Dot::new(&graph)).as_ref())?;

    Ok(())
}
