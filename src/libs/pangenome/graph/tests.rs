use super::*;
use crate::libs::pangenome::family::Partition;
use fixedbitset::FixedBitSet;
use std::collections::BTreeSet;

/// Build a pangenome from `(organism, contig, circular, families)` records and
/// link consecutive genes.
fn build(records: &[(&str, &str, bool, &[&str])]) -> Pangenome {
    let mut pan = Pangenome::new();
    for &(org_name, contig_name, circular, fams) in records {
        let org = pan.get_organism(org_name);
        let contig = pan.add_contig(org, contig_name, circular);
        for (i, fam_name) in fams.iter().enumerate() {
            let gene_name = format!("{}_{}_{}", org_name, contig_name, i);
            let start = i as u64 * 1000 + 1;
            let gene = pan.add_gene(contig, &gene_name, start, start + 899, '+');
            let fam = pan.add_gene_family(fam_name);
            pan.add_gene_to_family(gene, fam).unwrap();
        }
    }
    pan.compute_neighbors_graph().unwrap();
    pan
}

fn fam(pan: &Pangenome, name: &str) -> FamilyId {
    pan.get_family_by_name(name).unwrap()
}

fn fam_set(pan: &Pangenome, names: &[&str]) -> BTreeSet<FamilyId> {
    names.iter().map(|n| fam(pan, n)).collect()
}

//  a --- b       f
//   \   /
//     c --- d --- e
fn toy() -> Pangenome {
    build(&[
        ("org1", "ctg1", false, &["a", "b", "c", "a"]),
        ("org1", "ctg2", false, &["c", "d", "e"]),
        ("org2", "ctg1", false, &["f"]),
    ])
}

#[test]
fn test_edges_are_symmetric() {
    let pan = toy();
    assert_eq!(pan.number_of_edges(), 5);

    for edge in pan.edges() {
        let (s, t) = (edge.source, edge.target);
        assert!(pan.family(s).is_neighbor(t));
        assert!(pan.family(t).is_neighbor(s));
        assert_eq!(pan.get_edge(s, t), Some(edge.id));
        assert_eq!(pan.get_edge(t, s), Some(edge.id));
    }
    assert!(pan.family(fam(&pan, "f")).neighbors().next().is_none());
}

#[test]
fn test_repeated_pairs_are_counted() {
    let pan = build(&[("org1", "ctg1", false, &["a", "b", "a", "b"])]);
    assert_eq!(pan.number_of_edges(), 1);

    let edge = pan.edge(pan.get_edge(fam(&pan, "a"), fam(&pan, "b")).unwrap());
    assert_eq!(edge.weight(), 3);
    assert_eq!(edge.number_of_organisms(), 1);
    assert_eq!(edge.gene_pairs().count(), 3);
}

#[test]
fn test_circular_contig_is_closed() {
    let linear = build(&[("org1", "ctg1", false, &["a", "b", "c"])]);
    assert_eq!(linear.number_of_edges(), 2);

    let circular = build(&[("org1", "ctg1", true, &["a", "b", "c"])]);
    assert_eq!(circular.number_of_edges(), 3);
    assert!(circular
        .family(fam(&circular, "c"))
        .is_neighbor(fam(&circular, "a")));

    // consecutive genes of one family make no self loop
    let tandem = build(&[("org1", "ctg1", true, &["a", "a", "b", "a"])]);
    assert_eq!(tandem.number_of_edges(), 1);
}

#[test]
fn test_add_edge_rejects_invalid_pairs() {
    let mut pan = Pangenome::new();
    let org1 = pan.get_organism("org1");
    let org2 = pan.get_organism("org2");
    let c1 = pan.add_contig(org1, "ctg", false);
    let c2 = pan.add_contig(org2, "ctg", false);

    let g1 = pan.add_gene(c1, "g1", 1, 100, '+');
    let g2 = pan.add_gene(c1, "g2", 201, 300, '+');
    let g3 = pan.add_gene(c2, "g3", 1, 100, '-');
    let g4 = pan.add_gene(c1, "g4", 401, 500, '-');
    let a = pan.add_gene_family("a");
    let b = pan.add_gene_family("b");
    pan.add_gene_to_family(g1, a).unwrap();
    pan.add_gene_to_family(g3, b).unwrap();
    pan.add_gene_to_family(g4, a).unwrap();

    // g2 has no family
    assert!(matches!(
        pan.add_edge(g1, g2),
        Err(PangenomeError::InvalidGraph(_))
    ));
    // different organisms
    assert!(matches!(
        pan.add_edge(g1, g3),
        Err(PangenomeError::InvalidGraph(_))
    ));
    // same family
    assert!(matches!(
        pan.add_edge(g1, g4),
        Err(PangenomeError::InvalidGraph(_))
    ));
    assert_eq!(pan.number_of_edges(), 0);
}

#[test]
fn test_gene_family_registry() {
    let mut pan = Pangenome::new();
    let a = pan.add_gene_family("a");
    let b = pan.add_gene_family("b");
    assert_eq!(pan.add_gene_family("a"), a);
    assert!(b > a);
    assert_eq!(pan.number_of_fams(), 2);

    pan.remove_fams_from(&[a]).unwrap();
    // ids are never reused
    let c = pan.add_gene_family("c");
    assert!(c > b);
    assert!(matches!(
        pan.get_family_by_name("a"),
        Err(PangenomeError::Lookup(_))
    ));
}

#[test]
fn test_gene_in_two_families() {
    let mut pan = Pangenome::new();
    let org = pan.get_organism("org1");
    let contig = pan.add_contig(org, "ctg", false);
    let gene = pan.add_gene(contig, "g1", 1, 100, '+');
    let a = pan.add_gene_family("a");
    let b = pan.add_gene_family("b");

    pan.add_gene_to_family(gene, a).unwrap();
    pan.add_gene_to_family(gene, a).unwrap();
    assert_eq!(pan.family(a).number_of_genes(), 1);
    assert!(matches!(
        pan.add_gene_to_family(gene, b),
        Err(PangenomeError::Consistency(_))
    ));
    assert!(matches!(
        pan.add_gene_to_family(gene, 42),
        Err(PangenomeError::Lookup(_))
    ));
}

#[test]
fn test_organism_registry() {
    let mut pan = Pangenome::new();
    let org = pan.get_organism("org1");
    assert_eq!(pan.get_organism("org1"), org);
    assert_eq!(pan.number_of_organisms(), 1);

    assert!(matches!(
        pan.add_organism(Organism::new("org1")),
        Err(PangenomeError::DuplicateKey(_))
    ));
    let org2 = pan.add_organism(Organism::new("org2")).unwrap();
    assert_eq!(pan.get_organism_by_name("org2").unwrap(), org2);
    assert_eq!(pan.organism(org2).name, "org2");
}

#[test]
fn test_connected_components() {
    let pan = toy();
    let components: Vec<Subgraph> = pan.connected_components().collect();
    assert_eq!(components.len(), 2);

    // components partition the families
    let mut union = BTreeSet::new();
    for component in &components {
        for &f in &component.families {
            assert!(union.insert(f));
        }
    }
    assert_eq!(union.len(), pan.number_of_fams());

    // no edge between two components
    for edge in pan.edges() {
        let holder = components
            .iter()
            .find(|c| c.contains(edge.source))
            .unwrap();
        assert!(holder.contains(edge.target));
        assert!(holder.edges.contains(&edge.id));
    }

    assert_eq!(components[0].families, fam_set(&pan, &["a", "b", "c", "d", "e"]));
    assert_eq!(components[0].edges.len(), 5);
    assert_eq!(components[1].families, fam_set(&pan, &["f"]));

    // a fresh traversal each time
    assert_eq!(pan.connected_components().count(), 2);
}

#[test]
fn test_bfs_shares_seen_set() {
    let pan = toy();
    let mut seen = FixedBitSet::new();

    let first = traversal::plain_bfs(&pan, fam(&pan, "c"), &mut seen);
    assert_eq!(first[0], fam(&pan, "c"));
    assert_eq!(
        first.iter().copied().collect::<BTreeSet<_>>(),
        fam_set(&pan, &["a", "b", "c", "d", "e"])
    );
    assert_eq!(seen.count_ones(..), 5);

    // already visited
    assert!(traversal::plain_bfs(&pan, fam(&pan, "a"), &mut seen).is_empty());
    assert_eq!(
        traversal::plain_bfs(&pan, fam(&pan, "f"), &mut seen),
        vec![fam(&pan, "f")]
    );
    assert_eq!(seen.count_ones(..), 6);
}

#[test]
fn test_subgraph() {
    let pan = toy();
    let sub = pan.subgraph(&fam_set(&pan, &["a", "b", "d"]));
    assert_eq!(sub.len(), 3);
    assert_eq!(sub.edges.len(), 1);

    let empty = pan.subgraph(&BTreeSet::from([99]));
    assert!(empty.is_empty());
}

fn sorted_cliques(cliques: Cliques) -> Vec<Vec<FamilyId>> {
    let mut cliques: Vec<Vec<FamilyId>> = cliques
        .map(|mut c| {
            c.sort();
            c
        })
        .collect();
    cliques.sort();
    cliques
}

#[test]
fn test_find_cliques() {
    let pan = toy();
    let cliques = sorted_cliques(pan.find_cliques(&[]));

    let mut expected: Vec<Vec<FamilyId>> = [
        vec!["a", "b", "c"],
        vec!["c", "d"],
        vec!["d", "e"],
        vec!["f"],
    ]
    .iter()
    .map(|names| fam_set(&pan, names).into_iter().collect())
    .collect();
    expected.sort();
    assert_eq!(cliques, expected);

    let all: Vec<FamilyId> = pan.family_ids();
    for clique in &cliques {
        // every pair is adjacent
        for (i, &u) in clique.iter().enumerate() {
            for &v in &clique[i + 1..] {
                assert!(pan.family(u).is_neighbor(v));
            }
        }
        // nothing outside extends it
        for &w in all.iter().filter(|&w| !clique.contains(w)) {
            assert!(!clique.iter().all(|&u| pan.family(u).is_neighbor(w)));
        }
    }
}

#[test]
fn test_find_cliques_restricted() {
    let pan = toy();
    let (a, b, d) = (fam(&pan, "a"), fam(&pan, "b"), fam(&pan, "d"));
    let cliques = sorted_cliques(pan.find_cliques(&[a, b, d]));

    let mut ab = vec![a, b];
    ab.sort();
    let mut expected = vec![ab, vec![d]];
    expected.sort();
    assert_eq!(cliques, expected);

    assert_eq!(Pangenome::new().find_cliques(&[]).count(), 0);
}

#[test]
fn test_dense_cliques() {
    // every family next to every other one
    let names: Vec<String> = (0..12).map(|i| format!("k{}", i)).collect();
    let mut order: Vec<&str> = Vec::new();
    for i in 0..names.len() {
        for j in i + 1..names.len() {
            order.push(&names[i]);
            order.push(&names[j]);
        }
    }
    let pan = build(&[("org1", "ctg1", false, order.as_slice())]);
    let cliques: Vec<Vec<FamilyId>> = pan.find_cliques(&[]).collect();
    assert_eq!(cliques.len(), 1);
    assert_eq!(cliques[0].len(), 12);
}

#[test]
fn test_remove_fams_from() {
    let mut pan = toy();
    let (a, b, c) = (fam(&pan, "a"), fam(&pan, "b"), fam(&pan, "c"));

    pan.remove_fams_from(&[c]).unwrap();
    assert_eq!(pan.number_of_fams(), 5);
    assert_eq!(pan.number_of_edges(), 2);
    assert!(pan.get_family(c).is_none());
    assert!(pan.family(c).removed);
    assert!(!pan.family(a).is_neighbor(c));
    assert!(pan.get_edge(a, c).is_none());
    assert!(pan.edges().all(|e| e.source != c && e.target != c));
    assert_eq!(pan.family(a).neighbor_set(), BTreeSet::from([b]));
    assert_eq!(pan.connected_components().count(), 3);

    assert!(matches!(
        pan.remove_fams_from(&[c]),
        Err(PangenomeError::Lookup(_))
    ));
    assert!(matches!(
        pan.remove_fams_from(&[a, a]),
        Err(PangenomeError::Consistency(_))
    ));
    // nothing was removed by the failed calls
    assert!(pan.get_family(a).is_some());
}

fn set_persistent(pan: &mut Pangenome, name: &str) {
    let id = fam(pan, name);
    pan.get_family_mut(id).unwrap().partition = Partition::Persistent;
}

#[test]
fn test_multigenics_threshold() {
    // one duplicated copy among ten organisms: ratio 0.1
    let mut records: Vec<(String, Vec<&str>)> = Vec::new();
    for i in 0..10 {
        let fams = if i == 0 { vec!["x", "y", "x"] } else { vec!["x", "y"] };
        records.push((format!("org{}", i), fams));
    }
    let records: Vec<(&str, &str, bool, &[&str])> = records
        .iter()
        .map(|(org, fams)| (org.as_str(), "ctg", false, fams.as_slice()))
        .collect();
    let mut pan = build(&records);
    set_persistent(&mut pan, "x");
    let x = fam(&pan, "x");

    assert!(pan.get_multigenics(0.05).contains(&x));
    assert!(pan.get_multigenics(0.5).is_empty());
    assert!(pan.get_multigenics(0.1).contains(&x));
    assert!(pan.get_multigenics_with(0.1, Margin::Exclusive).is_empty());
    assert_eq!(pan.duplication_ratio(x), Some(0.1));
    assert_eq!(pan.duplication_ratio(fam(&pan, "y")), Some(0.0));
    let empty = pan.add_gene_family("empty");
    assert_eq!(pan.duplication_ratio(empty), None);

    // shell families are never multigenic
    pan.get_family_mut(x).unwrap().partition = Partition::Shell;
    assert!(pan.get_multigenics(0.0).is_empty());
}

#[test]
fn test_bitarrays_and_multigenics() {
    let mut pan = build(&[
        ("org1", "ctg", false, &["P", "S1", "M", "S2", "M"]),
        ("org2", "ctg", false, &["P"]),
    ]);
    set_persistent(&mut pan, "P");
    set_persistent(&mut pan, "M");

    assert_eq!(pan.get_multigenics(0.1), fam_set(&pan, &["M"]));

    let index = pan.compute_family_bitarrays().clone();
    assert_eq!(index.len(), 2);
    let org1 = pan.get_organism_by_name("org1").unwrap();
    let org2 = pan.get_organism_by_name("org2").unwrap();
    assert_eq!(index[&org1], 0);
    assert_eq!(index[&org2], 1);

    let bits = |name: &str| {
        let b = pan.family(fam(&pan, name)).bitarray.clone().unwrap();
        (0..2).map(|i| b.contains(i)).collect::<Vec<_>>()
    };
    assert_eq!(bits("P"), vec![true, true]);
    assert_eq!(bits("S1"), vec![true, false]);
    assert_eq!(bits("S2"), vec![true, false]);
    assert_eq!(bits("M"), vec![true, false]);

    assert_eq!(pan.family_organisms(fam(&pan, "P")), BTreeSet::from([org1, org2]));
    assert_eq!(pan.family_org_dict(fam(&pan, "M"))[&org1].len(), 2);
}

#[test]
fn test_org_index_is_kept_until_invalidated() {
    let mut pan = build(&[
        ("org1", "ctg", false, &["a"]),
        ("org2", "ctg", false, &["a"]),
    ]);
    assert_eq!(pan.compute_org_index().len(), 2);

    pan.get_organism("org3");
    assert_eq!(pan.org_index().unwrap().len(), 2);
    assert_eq!(pan.compute_org_index().len(), 2);

    pan.invalidate_org_index();
    assert!(pan.org_index().is_none());
    assert_eq!(pan.compute_org_index().len(), 3);
}

#[test]
fn test_gene_getter() {
    let mut pan = toy();
    let gene = pan.get_gene("org1_ctg2_1").unwrap();
    assert_eq!(pan.gene(gene).family, Some(fam(&pan, "d")));
    assert!(matches!(
        pan.get_gene("missing"),
        Err(PangenomeError::Lookup(_))
    ));

    // adding a gene drops the stale index
    let org = pan.get_organism("org2");
    let contig = pan.add_contig(org, "ctg1", false);
    let added = pan.add_gene(contig, "late", 5001, 5900, '-');
    assert_eq!(pan.get_gene("late").unwrap(), added);
}

#[test]
fn test_info() {
    let pan = toy();
    let info = pan.info();
    let lines: Vec<&str> = info.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "Gene families\t6");
    assert_eq!(lines[1], "Organisms\t2");
    assert_eq!(lines[2], "Contigs\t3");
    assert_eq!(lines[3], "Genes\t8");
    assert_eq!(lines[4], "Edges\t5");
}
