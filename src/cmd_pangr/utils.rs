use pangr::libs::pangenome::{io, FamilyId, Pangenome};

/// Load a gene table and link adjacent genes into the family graph
pub fn load_pangenome(infile: &str) -> anyhow::Result<Pangenome> {
    let mut pan = Pangenome::new();
    io::read_genes(&mut pan, infile)?;
    pan.compute_neighbors_graph()?;
    Ok(pan)
}

pub fn family_names<I>(pan: &Pangenome, fams: I) -> Vec<String>
where
    I: IntoIterator<Item = FamilyId>,
{
    fams.into_iter()
        .map(|f| pan.family(f).name.clone())
        .collect()
}
