use super::Pangenome;
use crate::libs::pangenome::family::FamilyId;
use std::collections::BTreeSet;

type FamSet = BTreeSet<FamilyId>;

/// Saved search state of one level of the clique search
struct Frame {
    subg: FamSet,
    cand: FamSet,
    ext_u: Vec<FamilyId>,
}

/// Lazy enumeration of maximal cliques.
///
/// Bron–Kerbosch with pivoting (Tomita et al.), driven by an explicit stack so that
/// dense graphs do not exhaust the call stack. Each item is one maximal clique of the
/// subgraph induced by the starting family set; cliques come in no particular order.
pub struct Cliques<'a> {
    pan: &'a Pangenome,
    /// Current partial clique; the last slot is the vertex being expanded
    q: Vec<Option<FamilyId>>,
    subg: FamSet,
    cand: FamSet,
    ext_u: Vec<FamilyId>,
    stack: Vec<Frame>,
    done: bool,
}

impl<'a> Cliques<'a> {
    pub fn new(pan: &'a Pangenome, fams: &[FamilyId]) -> Self {
        let start: FamSet = if fams.is_empty() {
            pan.families().map(|f| f.id).collect()
        } else {
            fams.iter()
                .copied()
                .filter(|&f| pan.get_family(f).is_some())
                .collect()
        };

        let mut cliques = Self {
            pan,
            q: vec![None],
            subg: start.clone(),
            cand: start,
            ext_u: Vec::new(),
            stack: Vec::new(),
            done: false,
        };
        if cliques.subg.is_empty() {
            cliques.done = true;
        } else {
            cliques.ext_u = cliques.pivot_ext();
        }
        cliques
    }

    fn neighbors(&self, fam: FamilyId) -> impl Iterator<Item = FamilyId> + '_ {
        self.pan.family(fam).neighbors()
    }

    /// Candidates not adjacent to the pivot, where the pivot is the vertex of `subg`
    /// with the most neighbors in `cand`.
    fn pivot_ext(&self) -> Vec<FamilyId> {
        let pivot = self
            .subg
            .iter()
            .copied()
            .max_by_key(|&u| self.neighbors(u).filter(|n| self.cand.contains(n)).count());

        match pivot {
            Some(u) => {
                let family = self.pan.family(u);
                self.cand
                    .iter()
                    .copied()
                    .filter(|c| !family.is_neighbor(*c))
                    .collect()
            }
            None => Vec::new(),
        }
    }
}

impl Iterator for Cliques<'_> {
    type Item = Vec<FamilyId>;

    fn next(&mut self) -> Option<Vec<FamilyId>> {
        if self.done {
            return None;
        }

        loop {
            if let Some(q) = self.ext_u.pop() {
                self.cand.remove(&q);
                if let Some(last) = self.q.last_mut() {
                    *last = Some(q);
                }

                let adj_q: FamSet = self.neighbors(q).collect();
                let subg_q: FamSet = self.subg.intersection(&adj_q).copied().collect();
                if subg_q.is_empty() {
                    return Some(self.q.iter().flatten().copied().collect());
                }

                let cand_q: FamSet = self.cand.intersection(&adj_q).copied().collect();
                if !cand_q.is_empty() {
                    self.stack.push(Frame {
                        subg: std::mem::replace(&mut self.subg, subg_q),
                        cand: std::mem::replace(&mut self.cand, cand_q),
                        ext_u: std::mem::take(&mut self.ext_u),
                    });
                    self.q.push(None);
                    self.ext_u = self.pivot_ext();
                }
            } else {
                self.q.pop();
                match self.stack.pop() {
                    Some(frame) => {
                        self.subg = frame.subg;
                        self.cand = frame.cand;
                        self.ext_u = frame.ext_u;
                    }
                    None => {
                        self.done = true;
                        return None;
                    }
                }
            }
        }
    }
}
