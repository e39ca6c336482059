//! Simultaneous search for many motifs on both strands of a circular sequence.
//!
//! Every registered motif is expanded into its concrete instances, and each
//! instance is inserted into a prefix tree twice: once as written (forward
//! strand) and once as its reverse complement (reverse strand). A scan then
//! only ever reads the forward strand of the target.

use crate::{
    error::{CutSiteError, Result},
    genetic_sequence::GeneticSequence,
    locus::{Locus, Strand},
};
use std::{collections::HashMap, fmt, sync::Arc};

/// A window on a sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct Site {
    pub on: GeneticSequence,
    pub at: Locus,
}

impl Site {
    pub fn new(on: GeneticSequence, at: Locus) -> Self {
        Self { on, at }
    }

    pub fn sequence(&self) -> GeneticSequence {
        self.on.extract(&self.at)
    }

    pub fn len(&self) -> usize {
        self.at.length
    }

    pub fn is_empty(&self) -> bool {
        self.at.length == 0
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<Site {}>", self.sequence())
    }
}

/// Turns a match into a caller-defined result.
pub trait SearchMatchHandler<R>: Send + Sync {
    fn on_match(&self, sequence: &GeneticSequence, locus: Locus) -> anyhow::Result<R>;
}

impl<R, F> SearchMatchHandler<R> for F
where
    F: Fn(&GeneticSequence, Locus) -> anyhow::Result<R> + Send + Sync,
{
    fn on_match(&self, sequence: &GeneticSequence, locus: Locus) -> anyhow::Result<R> {
        self(sequence, locus)
    }
}

pub type SharedHandler<R> = Arc<dyn SearchMatchHandler<R>>;

struct SearchTree<R> {
    results: Vec<(Strand, Option<SharedHandler<R>>)>,
    branches: HashMap<u8, SearchTree<R>>,
}

impl<R> SearchTree<R> {
    fn new() -> Self {
        Self {
            results: vec![],
            branches: HashMap::new(),
        }
    }

    fn node_count(&self) -> usize {
        1 + self
            .branches
            .values()
            .map(|branch| branch.node_count())
            .sum::<usize>()
    }
}

/// Prefix tree over every registered motif instance, on both strands.
///
/// Registration is additive. Once built, the search can be shared between
/// threads and scanned concurrently.
pub struct SiteSearch<R = Site> {
    search_tree: SearchTree<R>,
    queries: usize,
    max_depth: usize,
}

impl<R> SiteSearch<R> {
    pub fn new() -> Self {
        Self {
            search_tree: SearchTree::new(),
            queries: 0,
            max_depth: 0,
        }
    }

    /// Registers `query` on both strands. Matches are passed to `handler`, or
    /// reported as plain [`Site`]s when there is none.
    pub fn add_query(&mut self, query: &GeneticSequence, handler: Option<SharedHandler<R>>) {
        for strand in Strand::BOTH {
            self.add_query_on_strand(query, strand, handler.clone());
        }
        self.queries += 1;
    }

    pub fn add_query_with<H>(&mut self, query: &GeneticSequence, handler: H)
    where
        H: SearchMatchHandler<R> + 'static,
    {
        self.add_query(query, Some(Arc::new(handler)));
    }

    /// Registers `query` on a single strand; reverse-strand instances are
    /// inserted as their reverse complement.
    pub fn add_query_on_strand(
        &mut self,
        query: &GeneticSequence,
        strand: Strand,
        handler: Option<SharedHandler<R>>,
    ) {
        let mut inserted = 0;
        for instance in query.instances() {
            if instance.is_empty() {
                continue;
            }
            let mut base = &mut self.search_tree;
            for n in instance.strand(strand) {
                base = base.branches.entry(*n).or_insert_with(SearchTree::new);
            }
            base.results.push((strand, handler.clone()));
            self.max_depth = self.max_depth.max(instance.len());
            inserted += 1;
        }
        log::debug!("Registered {inserted} instances of '{query}' on strand {strand}");
    }

    pub fn query_count(&self) -> usize {
        self.queries
    }

    pub fn node_count(&self) -> usize {
        self.search_tree.node_count()
    }

    /// Length of the longest registered instance.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl<R: From<Site>> SiteSearch<R> {
    /// Walks the tree from every offset of `sequence`, reporting each
    /// registered instance completed along the way, ordered by offset and
    /// then by length.
    ///
    /// A walk never reads more than `sequence.len()` bases, so motifs longer
    /// than a circular target never match it. The first handler failure
    /// aborts the scan.
    pub fn search_in(&self, sequence: &GeneticSequence) -> Result<Vec<R>> {
        let len = sequence.len();
        if len == 0 {
            log::debug!("Skipping scan of an empty sequence");
            return Ok(vec![]);
        }
        log::debug!(
            "Scanning {len} bases against {} queries ({} nodes)",
            self.queries,
            self.node_count()
        );

        let forward = sequence.forward();
        let mut results = vec![];
        for i in 0..len {
            let mut base = &self.search_tree;
            let mut depth = 0;
            while depth < len {
                let Some(branch) = base.branches.get(&forward[(i + depth) % len]) else {
                    break;
                };
                base = branch;
                depth += 1;
                for (strand, handler) in &base.results {
                    let position = match strand {
                        Strand::Forward => i,
                        Strand::Reverse => i + depth,
                    };
                    let locus = Locus::new(position as i64, depth, *strand);
                    log::trace!("Match at {locus}");
                    results.push(Self::emit(sequence, locus, handler.as_ref(), i)?);
                }
            }
        }

        log::debug!("Scan finished with {} results", results.len());
        Ok(results)
    }

    fn emit(
        sequence: &GeneticSequence,
        locus: Locus,
        handler: Option<&SharedHandler<R>>,
        offset: usize,
    ) -> Result<R> {
        match handler {
            Some(handler) => handler
                .on_match(sequence, locus)
                .map_err(|cause| CutSiteError::Handler { offset, cause }),
            None => Ok(R::from(Site::new(sequence.clone(), locus))),
        }
    }
}

impl<R> Default for SiteSearch<R> {
    fn default() -> Self {
        Self::new()
    }
}
