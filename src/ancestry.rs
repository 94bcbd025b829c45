//! Site-resolved ancestry queries.
//!
//! Ancestry is resolved one generation at a time with
//! [`Genealogy::parent_for_site`]. Because recombination
//! makes the ancestry of each site different, nothing
//! computed here is reused across sites.

use std::hash::BuildHasherDefault;

use crate::error::{GenealogyError, Result};
use crate::genealogy::Genealogy;
use crate::Node;
use crate::NodeHash;

/// Ancestry queries against a borrowed [`Genealogy`].
#[derive(Debug)]
pub struct AncestryResolver<'genealogy, P> {
    genealogy: &'genealogy Genealogy<P>,
}

impl<'genealogy, P> Clone for AncestryResolver<'genealogy, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'genealogy, P> Copy for AncestryResolver<'genealogy, P> {}

impl<'genealogy, P> AncestryResolver<'genealogy, P> {
    pub fn new(genealogy: &'genealogy Genealogy<P>) -> Self {
        Self { genealogy }
    }

    /// The distinct genetic parents at `site` of the nodes in `sample`.
    ///
    /// The output is in order of first appearance. The root
    /// has no parent and is its own entry in the output, so that
    /// lineages of unequal depth still meet there.
    ///
    /// # Errors
    ///
    /// * [`GenealogyError::LineageEnded`] if a node of `sample`
    ///   other than the root has no parent at `site`.
    /// * Any error from [`Genealogy::parent_for_site`].
    pub fn ancestors_one_generation_up(&self, sample: &[Node], site: usize) -> Result<Vec<Node>> {
        let mut hashed_nodes = NodeHash::with_hasher(BuildHasherDefault::default());
        let mut ancestors = Vec::with_capacity(sample.len());
        for &node in sample {
            let parent = match self.genealogy.parent_for_site(node, site)? {
                Some(parent) => parent,
                None if self.genealogy.root() == Some(node) => node,
                None => return Err(GenealogyError::LineageEnded { node, site }),
            };
            if hashed_nodes.insert(parent) {
                ancestors.push(parent);
            }
        }
        Ok(ancestors)
    }

    /// Successive ancestor sets of `sample` at `site`,
    /// one per generation, until a single ancestor remains.
    pub fn ancestor_sets(&self, sample: &[Node], site: usize) -> AncestorSets<'genealogy, P> {
        AncestorSets::new(*self, sample, site)
    }

    /// Number of generations back to the most recent
    /// common ancestor of `sample` at `site`.
    ///
    /// Samples with fewer than two distinct nodes have
    /// a TMRCA of zero.
    ///
    /// # Complexity
    ///
    /// `O(D * N)` where `D` is the TMRCA and `N` the sample size.
    ///
    /// # Errors
    ///
    /// See [`AncestryResolver::ancestors_one_generation_up`].
    pub fn tmrca_at_site(&self, sample: &[Node], site: usize) -> Result<usize> {
        let mut tmrca = 0;
        for ancestors in self.ancestor_sets(sample, site) {
            ancestors?;
            tmrca += 1;
        }
        Ok(tmrca)
    }
}

/// Iterator returned by [`AncestryResolver::ancestor_sets`].
///
/// Iteration stops after the first error.
pub struct AncestorSets<'genealogy, P> {
    resolver: AncestryResolver<'genealogy, P>,
    current: Vec<Node>,
    site: usize,
    failed: bool,
}

impl<'genealogy, P> AncestorSets<'genealogy, P> {
    fn new(resolver: AncestryResolver<'genealogy, P>, sample: &[Node], site: usize) -> Self {
        let mut hashed_nodes = NodeHash::with_hasher(BuildHasherDefault::default());
        let current = sample
            .iter()
            .copied()
            .filter(|&node| hashed_nodes.insert(node))
            .collect();
        Self {
            resolver,
            current,
            site,
            failed: false,
        }
    }
}

impl<'genealogy, P> Iterator for AncestorSets<'genealogy, P> {
    type Item = Result<Vec<Node>>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.current.len() < 2 {
            return None;
        }
        match self
            .resolver
            .ancestors_one_generation_up(&self.current, self.site)
        {
            Ok(ancestors) => {
                self.current.clone_from(&ancestors);
                Some(Ok(ancestors))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
