//! Error handling
use crate::Node;
use thiserror::Error;

/// Primary error type.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GenealogyError {
    /// The handle does not refer to a live node.
    #[error("{node:?} does not refer to a live node")]
    InvalidNode { node: Node },

    /// A root was requested for a genealogy that already has one.
    #[error("genealogy already has root {root:?}")]
    RootExists { root: Node },

    /// The child is already in the offspring list of another node.
    #[error("{child:?} is already attached to parent {parent:?}")]
    AlreadyAttached { child: Node, parent: Node },

    /// One of the nodes passed to recombination already has a partner.
    #[error("{node:?} has already recombined with {partner:?}")]
    AlreadyRecombined { node: Node, partner: Node },

    /// A node cannot recombine with itself.
    #[error("{node:?} cannot recombine with itself")]
    SelfRecombination { node: Node },

    /// There is no interior breakpoint available.
    #[error("payload length {length} leaves no interior breakpoint")]
    PayloadTooShort { length: usize },

    /// The node has breakpoints but its partner is gone.
    #[error("{node:?} has breakpoints [{min}, {max}) but no live recombination partner")]
    MissingRecombinationPartner { node: Node, min: usize, max: usize },

    /// A lineage has no parent at a site before its sample coalesced.
    #[error("lineage of {node:?} has no parent at site {site}")]
    LineageEnded { node: Node, site: usize },

    /// Pruning walked to a node without a parent.
    #[error("pruning from {start:?} reached parentless node {reached:?} after {depth} steps")]
    PrunedPastRoot {
        start: Node,
        reached: Node,
        depth: usize,
    },

    /// Reclamation was requested for a node that is still in the genealogy.
    #[error("{node:?} is still attached and cannot be reclaimed")]
    StillAttached { node: Node },

    /// Reclamation would leave a dangling partner reference.
    #[error("{node:?} is the recombination partner of surviving node {survivor:?}")]
    PartnerStillReferenced { node: Node, survivor: Node },

    /// A configuration value is out of range.
    #[error("invalid configuration: {value}")]
    InvalidConfiguration { value: String },
}

pub type Result<T> = std::result::Result<T, GenealogyError>;
