use std::hash::BuildHasherDefault;

use crate::error::{GenealogyError, Result};
use crate::flags::NodeFlags;
use crate::payload::Payload;
use crate::rng::SimulationRng;
use crate::Node;
use crate::NodeHash;
use crate::Segment;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    Live,
    Reclaimed,
}

/// The result of a recombination event, as seen
/// from one of the two participating nodes.
///
/// For sites inside `breakpoints`, the node's
/// genetic parent is the parent of `partner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recombination {
    partner: Node,
    breakpoints: Segment,
}

impl Recombination {
    pub(crate) fn new(partner: Node, breakpoints: Segment) -> Self {
        Self {
            partner,
            breakpoints,
        }
    }

    pub fn partner(&self) -> Node {
        self.partner
    }

    pub fn breakpoints(&self) -> Segment {
        self.breakpoints
    }
}

#[derive(Debug, Default, Clone)]
struct Annotations {
    origin_population: Option<usize>,
    label: Option<String>,
    depth: Option<usize>,
}

/// A genealogy of sequence-bearing nodes.
///
/// Nodes live in an arena and refer to each other
/// through [`Node`] handles. A node's offspring list
/// is the only structural reference that keeps a child
/// in the genealogy; parent and recombination partner
/// links are back references.
///
/// Accessors taking a [`Node`] panic if the handle does not
/// refer to a live node. Operations that can fail because of
/// the state of the genealogy return [`Result`].
#[derive(Debug)]
pub struct Genealogy<P> {
    status: Vec<NodeStatus>,
    ids: Vec<i64>,
    parents: Vec<Option<Node>>,
    offspring: Vec<Vec<Node>>,
    recombination: Vec<Option<Recombination>>,
    // None only for reclaimed nodes
    payloads: Vec<Option<P>>,
    flags: Vec<NodeFlags>,
    annotations: Vec<Annotations>,
    root: Option<Node>,
    free_nodes: Vec<usize>,
}

impl<P> Default for Genealogy<P> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

// Constructors
impl<P> Genealogy<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            status: Vec::with_capacity(capacity),
            ids: Vec::with_capacity(capacity),
            parents: Vec::with_capacity(capacity),
            offspring: Vec::with_capacity(capacity),
            recombination: Vec::with_capacity(capacity),
            payloads: Vec::with_capacity(capacity),
            flags: Vec::with_capacity(capacity),
            annotations: Vec::with_capacity(capacity),
            root: None,
            free_nodes: vec![],
        }
    }

    /// Add a node with no parent and no offspring.
    ///
    /// The identity is drawn from `rng`.
    pub fn add_node(&mut self, payload: P, rng: &mut SimulationRng) -> Node {
        let id = rng.next_id();
        match self.free_nodes.pop() {
            Some(index) => {
                assert!(matches!(self.status[index], NodeStatus::Reclaimed));
                assert!(self.parents[index].is_none());
                assert!(self.offspring[index].is_empty());
                assert!(self.recombination[index].is_none());
                assert!(self.payloads[index].is_none());
                self.status[index] = NodeStatus::Live;
                self.ids[index] = id;
                self.payloads[index] = Some(payload);
                Node(index)
            }
            None => {
                self.status.push(NodeStatus::Live);
                self.ids.push(id);
                self.parents.push(None);
                self.offspring.push(vec![]);
                self.recombination.push(None);
                self.payloads.push(Some(payload));
                self.flags.push(NodeFlags::default());
                self.annotations.push(Annotations::default());
                Node(self.status.len() - 1)
            }
        }
    }

    /// Add the root of the genealogy.
    ///
    /// # Errors
    ///
    /// [`GenealogyError::RootExists`] if there is already a root.
    pub fn add_root(&mut self, payload: P, rng: &mut SimulationRng) -> Result<Node> {
        if let Some(root) = self.root {
            return Err(GenealogyError::RootExists { root });
        }
        let root = self.add_node(payload, rng);
        self.root = Some(root);
        Ok(root)
    }

    /// Add a new node as the last offspring of `parent`.
    pub fn add_birth(&mut self, parent: Node, payload: P, rng: &mut SimulationRng) -> Result<Node> {
        self.validate(parent)?;
        let child = self.add_node(payload, rng);
        self.attach(parent, child)?;
        Ok(child)
    }

    /// Make `child` the last offspring of `parent`.
    ///
    /// # Errors
    ///
    /// * [`GenealogyError::InvalidNode`] if either node is not live,
    ///   or if `parent == child`.
    /// * [`GenealogyError::AlreadyAttached`] if `child` already has a parent.
    /// * [`GenealogyError::RootExists`] if `child` is the root.
    pub fn attach(&mut self, parent: Node, child: Node) -> Result<()> {
        self.validate(parent)?;
        self.validate(child)?;
        if parent == child {
            return Err(GenealogyError::InvalidNode { node: child });
        }
        if let Some(current) = self.parents[child.as_index()] {
            return Err(GenealogyError::AlreadyAttached {
                child,
                parent: current,
            });
        }
        if self.root == Some(child) {
            return Err(GenealogyError::RootExists { root: child });
        }
        self.add_offspring(parent, child);
        self.set_parent(child, Some(parent));
        Ok(())
    }
}

// Validation
impl<P> Genealogy<P> {
    pub fn is_live(&self, node: Node) -> bool {
        matches!(self.status(node), Some(NodeStatus::Live))
    }

    /// `None` if the handle was never issued by this genealogy.
    pub fn status(&self, node: Node) -> Option<NodeStatus> {
        self.status.get(node.as_index()).copied()
    }

    pub(crate) fn validate(&self, node: Node) -> Result<usize> {
        if self.is_live(node) {
            Ok(node.as_index())
        } else {
            Err(GenealogyError::InvalidNode { node })
        }
    }

    fn index(&self, node: Node) -> usize {
        assert!(self.is_live(node), "{node:?} does not refer to a live node");
        node.as_index()
    }
}

// Structure
impl<P> Genealogy<P> {
    pub fn root(&self) -> Option<Node> {
        self.root
    }

    pub fn num_live_nodes(&self) -> usize {
        self.status
            .iter()
            .filter(|s| matches!(s, NodeStatus::Live))
            .count()
    }

    pub fn parent(&self, node: Node) -> Option<Node> {
        self.parents[self.index(node)]
    }

    /// Set the parent back reference of `node`.
    ///
    /// The offspring list of the parent is not
    /// modified. See [`Genealogy::attach`].
    pub fn set_parent(&mut self, node: Node, parent: Option<Node>) {
        let index = self.index(node);
        self.parents[index] = parent;
    }

    pub fn offspring(&self, node: Node) -> &[Node] {
        &self.offspring[self.index(node)]
    }

    pub fn num_offspring(&self, node: Node) -> usize {
        self.offspring(node).len()
    }

    /// Position of `child` in the offspring list of `node`.
    pub fn offspring_index(&self, node: Node, child: Node) -> Option<usize> {
        self.offspring(node).iter().position(|&c| c == child)
    }

    /// Append `child` to the offspring list of `parent`.
    ///
    /// Does nothing if `child` is already listed.
    /// The parent back reference of `child` is not
    /// modified. See [`Genealogy::attach`].
    pub fn add_offspring(&mut self, parent: Node, child: Node) {
        let index = self.index(parent);
        if !self.offspring[index].contains(&child) {
            self.offspring[index].push(child);
        }
    }

    /// Returns `true` if `child` was in the offspring list of `parent`.
    pub fn remove_offspring(&mut self, parent: Node, child: Node) -> bool {
        let index = self.index(parent);
        match self.offspring[index].iter().position(|&c| c == child) {
            Some(position) => {
                self.offspring[index].remove(position);
                true
            }
            None => false,
        }
    }

    pub fn is_tip(&self, node: Node) -> bool {
        self.offspring(node).is_empty()
    }

    /// Number of parent links between `node` and
    /// the first ancestor without a parent.
    ///
    /// # Complexity
    ///
    /// `O(D)` where `D` is the depth of `node`.
    pub fn distance_to_root(&self, node: Node) -> usize {
        let mut distance = 0;
        let mut current = self.parent(node);
        while let Some(parent) = current {
            distance += 1;
            current = self.parents[parent.as_index()];
        }
        distance
    }

    /// The tips reachable from the root, in depth-first order.
    pub fn tips(&self) -> Vec<Node> {
        let mut tips = vec![];
        let mut stack = match self.root {
            Some(root) => vec![root],
            None => return tips,
        };
        while let Some(node) = stack.pop() {
            let offspring = &self.offspring[node.as_index()];
            if offspring.is_empty() {
                tips.push(node);
            } else {
                stack.extend(offspring.iter().rev());
            }
        }
        tips
    }
}

// Per-node data
impl<P> Genealogy<P> {
    pub fn id(&self, node: Node) -> i64 {
        self.ids[self.index(node)]
    }

    pub fn set_id(&mut self, node: Node, id: i64) {
        let index = self.index(node);
        self.ids[index] = id;
    }

    /// A short identifier for reports: `i` followed by
    /// the leading five digits of the id, plus `_p<population>`
    /// when an origin population is set.
    pub fn readable_id(&self, node: Node) -> String {
        let digits = self.id(node).unsigned_abs().to_string();
        let mut rv = format!("i{}", &digits[..digits.len().min(5)]);
        if let Some(population) = self.origin_population(node) {
            rv.push_str(&format!("_p{population}"));
        }
        rv
    }

    pub fn payload(&self, node: Node) -> &P {
        match &self.payloads[self.index(node)] {
            Some(payload) => payload,
            None => unreachable!("live node without payload"),
        }
    }

    pub fn payload_mut(&mut self, node: Node) -> &mut P {
        let index = self.index(node);
        match &mut self.payloads[index] {
            Some(payload) => payload,
            None => unreachable!("live node without payload"),
        }
    }

    pub fn flags(&self, node: Node) -> NodeFlags {
        self.flags[self.index(node)]
    }

    pub fn is_preserved(&self, node: Node) -> bool {
        self.flags(node).is_preserved()
    }

    pub fn set_preserve(&mut self, node: Node, preserve: bool) {
        let index = self.index(node);
        self.flags[index] = if preserve {
            self.flags[index].with_preserve()
        } else {
            self.flags[index].without_preserve()
        };
    }

    pub fn origin_population(&self, node: Node) -> Option<usize> {
        self.annotations[self.index(node)].origin_population
    }

    pub fn set_origin_population(&mut self, node: Node, population: usize) {
        let index = self.index(node);
        self.annotations[index].origin_population = Some(population);
    }

    pub fn label(&self, node: Node) -> Option<&str> {
        self.annotations[self.index(node)].label.as_deref()
    }

    pub fn set_label(&mut self, node: Node, label: impl Into<String>) {
        let index = self.index(node);
        self.annotations[index].label = Some(label.into());
    }

    pub fn depth(&self, node: Node) -> Option<usize> {
        self.annotations[self.index(node)].depth
    }

    pub fn set_depth(&mut self, node: Node, depth: usize) {
        let index = self.index(node);
        self.annotations[index].depth = Some(depth);
    }
}

// Recombination state
impl<P> Genealogy<P> {
    pub fn recombination(&self, node: Node) -> Option<Recombination> {
        self.recombination[self.index(node)]
    }

    pub fn has_recombination(&self, node: Node) -> bool {
        self.recombination(node).is_some()
    }

    pub fn recombination_partner(&self, node: Node) -> Option<Node> {
        self.recombination(node).map(|r| r.partner)
    }

    /// Inclusive lower bound of the recombinant region, or 0.
    pub fn breakpoint_min(&self, node: Node) -> usize {
        self.recombination(node).map_or(0, |r| r.breakpoints.left())
    }

    /// Exclusive upper bound of the recombinant region, or 0.
    pub fn breakpoint_max(&self, node: Node) -> usize {
        self.recombination(node).map_or(0, |r| r.breakpoints.right())
    }

    pub(crate) fn set_recombination(&mut self, node: Node, recombination: Option<Recombination>) {
        let index = self.index(node);
        self.recombination[index] = recombination;
    }

    /// Remove the partner link and breakpoints from
    /// `node` and from its partner.
    ///
    /// Payload content is not restored.
    pub fn clear_recombination(&mut self, node: Node) -> Result<()> {
        let index = self.validate(node)?;
        if let Some(recombination) = self.recombination[index].take() {
            if self.is_live(recombination.partner) {
                self.recombination[recombination.partner.as_index()] = None;
            }
        }
        Ok(())
    }

    /// The genetic parent of `node` at `site`.
    ///
    /// Inside the half-open breakpoint interval this is
    /// the parent of the recombination partner, elsewhere
    /// it is the parent of `node`.
    ///
    /// # Errors
    ///
    /// * [`GenealogyError::InvalidNode`] if `node` is not live.
    /// * [`GenealogyError::MissingRecombinationPartner`] if `site`
    ///   is recombinant but the partner is no longer live.
    pub fn parent_for_site(&self, node: Node, site: usize) -> Result<Option<Node>> {
        let index = self.validate(node)?;
        match self.recombination[index] {
            Some(recombination) if recombination.breakpoints.contains(site) => {
                if !self.is_live(recombination.partner) {
                    return Err(GenealogyError::MissingRecombinationPartner {
                        node,
                        min: recombination.breakpoints.left(),
                        max: recombination.breakpoints.right(),
                    });
                }
                Ok(self.parents[recombination.partner.as_index()])
            }
            _ => Ok(self.parents[index]),
        }
    }
}

// Copies
impl<P: Payload> Genealogy<P> {
    /// A new, unlinked node with a deep copy of the payload
    /// of `node` and the same origin population.
    pub fn data_copy(&mut self, node: Node, rng: &mut SimulationRng) -> Result<Node> {
        let index = self.validate(node)?;
        let payload = self.payload(node).clone();
        let origin_population = self.annotations[index].origin_population;
        let copy = self.add_node(payload, rng);
        self.annotations[copy.as_index()].origin_population = origin_population;
        Ok(copy)
    }

    /// Copy the parent reference and the offspring references
    /// of `from` into `to`.
    ///
    /// The topology is shared, not copied: the parent's offspring
    /// list and the offspring's parent references still name `from`.
    /// Use [`Genealogy::replace`] to move `to` into the tree.
    pub fn share_topology(&mut self, from: Node, to: Node) -> Result<()> {
        let from_index = self.validate(from)?;
        let to_index = self.validate(to)?;
        self.parents[to_index] = self.parents[from_index];
        self.offspring[to_index] = self.offspring[from_index].clone();
        Ok(())
    }

    /// [`Genealogy::data_copy`] followed by [`Genealogy::share_topology`].
    pub fn complete_copy(&mut self, node: Node, rng: &mut SimulationRng) -> Result<Node> {
        let copy = self.data_copy(node, rng)?;
        self.share_topology(node, copy)?;
        Ok(copy)
    }

    /// Put `new` in place of `old`.
    ///
    /// `new` takes over the position of `old` in its parent's
    /// offspring list (or becomes the root), adopts the
    /// offspring of `old`, and takes over its recombination
    /// state. `old` is left detached.
    ///
    /// # Errors
    ///
    /// * [`GenealogyError::AlreadyAttached`] if `new` is listed as
    ///   offspring of some node.
    /// * [`GenealogyError::AlreadyRecombined`] if `new` has a
    ///   recombination partner of its own.
    pub fn replace(&mut self, old: Node, new: Node) -> Result<()> {
        let old_index = self.validate(old)?;
        let new_index = self.validate(new)?;
        if old == new {
            return Err(GenealogyError::InvalidNode { node: new });
        }
        if let Some(parent) = self.parents[new_index] {
            if self.offspring[parent.as_index()].contains(&new) {
                return Err(GenealogyError::AlreadyAttached { child: new, parent });
            }
        }
        if let Some(recombination) = self.recombination[new_index] {
            return Err(GenealogyError::AlreadyRecombined {
                node: new,
                partner: recombination.partner,
            });
        }

        let parent = self.parents[old_index].take();
        match parent {
            Some(parent) => {
                for child in self.offspring[parent.as_index()].iter_mut() {
                    if *child == old {
                        *child = new;
                    }
                }
            }
            None => {
                if self.root == Some(old) {
                    self.root = Some(new);
                }
            }
        }
        self.parents[new_index] = parent;

        let children = std::mem::take(&mut self.offspring[old_index]);
        for &child in &children {
            self.parents[child.as_index()] = Some(new);
        }
        self.offspring[new_index] = children;

        if let Some(recombination) = self.recombination[old_index].take() {
            if self.is_live(recombination.partner) {
                self.recombination[recombination.partner.as_index()] =
                    Some(Recombination::new(new, recombination.breakpoints));
            }
            self.recombination[new_index] = Some(recombination);
        }
        Ok(())
    }
}

// Pruning
impl<P> Genealogy<P> {
    /// Remove `node` and its chain of single-offspring
    /// ancestors from the genealogy.
    ///
    /// The walk moves upward while the parent of the current
    /// node has exactly one offspring and is not preserved.
    /// The node reached is then removed from its parent's
    /// offspring list and its parent reference is cleared.
    ///
    /// Returns the head of the detached chain, or `None`
    /// if `node` is preserved.
    ///
    /// # Errors
    ///
    /// [`GenealogyError::PrunedPastRoot`] if the walk reaches
    /// a node without a parent.
    pub fn prune_upward(&mut self, node: Node) -> Result<Option<Node>> {
        let index = self.validate(node)?;
        if self.flags[index].is_preserved() {
            return Ok(None);
        }
        let mut current = node;
        let mut depth = 0;
        let parent = loop {
            let parent = self.parents[current.as_index()].ok_or(
                GenealogyError::PrunedPastRoot {
                    start: node,
                    reached: current,
                    depth,
                },
            )?;
            let parent_index = parent.as_index();
            if self.offspring[parent_index].len() == 1 && !self.flags[parent_index].is_preserved()
            {
                current = parent;
                depth += 1;
            } else {
                break parent;
            }
        };
        let removed = self.remove_offspring(parent, current);
        debug_assert!(removed, "{current:?} not in offspring list of {parent:?}");
        self.parents[current.as_index()] = None;
        log::trace!("pruned {node:?}: detached {current:?} from {parent:?} after {depth} steps");
        Ok(Some(current))
    }

    /// Free a detached node and the subtree below it.
    ///
    /// The payloads of the freed nodes are returned in
    /// depth-first order. The freed indexes are reused
    /// by later calls to [`Genealogy::add_node`].
    ///
    /// # Errors
    ///
    /// * [`GenealogyError::StillAttached`] if `node` has a parent
    ///   or is the root.
    /// * [`GenealogyError::PartnerStillReferenced`] if a node outside
    ///   the subtree has a node of the subtree as its recombination
    ///   partner.
    pub fn reclaim(&mut self, node: Node) -> Result<Vec<P>> {
        let index = self.validate(node)?;
        if self.parents[index].is_some() || self.root == Some(node) {
            return Err(GenealogyError::StillAttached { node });
        }

        let subtree = self.owned_subtree(node);
        let mut hashed_nodes = NodeHash::with_hasher(BuildHasherDefault::default());
        hashed_nodes.extend(subtree.iter().copied());
        for &n in &subtree {
            if let Some(recombination) = self.recombination[n.as_index()] {
                if !hashed_nodes.contains(&recombination.partner)
                    && self.is_live(recombination.partner)
                {
                    return Err(GenealogyError::PartnerStillReferenced {
                        node: n,
                        survivor: recombination.partner,
                    });
                }
            }
        }

        let mut payloads = Vec::with_capacity(subtree.len());
        for n in subtree {
            let i = n.as_index();
            self.status[i] = NodeStatus::Reclaimed;
            self.parents[i] = None;
            self.offspring[i].clear();
            self.recombination[i] = None;
            self.flags[i] = NodeFlags::default();
            self.annotations[i] = Annotations::default();
            if let Some(payload) = self.payloads[i].take() {
                payloads.push(payload);
            }
            self.free_nodes.push(i);
        }
        log::trace!("reclaimed {} nodes below {node:?}", payloads.len());
        Ok(payloads)
    }

    // Only descends into offspring whose parent reference
    // points back, so that topology shared by complete_copy
    // is not followed.
    fn owned_subtree(&self, node: Node) -> Vec<Node> {
        let mut rv = vec![];
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            rv.push(n);
            for &child in self.offspring[n.as_index()].iter().rev() {
                if self.parents[child.as_index()] == Some(n) {
                    stack.push(child);
                }
            }
        }
        rv
    }
}
