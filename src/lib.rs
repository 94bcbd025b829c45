use nohash::BuildNoHashHasher;
use std::collections::HashSet;

mod ancestry;
mod error;
mod flags;
mod genealogy;
mod histogram;
mod payload;
mod recombination;
mod rng;
pub mod statistics;

pub use ancestry::{AncestorSets, AncestryResolver};
pub use error::{GenealogyError, Result};
pub use flags::NodeFlags;
pub use genealogy::{Genealogy, NodeStatus, Recombination};
pub use histogram::Histogram;
pub use payload::Payload;
pub use recombination::RecombinationEvent;
pub use rng::SimulationRng;

/// Handle to a node of a [`Genealogy`].
///
/// Handles are indexes into the genealogy's
/// storage. Once a node is reclaimed its index
/// may be reused by a later birth.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct Node(usize);

impl Node {
    fn as_index(&self) -> usize {
        self.0
    }
}

type NodeHash = HashSet<Node, BuildNoHashHasher<usize>>;

/// A half-open interval, `[left, right)`, of
/// sequence coordinates.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Segment {
    left: usize,
    right: usize,
}

impl Segment {
    /// Returns `None` unless `left < right`.
    pub fn new(left: usize, right: usize) -> Option<Self> {
        if right > left {
            Some(Self { left, right })
        } else {
            None
        }
    }

    pub fn left(&self) -> usize {
        self.left
    }

    pub fn right(&self) -> usize {
        self.right
    }

    pub fn len(&self) -> usize {
        self.right - self.left
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, site: usize) -> bool {
        site >= self.left && site < self.right
    }
}

#[test]
fn test_segment() {
    assert!(Segment::new(3, 3).is_none());
    assert!(Segment::new(4, 3).is_none());
    let s = Segment::new(2, 5).unwrap();
    assert_eq!(s.len(), 3);
    assert!(!s.contains(1));
    assert!(s.contains(2));
    assert!(s.contains(4));
    assert!(!s.contains(5));
}

#[test]
fn test_node_hash() {
    let mut nodes = NodeHash::with_hasher(std::hash::BuildHasherDefault::default());
    assert!(nodes.insert(Node(1)));
    assert!(nodes.insert(Node(7)));
    assert!(!nodes.insert(Node(1)));
    assert_eq!(nodes.len(), 2);
}

#[cfg(test)]
mod genealogy_fixtures {
    use super::*;

    pub const SEQUENCE_LENGTH: usize = 10;

    pub fn sequence(value: u8) -> Vec<u8> {
        vec![value; SEQUENCE_LENGTH]
    }

    //         root
    //        ------
    //        |    |
    //        a    x
    //        |
    //        b
    //        |
    //        c
    //      -----
    //      |   |
    //      d   e
    pub struct Topology0 {
        pub root: Node,
        pub a: Node,
        pub b: Node,
        pub c: Node,
        pub d: Node,
        pub e: Node,
        pub x: Node,
        pub genealogy: Genealogy<Vec<u8>>,
    }

    impl Topology0 {
        pub fn new() -> Self {
            let mut rng = SimulationRng::new(101);
            let mut genealogy = Genealogy::new();
            let root = genealogy.add_root(sequence(0), &mut rng).unwrap();
            let a = genealogy.add_birth(root, sequence(1), &mut rng).unwrap();
            let x = genealogy.add_birth(root, sequence(2), &mut rng).unwrap();
            let b = genealogy.add_birth(a, sequence(3), &mut rng).unwrap();
            let c = genealogy.add_birth(b, sequence(4), &mut rng).unwrap();
            let d = genealogy.add_birth(c, sequence(5), &mut rng).unwrap();
            let e = genealogy.add_birth(c, sequence(6), &mut rng).unwrap();
            Self {
                root,
                a,
                b,
                c,
                d,
                e,
                x,
                genealogy,
            }
        }
    }

    //          root
    //        -------
    //        |     |
    //        n1    n2
    //       ---   -----
    //       | |   |   |
    //       t0 t1 n3  n4
    //             |   |
    //             t2  t3
    //
    // Tip depths are [2, 2, 3, 3]
    pub struct Topology1 {
        pub root: Node,
        pub tips: [Node; 4],
        pub genealogy: Genealogy<Vec<u8>>,
    }

    impl Topology1 {
        pub fn new() -> Self {
            let mut rng = SimulationRng::new(202);
            let mut genealogy = Genealogy::new();
            let root = genealogy.add_root(sequence(0), &mut rng).unwrap();
            let n1 = genealogy.add_birth(root, sequence(0), &mut rng).unwrap();
            let n2 = genealogy.add_birth(root, sequence(0), &mut rng).unwrap();
            let t0 = genealogy.add_birth(n1, sequence(0), &mut rng).unwrap();
            let t1 = genealogy.add_birth(n1, sequence(0), &mut rng).unwrap();
            let n3 = genealogy.add_birth(n2, sequence(0), &mut rng).unwrap();
            let n4 = genealogy.add_birth(n2, sequence(0), &mut rng).unwrap();
            let t2 = genealogy.add_birth(n3, sequence(0), &mut rng).unwrap();
            let t3 = genealogy.add_birth(n4, sequence(0), &mut rng).unwrap();
            Self {
                root,
                tips: [t0, t1, t2, t3],
                genealogy,
            }
        }
    }

    //            root
    //          -------
    //          |     |
    //          p0    p1
    //        -----   |
    //        |   |   |
    //        c0  c1  c2
    //
    // c1 and c2 are born in the same generation
    // and are candidates for recombination.
    pub struct Topology2 {
        pub root: Node,
        pub p0: Node,
        pub p1: Node,
        pub c0: Node,
        pub c1: Node,
        pub c2: Node,
        pub genealogy: Genealogy<Vec<u8>>,
    }

    impl Topology2 {
        pub fn new() -> Self {
            let mut rng = SimulationRng::new(303);
            let mut genealogy = Genealogy::new();
            let root = genealogy.add_root(sequence(0), &mut rng).unwrap();
            let p0 = genealogy.add_birth(root, sequence(1), &mut rng).unwrap();
            let p1 = genealogy.add_birth(root, sequence(2), &mut rng).unwrap();
            let c0 = genealogy.add_birth(p0, sequence(1), &mut rng).unwrap();
            let c1 = genealogy.add_birth(p0, sequence(1), &mut rng).unwrap();
            let c2 = genealogy.add_birth(p1, sequence(2), &mut rng).unwrap();
            Self {
                root,
                p0,
                p1,
                c0,
                c1,
                c2,
                genealogy,
            }
        }
    }
}
