use proptest::prelude::*;
use recombinant_genealogy::statistics::sackins_index;
use recombinant_genealogy::AncestryResolver;
use recombinant_genealogy::Genealogy;
use recombinant_genealogy::GenealogyError;
use recombinant_genealogy::Node;
use recombinant_genealogy::SimulationRng;

struct Siblings {
    p0: Node,
    p1: Node,
    c0: Node,
    c1: Node,
    c2: Node,
    genealogy: Genealogy<Vec<u8>>,
}

//          root
//        -------
//        |     |
//        p0    p1
//      -----   |
//      |   |   |
//      c0  c2  c1
fn siblings(length: usize, rng: &mut SimulationRng) -> Siblings {
    let mut genealogy = Genealogy::new();
    let root = genealogy.add_root(vec![9; length], rng).unwrap();
    let p0 = genealogy.add_birth(root, vec![9; length], rng).unwrap();
    let p1 = genealogy.add_birth(root, vec![9; length], rng).unwrap();
    let c0 = genealogy.add_birth(p0, vec![0; length], rng).unwrap();
    let c1 = genealogy.add_birth(p1, vec![1; length], rng).unwrap();
    let c2 = genealogy.add_birth(p0, vec![2; length], rng).unwrap();
    Siblings {
        p0,
        p1,
        c0,
        c1,
        c2,
        genealogy,
    }
}

// Node i + 1 is born to an existing node chosen by parents[i].
fn random_tree(parents: &[usize], length: usize, rng: &mut SimulationRng) -> Genealogy<Vec<u8>> {
    let mut genealogy = Genealogy::new();
    let root = genealogy.add_root(vec![0; length], rng).unwrap();
    let mut nodes = vec![root];
    for &p in parents {
        let parent = nodes[p % nodes.len()];
        let child = genealogy.add_birth(parent, vec![0; length], rng).unwrap();
        nodes.push(child);
    }
    genealogy
}

proptest! {
    #[test]
    fn test_recombination_site_and_symmetry(length in 3usize..200, seed in 0..u64::MAX) {
        let mut rng = SimulationRng::new(seed);
        let Siblings { p0, p1, c0, c1, mut genealogy, .. } = siblings(length, &mut rng);
        let event = genealogy.recombine(c0, c1, &mut rng).unwrap();
        prop_assert!(event.site >= 1 && event.site < length - 1);
        if event.upper {
            prop_assert_eq!((event.breakpoints.left(), event.breakpoints.right()), (event.site, length));
        } else {
            prop_assert_eq!((event.breakpoints.left(), event.breakpoints.right()), (0, event.site));
        }

        let one = genealogy.recombination(c0).unwrap();
        let two = genealogy.recombination(c1).unwrap();
        prop_assert_eq!(one.partner(), c1);
        prop_assert_eq!(two.partner(), c0);
        prop_assert_eq!(one.breakpoints(), event.breakpoints);
        prop_assert_eq!(two.breakpoints(), event.breakpoints);

        // half-open: the lower bound is the partner's, the upper bound is not
        let (min, max) = (genealogy.breakpoint_min(c0), genealogy.breakpoint_max(c0));
        prop_assert_eq!(genealogy.parent_for_site(c0, min), Ok(Some(p1)));
        prop_assert_eq!(genealogy.parent_for_site(c0, max - 1), Ok(Some(p1)));
        prop_assert_eq!(genealogy.parent_for_site(c0, max), Ok(Some(p0)));
        prop_assert_eq!(genealogy.parent_for_site(c1, min), Ok(Some(p0)));
        prop_assert_eq!(genealogy.parent_for_site(c1, max), Ok(Some(p1)));

        for site in 0..length {
            let exchanged = event.breakpoints.contains(site);
            prop_assert_eq!(genealogy.payload(c0)[site], if exchanged { 1 } else { 0 });
            prop_assert_eq!(genealogy.payload(c1)[site], if exchanged { 0 } else { 1 });
        }
    }

    #[test]
    fn test_no_double_recombination(length in 3usize..100, seed in 0..u64::MAX) {
        let mut rng = SimulationRng::new(seed);
        let Siblings { c0, c1, c2, mut genealogy, .. } = siblings(length, &mut rng);
        genealogy.recombine(c0, c1, &mut rng).unwrap();
        let payload = genealogy.payload(c0).clone();
        let recombination = genealogy.recombination(c0);
        prop_assert_eq!(
            genealogy.recombine(c0, c2, &mut rng),
            Err(GenealogyError::AlreadyRecombined { node: c0, partner: c1 })
        );
        prop_assert_eq!(
            genealogy.recombine(c2, c1, &mut rng),
            Err(GenealogyError::AlreadyRecombined { node: c1, partner: c0 })
        );
        prop_assert_eq!(genealogy.payload(c0), &payload);
        prop_assert_eq!(genealogy.recombination(c0), recombination);
        prop_assert!(!genealogy.has_recombination(c2));
        prop_assert_eq!(genealogy.payload(c2), &vec![2; length]);
    }

    #[test]
    fn test_same_seed_same_events(length in 3usize..100, seed in 0..u64::MAX) {
        let events = (0..2)
            .map(|_| {
                let mut rng = SimulationRng::new(seed);
                let Siblings { c0, c1, mut genealogy, .. } = siblings(length, &mut rng);
                let event = genealogy.recombine(c0, c1, &mut rng).unwrap();
                (event, genealogy.id(c0))
            })
            .collect::<Vec<_>>();
        prop_assert_eq!(events[0], events[1]);
    }

    #[test]
    fn test_tmrca_constant_without_recombination(
        parents in prop::collection::vec(0usize..1000, 1..40),
        seed in 0..u64::MAX,
    ) {
        let length = 20;
        let mut rng = SimulationRng::new(seed);
        let genealogy = random_tree(&parents, length, &mut rng);
        let tips = genealogy.tips();
        let resolver = AncestryResolver::new(&genealogy);
        let tmrca = resolver.tmrca_at_site(&tips, 0).unwrap();
        for site in 1..length {
            prop_assert_eq!(resolver.tmrca_at_site(&tips, site), Ok(tmrca));
        }
        if tips.len() > 1 {
            let deepest = tips.iter().map(|&tip| genealogy.distance_to_root(tip)).max().unwrap();
            prop_assert!(tmrca >= 1 && tmrca <= deepest);
        } else {
            prop_assert_eq!(tmrca, 0);
        }
    }

    #[test]
    fn test_sackins_index_bounds(
        parents in prop::collection::vec(0usize..1000, 1..40),
        seed in 0..u64::MAX,
    ) {
        let mut rng = SimulationRng::new(seed);
        let genealogy = random_tree(&parents, 5, &mut rng);
        let tips = genealogy.tips();
        let index = sackins_index(&genealogy, &tips).unwrap();
        prop_assert!(index >= 1.0);
        prop_assert!(index <= parents.len() as f64);
    }

    #[test]
    fn test_pruning_keeps_tips_connected(
        parents in prop::collection::vec(0usize..1000, 2..40),
        seed in 0..u64::MAX,
    ) {
        let mut rng = SimulationRng::new(seed);
        let mut genealogy = random_tree(&parents, 5, &mut rng);
        let root = genealogy.root().unwrap();
        let tips = genealogy.tips();
        // a single lineage cannot be pruned without removing the root
        prop_assume!(tips.len() > 1);
        let head = genealogy.prune_upward(tips[0]).unwrap().unwrap();
        prop_assert_eq!(genealogy.parent(head), None);
        prop_assert!(genealogy.reclaim(head).is_ok());
        for tip in genealogy.tips() {
            let mut current = tip;
            while let Some(parent) = genealogy.parent(current) {
                current = parent;
            }
            prop_assert_eq!(current, root);
        }
    }
}
