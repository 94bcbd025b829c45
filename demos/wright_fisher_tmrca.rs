use rand::Rng;
use recombinant_genealogy::statistics::{
    SackinsIndex, StatisticOptions, TmrcaDensity, TmrcaDensityConfig, TreeStatistic,
};
use recombinant_genealogy::{Genealogy, Node, SimulationRng};

struct Parameters {
    popsize: usize,
    ngenerations: usize,
    sequence_length: usize,
    recombination_rate: f64,
    seed: u64,
}

// Recombinant nodes are preserved, so that the parent
// links their partners' ancestry depends on are never pruned.
// They may remain as extinct tips, so statistics are
// collected from the current generation only.
fn haploid_wf(
    params: &Parameters,
    statistics: &mut [Box<dyn TreeStatistic<Vec<u8>>>],
) -> recombinant_genealogy::Result<Genealogy<Vec<u8>>> {
    let mut rng = SimulationRng::new(params.seed);
    let mut genealogy = Genealogy::with_capacity(2 * params.popsize);
    let root = genealogy.add_root(vec![0; params.sequence_length], &mut rng)?;
    let mut parents = vec![];
    for _ in 0..params.popsize {
        parents.push(genealogy.add_birth(root, vec![0; params.sequence_length], &mut rng)?);
    }
    let mut children: Vec<Node> = vec![];

    for generation in 1..=params.ngenerations {
        for _ in 0..params.popsize {
            let parent = parents[rng.gen_range(0..params.popsize)];
            let payload = genealogy.payload(parent).clone();
            let child = genealogy.add_birth(parent, payload, &mut rng)?;
            genealogy.set_depth(child, generation);
            children.push(child);
        }
        for pair in children.chunks_exact(2) {
            if rng.gen_bool(params.recombination_rate) {
                genealogy.recombine(pair[0], pair[1], &mut rng)?;
                genealogy.set_preserve(pair[0], true);
                genealogy.set_preserve(pair[1], true);
            }
        }
        for &parent in &parents {
            if genealogy.is_tip(parent) {
                if let Some(head) = genealogy.prune_upward(parent)? {
                    genealogy.reclaim(head)?;
                }
            }
        }
        for statistic in statistics.iter_mut() {
            if statistic.options().should_collect(generation) {
                statistic.collect_sample(&genealogy, &children)?;
            }
        }
        std::mem::swap(&mut parents, &mut children);
        children.clear();
    }
    log::info!(
        "{} live nodes after {} generations",
        genealogy.num_live_nodes(),
        params.ngenerations
    );
    Ok(genealogy)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let seed = match std::env::args().nth(1) {
        Some(seed) => seed.parse()?,
        None => 213512,
    };
    let params = Parameters {
        popsize: 50,
        ngenerations: 500,
        sequence_length: 1000,
        recombination_rate: 0.05,
        seed,
    };
    let options = StatisticOptions::default().with_sample_frequency(10);
    let mut statistics: Vec<Box<dyn TreeStatistic<Vec<u8>>>> = vec![
        Box::new(TmrcaDensity::new(
            TmrcaDensityConfig::default()
                .with_bin_width(100)
                .with_options(options),
        )?),
        Box::new(SackinsIndex::new(options)?),
    ];
    haploid_wf(&params, &mut statistics)?;
    let mut out = std::io::stdout().lock();
    for statistic in &statistics {
        statistic.summarize(&mut out)?;
    }
    Ok(())
}
