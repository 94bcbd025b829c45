use crate::error::Result;
use crate::genealogy::Genealogy;
use crate::Node;

use super::{StatisticOptions, TreeStatistic};

/// Mean number of generations from each of `tips` to the root.
///
/// Only parent links are followed, so recombination
/// has no effect. Returns `None` for an empty sample.
///
/// # Panics
///
/// If any of `tips` is not a live node.
pub fn sackins_index<P>(genealogy: &Genealogy<P>, tips: &[Node]) -> Option<f64> {
    if tips.is_empty() {
        return None;
    }
    let sum: usize = tips
        .iter()
        .map(|&tip| genealogy.distance_to_root(tip))
        .sum();
    Some(sum as f64 / tips.len() as f64)
}

/// Sackin's index of tree imbalance, one value per collection.
#[derive(Debug, Clone, Default)]
pub struct SackinsIndex {
    options: StatisticOptions,
    values: Vec<f64>,
}

impl SackinsIndex {
    pub fn new(options: StatisticOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            values: vec![],
        })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            None
        } else {
            Some(self.values.iter().sum::<f64>() / self.values.len() as f64)
        }
    }
}

impl<P> TreeStatistic<P> for SackinsIndex {
    fn identifier(&self) -> &'static str {
        "Sackin's index of tree imbalance (mean)"
    }

    fn description(&self) -> &'static str {
        "Sackin's Index of tree imbalance"
    }

    fn options(&self) -> &StatisticOptions {
        &self.options
    }

    fn collect_sample(&mut self, genealogy: &Genealogy<P>, sample: &[Node]) -> Result<()> {
        for &node in sample {
            genealogy.validate(node)?;
        }
        match sackins_index(genealogy, sample) {
            Some(value) => {
                log::debug!("Sackin's index of {} nodes: {value}", sample.len());
                self.values.push(value);
            }
            None => log::debug!("empty sample, nothing to collect"),
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.values.clear();
    }

    fn summarize(&self, out: &mut dyn std::io::Write) -> std::io::Result<()> {
        writeln!(
            out,
            "Summary for {} ( {} )",
            TreeStatistic::<P>::identifier(self),
            TreeStatistic::<P>::description(self)
        )?;
        match self.mean() {
            Some(mean) => {
                writeln!(out, "Number of samples : \t{}", self.values.len())?;
                writeln!(out, "Mean : \t{mean:.4}")
            }
            None => writeln!(out, "No data collected."),
        }
    }
}

#[cfg(test)]
mod test_sackins_index {
    use super::*;
    use crate::genealogy_fixtures::*;

    #[test]
    fn test_unbalanced_tree() {
        let Topology1 {
            root,
            tips,
            genealogy,
        } = Topology1::new();
        assert_eq!(sackins_index(&genealogy, &tips), Some(2.5));
        assert_eq!(sackins_index(&genealogy, &tips[..2]), Some(2.0));
        assert_eq!(sackins_index(&genealogy, &[root]), Some(0.0));
        assert_eq!(sackins_index(&genealogy, &[]), None);
    }

    #[test]
    fn test_ignores_recombination() {
        let Topology2 {
            c1, c2, genealogy, ..
        } = Topology2::new();
        let before = sackins_index(&genealogy, &genealogy.tips());
        let mut genealogy = genealogy;
        genealogy
            .recombine_over(c1, c2, crate::Segment::new(0, 5).unwrap())
            .unwrap();
        assert_eq!(sackins_index(&genealogy, &genealogy.tips()), before);
    }

    #[test]
    fn test_statistic() {
        let Topology1 { genealogy, .. } = Topology1::new();
        let mut statistic = SackinsIndex::default();
        let mut out = vec![];
        TreeStatistic::<Vec<u8>>::summarize(&statistic, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("No data collected."));

        statistic.collect(&genealogy).unwrap();
        statistic.collect(&genealogy).unwrap();
        statistic.collect_sample(&genealogy, &[]).unwrap();
        assert_eq!(statistic.values(), &[2.5, 2.5]);
        assert_eq!(statistic.mean(), Some(2.5));
        let mut out = vec![];
        TreeStatistic::<Vec<u8>>::summarize(&statistic, &mut out).unwrap();
        let report = String::from_utf8(out).unwrap();
        assert!(report.starts_with("Summary for Sackin's index of tree imbalance (mean)"));
        assert!(report.contains("Mean : \t2.5000"));

        TreeStatistic::<Vec<u8>>::clear(&mut statistic);
        assert!(statistic.values().is_empty());
        assert!(SackinsIndex::new(StatisticOptions::default().with_sample_frequency(0)).is_err());
    }
}
