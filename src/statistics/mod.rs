//! Statistics collected from snapshots of a [`Genealogy`].
//!
//! A driver owns a set of statistics, asks each one through
//! [`StatisticOptions::should_collect`] whether the current
//! generation is sampled, and calls [`TreeStatistic::collect`]
//! with a shared borrow of the genealogy.

mod sackins_index;
mod tmrca_density;

pub use sackins_index::{sackins_index, SackinsIndex};
pub use tmrca_density::{BinSummary, TmrcaDensity, TmrcaDensityConfig};

use crate::error::{GenealogyError, Result};
use crate::genealogy::Genealogy;
use crate::Node;

/// A statistic computed from the tips of a genealogy.
pub trait TreeStatistic<P> {
    /// Short name used as the report header.
    fn identifier(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn options(&self) -> &StatisticOptions;

    /// Record the statistic for `sample`.
    ///
    /// An empty sample is a no-op.
    fn collect_sample(&mut self, genealogy: &Genealogy<P>, sample: &[Node]) -> Result<()>;

    /// Record the statistic for the tips of `genealogy`.
    fn collect(&mut self, genealogy: &Genealogy<P>) -> Result<()> {
        let tips = genealogy.tips();
        self.collect_sample(genealogy, &tips)
    }

    /// Discard everything collected so far.
    fn clear(&mut self);

    /// Write a human readable report.
    fn summarize(&self, out: &mut dyn std::io::Write) -> std::io::Result<()>;
}

/// Options shared by all statistics.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StatisticOptions {
    sample_frequency: usize,
}

impl Default for StatisticOptions {
    fn default() -> Self {
        Self {
            sample_frequency: 1,
        }
    }
}

impl StatisticOptions {
    /// Collect every `sample_frequency` generations.
    pub fn with_sample_frequency(self, sample_frequency: usize) -> Self {
        Self { sample_frequency }
    }

    pub fn sample_frequency(&self) -> usize {
        self.sample_frequency
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_frequency == 0 {
            return Err(GenealogyError::InvalidConfiguration {
                value: "sample frequency must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn should_collect(&self, generation: usize) -> bool {
        self.sample_frequency > 0 && generation % self.sample_frequency == 0
    }
}
