use crate::ancestry::AncestryResolver;
use crate::error::{GenealogyError, Result};
use crate::genealogy::Genealogy;
use crate::histogram::Histogram;
use crate::payload::Payload;
use crate::Node;

use super::{StatisticOptions, TreeStatistic};

/// Configuration of [`TmrcaDensity`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TmrcaDensityConfig {
    bin_width: usize,
    histogram_bins: usize,
    histogram_max: f64,
    options: StatisticOptions,
}

impl Default for TmrcaDensityConfig {
    fn default() -> Self {
        Self {
            bin_width: 50,
            histogram_bins: 50,
            histogram_max: 100.0,
            options: StatisticOptions::default(),
        }
    }
}

impl TmrcaDensityConfig {
    /// Number of sites per bin of the sequence.
    pub fn with_bin_width(self, bin_width: usize) -> Self {
        Self { bin_width, ..self }
    }

    /// Number of bins of each TMRCA histogram.
    pub fn with_histogram_bins(self, histogram_bins: usize) -> Self {
        Self {
            histogram_bins,
            ..self
        }
    }

    /// Largest TMRCA, in generations, that is binned
    /// rather than counted as overflow.
    pub fn with_histogram_max(self, histogram_max: f64) -> Self {
        Self {
            histogram_max,
            ..self
        }
    }

    pub fn with_options(self, options: StatisticOptions) -> Self {
        Self { options, ..self }
    }

    pub fn bin_width(&self) -> usize {
        self.bin_width
    }

    pub fn validate(&self) -> Result<()> {
        if self.bin_width == 0 {
            return Err(GenealogyError::InvalidConfiguration {
                value: "TMRCA bin width must be at least 1".to_string(),
            });
        }
        self.options.validate()?;
        self.new_histogram().map(|_| ())
    }

    fn new_histogram(&self) -> Result<Histogram> {
        Histogram::new(self.histogram_bins, 0.0, self.histogram_max)
    }
}

/// Summary of the TMRCA values recorded for
/// the sites `[first_site, last_site]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BinSummary {
    pub first_site: usize,
    pub last_site: usize,
    pub count: usize,
    pub mean: Option<f64>,
    pub stdev: Option<f64>,
}

/// TMRCA of a sample as a function of position along the sequence.
///
/// The sequence is cut into bins of `bin_width` sites and each
/// bin has its own histogram, fed with the TMRCA at the first
/// site of the bin. Without recombination all bins see the same
/// values.
///
/// The sequence length is unknown until the first collection,
/// where it is taken from the payload of the first sampled node.
#[derive(Debug, Clone)]
pub struct TmrcaDensity {
    config: TmrcaDensityConfig,
    sequence_length: Option<usize>,
    histograms: Vec<Histogram>,
}

impl TmrcaDensity {
    /// # Errors
    ///
    /// [`GenealogyError::InvalidConfiguration`] if `config` is invalid.
    pub fn new(config: TmrcaDensityConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            sequence_length: None,
            histograms: vec![],
        })
    }

    pub fn config(&self) -> &TmrcaDensityConfig {
        &self.config
    }

    /// `None` until the first collection, and again after clearing.
    pub fn sequence_length(&self) -> Option<usize> {
        self.sequence_length
    }

    pub fn num_bins(&self) -> usize {
        self.histograms.len()
    }

    /// Number of collections recorded.
    pub fn num_samples(&self) -> usize {
        self.histograms.first().map_or(0, Histogram::count)
    }

    pub fn histograms(&self) -> &[Histogram] {
        &self.histograms
    }

    pub fn bin_summaries(&self) -> Vec<BinSummary> {
        let length = match self.sequence_length {
            Some(length) => length,
            None => return vec![],
        };
        self.histograms
            .iter()
            .enumerate()
            .map(|(bin, histogram)| {
                let first_site = bin * self.config.bin_width;
                BinSummary {
                    first_site,
                    last_site: (first_site + self.config.bin_width).min(length) - 1,
                    count: histogram.count(),
                    mean: histogram.mean(),
                    stdev: histogram.stdev(),
                }
            })
            .collect()
    }
}

impl<P: Payload> TreeStatistic<P> for TmrcaDensity {
    fn identifier(&self) -> &'static str {
        "TMRCA Density map"
    }

    fn description(&self) -> &'static str {
        "TMRCA as a function of position along the sequence"
    }

    fn options(&self) -> &StatisticOptions {
        &self.config.options
    }

    /// Record the TMRCA of `sample` at the first site of every bin.
    ///
    /// Nothing is recorded if any site fails.
    ///
    /// # Errors
    ///
    /// * [`GenealogyError::InvalidNode`] if the first node of
    ///   `sample` is not live.
    /// * Any error from [`AncestryResolver::tmrca_at_site`].
    fn collect_sample(&mut self, genealogy: &Genealogy<P>, sample: &[Node]) -> Result<()> {
        let first = match sample.first() {
            Some(&first) => first,
            None => {
                log::debug!("empty sample, nothing to collect");
                return Ok(());
            }
        };
        let length = match self.sequence_length {
            Some(length) => length,
            None => {
                genealogy.validate(first)?;
                genealogy.payload(first).len()
            }
        };
        let resolver = AncestryResolver::new(genealogy);
        let tmrcas = (0..length)
            .step_by(self.config.bin_width)
            .map(|site| resolver.tmrca_at_site(sample, site))
            .collect::<Result<Vec<_>>>()?;
        if self.sequence_length.is_none() {
            let num_bins = length.div_ceil(self.config.bin_width);
            self.histograms = (0..num_bins)
                .map(|_| self.config.new_histogram())
                .collect::<Result<Vec<_>>>()?;
            self.sequence_length = Some(length);
            log::debug!("sized TMRCA density for {length} sites in {num_bins} bins");
        }
        for (histogram, tmrca) in self.histograms.iter_mut().zip(tmrcas) {
            histogram.add_value(tmrca as f64);
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.sequence_length = None;
        self.histograms.clear();
    }

    fn summarize(&self, out: &mut dyn std::io::Write) -> std::io::Result<()> {
        writeln!(
            out,
            "Summary for {} ( {} )",
            TreeStatistic::<P>::identifier(self),
            TreeStatistic::<P>::description(self)
        )?;
        if self.sequence_length.is_none() {
            return writeln!(out, "No data collected.");
        }
        writeln!(out, "Number of samples : \t{}", self.num_samples())?;
        writeln!(out, " Site range \t Mean TMRCA \t Stdev. TMRCA")?;
        for bin in self.bin_summaries() {
            writeln!(
                out,
                "{} - {} : \t{:.4}\t{:.4}",
                bin.first_site,
                bin.last_site,
                bin.mean.unwrap_or(f64::NAN),
                bin.stdev.unwrap_or(f64::NAN)
            )?;
        }
        Ok(())
    }
}
