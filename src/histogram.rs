use crate::error::{GenealogyError, Result};

/// A fixed-range histogram with online moments.
///
/// Values are binned into `bins` equal-width bins over
/// `[min, max)`. Values outside the range are counted
/// separately but, like all values, contribute to the
/// running mean and standard deviation.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    min: f64,
    max: f64,
    bin_width: f64,
    counts: Vec<usize>,
    less_than_min: usize,
    more_than_max: usize,
    count: usize,
    mean: f64,
    // sum of squared deviations from the mean
    m2: f64,
}

impl Histogram {
    /// # Errors
    ///
    /// [`GenealogyError::InvalidConfiguration`] unless `bins > 0`
    /// and `min < max`, both finite.
    pub fn new(bins: usize, min: f64, max: f64) -> Result<Self> {
        if bins == 0 {
            return Err(GenealogyError::InvalidConfiguration {
                value: "histogram must have at least one bin".to_string(),
            });
        }
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(GenealogyError::InvalidConfiguration {
                value: format!("histogram range [{min}, {max}) is empty or not finite"),
            });
        }
        Ok(Self {
            min,
            max,
            bin_width: (max - min) / bins as f64,
            counts: vec![0; bins],
            less_than_min: 0,
            more_than_max: 0,
            count: 0,
            mean: 0.0,
            m2: 0.0,
        })
    }

    pub fn add_value(&mut self, value: f64) {
        if value < self.min {
            self.less_than_min += 1;
        } else if value >= self.max {
            self.more_than_max += 1;
        } else {
            let bin = ((value - self.min) / self.bin_width) as usize;
            let last = self.counts.len() - 1;
            self.counts[bin.min(last)] += 1;
        }
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.mean)
        }
    }

    /// Population standard deviation of all values added.
    pub fn stdev(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some((self.m2 / self.count as f64).sqrt())
        }
    }

    pub fn bin_counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn num_bins(&self) -> usize {
        self.counts.len()
    }

    /// Lower bound of bin `bin`.
    pub fn bin_min(&self, bin: usize) -> f64 {
        self.min + bin as f64 * self.bin_width
    }

    pub fn less_than_min(&self) -> usize {
        self.less_than_min
    }

    pub fn more_than_max(&self) -> usize {
        self.more_than_max
    }

    pub fn clear(&mut self) {
        self.counts.iter_mut().for_each(|c| *c = 0);
        self.less_than_min = 0;
        self.more_than_max = 0;
        self.count = 0;
        self.mean = 0.0;
        self.m2 = 0.0;
    }
}

#[cfg(test)]
mod test_histogram {
    use super::*;

    #[test]
    fn test_invalid() {
        assert!(Histogram::new(0, 0.0, 1.0).is_err());
        assert!(Histogram::new(10, 1.0, 1.0).is_err());
        assert!(Histogram::new(10, 0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_empty() {
        let h = Histogram::new(50, 0.0, 100.0).unwrap();
        assert_eq!(h.count(), 0);
        assert!(h.mean().is_none());
        assert!(h.stdev().is_none());
    }

    #[test]
    fn test_binning() {
        let mut h = Histogram::new(5, 0.0, 10.0).unwrap();
        for value in [0.0, 1.9, 2.0, 9.99, 10.0, -1.0] {
            h.add_value(value);
        }
        assert_eq!(h.bin_counts(), &[2, 1, 0, 0, 1]);
        assert_eq!(h.less_than_min(), 1);
        assert_eq!(h.more_than_max(), 1);
        assert_eq!(h.count(), 6);
        assert_eq!(h.bin_min(2), 4.0);
    }

    #[test]
    fn test_moments() {
        let mut h = Histogram::new(10, 0.0, 10.0).unwrap();
        for value in [1.0, 2.0, 3.0] {
            h.add_value(value);
        }
        assert!((h.mean().unwrap() - 2.0).abs() < 1e-12);
        assert!((h.stdev().unwrap() - (2.0_f64 / 3.0).sqrt()).abs() < 1e-12);
        h.clear();
        assert_eq!(h.count(), 0);
        assert!(h.bin_counts().iter().all(|&c| c == 0));
        assert_eq!(h.num_bins(), 10);
    }
}
