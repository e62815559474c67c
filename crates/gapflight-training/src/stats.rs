/// Summary of the fitness values of one completed generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessStats {
    pub count: usize,
    pub min: u32,
    pub max: u32,
    pub mean: f64,
    /// Midpoint of the two middle values for even counts.
    pub median: f64,
    pub std_dev: f64,
}

impl FitnessStats {
    /// Computes the statistics of unsorted fitness values.
    ///
    /// Returns `None` for an empty dataset.
    ///
    /// ```
    /// # use gapflight_training::FitnessStats;
    /// let stats = FitnessStats::new([500, 200, 400, 100, 300]).unwrap();
    /// assert_eq!(stats.min, 100);
    /// assert_eq!(stats.max, 500);
    /// assert_eq!(stats.mean, 300.0);
    /// assert_eq!(stats.median, 300.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = u32>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_unstable();
        Self::from_sorted(&values)
    }

    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    fn from_sorted(sorted: &[u32]) -> Option<Self> {
        debug_assert!(sorted.is_sorted());
        let (&min, &max) = (sorted.first()?, sorted.last()?);
        let count = sorted.len();

        let n = count as f64;
        let mean = sorted.iter().copied().map(f64::from).sum::<f64>() / n;
        let median = if count % 2 == 0 {
            let mid = count / 2;
            f64::midpoint(f64::from(sorted[mid - 1]), f64::from(sorted[mid]))
        } else {
            f64::from(sorted[count / 2])
        };
        let variance = sorted
            .iter()
            .map(|&v| {
                let d = f64::from(v) - mean;
                d * d
            })
            .sum::<f64>()
            / n;

        Some(Self {
            count,
            min,
            max,
            mean,
            median,
            std_dev: variance.sqrt(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert!(FitnessStats::new([]).is_none());
    }

    #[test]
    fn test_single_value() {
        let stats = FitnessStats::new([168]).unwrap();
        assert_eq!(stats.min, 168);
        assert_eq!(stats.max, 168);
        assert!((stats.median - 168.0).abs() < f64::EPSILON);
        assert!(stats.std_dev.abs() < f64::EPSILON);
    }

    #[test]
    fn test_even_count_median() {
        let stats = FitnessStats::new([40, 10, 30, 20]).unwrap();
        assert!((stats.median - 25.0).abs() < f64::EPSILON);
        assert!((stats.mean - 25.0).abs() < f64::EPSILON);
        // population variance 125
        assert!((stats.std_dev - 125.0_f64.sqrt()).abs() < 1e-9);
    }
}
