//! Percentile computation and storage.

/// Precomputed percentile values for a dataset.
///
/// This structure stores percentile-value pairs for efficient lookup
/// of commonly used percentile points.
///
/// # Examples
///
/// ```
/// use glassbox_stats::percentiles::Percentiles;
///
/// let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
/// let percentiles = Percentiles::new(&values, &[25.0, 50.0, 75.0]);
///
/// assert_eq!(percentiles.get(50.0), Some(5.5));
/// assert_eq!(percentiles.get(25.0), Some(3.25));
/// ```
#[derive(Debug, Clone)]
pub struct Percentiles {
    /// Percentile-value pairs, sorted by percentile.
    /// Each tuple contains (percentile, value) where percentile is 0.0-100.0.
    values: Vec<(f64, f64)>,
}

impl Percentiles {
    /// Computes percentiles from pre-sorted values.
    ///
    /// # Arguments
    ///
    /// * `sorted_values` - Values sorted in ascending order
    /// * `percentile_points` - The percentile points to compute (e.g., [25.0, 50.0, 75.0])
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use glassbox_stats::percentiles::Percentiles;
    ///
    /// let mut values = vec![5.0, 2.0, 8.0, 1.0, 9.0];
    /// values.sort_by(f64::total_cmp);
    /// let percentiles = Percentiles::from_sorted(&values, &[50.0, 90.0]);
    /// assert_eq!(percentiles.get(50.0), Some(5.0));
    /// ```
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64], percentile_points: &[f64]) -> Self {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let values = percentile_points
            .iter()
            .map(|&p| (p, compute_percentile(sorted_values, p)))
            .collect();
        Self { values }
    }

    /// Computes percentiles from unsorted values.
    ///
    /// This method will sort the values internally before computing percentiles.
    ///
    /// # Examples
    ///
    /// ```
    /// use glassbox_stats::percentiles::Percentiles;
    ///
    /// let values = vec![5.0, 2.0, 8.0, 1.0, 9.0];
    /// let percentiles = Percentiles::new(&values, &[50.0]);
    /// assert_eq!(percentiles.get(50.0), Some(5.0));
    /// ```
    #[must_use]
    pub fn new(values: &[f64], percentile_points: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted, percentile_points)
    }

    /// Gets the value at a specific percentile.
    ///
    /// Returns `None` if the percentile was not precomputed.
    ///
    /// # Examples
    ///
    /// ```
    /// use glassbox_stats::percentiles::Percentiles;
    ///
    /// let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
    /// let percentiles = Percentiles::new(&values, &[50.0, 95.0]);
    ///
    /// assert_eq!(percentiles.get(50.0), Some(3.0));
    /// assert_eq!(percentiles.get(25.0), None); // Not precomputed
    /// ```
    #[must_use]
    pub fn get(&self, percentile: f64) -> Option<f64> {
        self.values.iter().find_map(|(p, value)| {
            if (*p - percentile).abs() < f64::EPSILON {
                Some(*value)
            } else {
                None
            }
        })
    }

    /// Returns an iterator over all (percentile, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values.iter().copied()
    }

    /// Returns all percentile-value pairs as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[(f64, f64)] {
        &self.values
    }
}

/// Computes a single percentile value from sorted data.
///
/// Uses linear interpolation between the two nearest ranks: for a dataset
/// with n values, the k-th percentile sits at fractional rank
/// `k / 100 * (n - 1)`.
///
/// # Arguments
///
/// * `sorted_values` - Values sorted in ascending order
/// * `percentile` - The percentile to compute (0.0 to 100.0)
///
/// # Returns
///
/// The value at the specified percentile. Returns `f64::NAN` if the input is empty.
///
/// # Examples
///
/// ```
/// use glassbox_stats::percentiles::compute_percentile;
///
/// let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
///
/// assert_eq!(compute_percentile(&values, 50.0), 3.0);
/// assert_eq!(compute_percentile(&values, 25.0), 2.0);
/// assert_eq!(compute_percentile(&values, 10.0), 1.4);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn compute_percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    if sorted_values.is_empty() {
        return f64::NAN;
    }
    let rank = percentile / 100.0 * (sorted_values.len() - 1) as f64;
    let lower = (rank.floor() as usize).min(sorted_values.len() - 1);
    let upper = (rank.ceil() as usize).min(sorted_values.len() - 1);
    let frac = rank - rank.floor();
    sorted_values[lower] + (sorted_values[upper] - sorted_values[lower]) * frac
}

/// Computes the deduplicated percentile cut-points used for bucket
/// assignment.
///
/// The cut-points are the 0th through 99th percentiles of the finite values,
/// sorted ascending with duplicates removed. Duplicate percentile values
/// collapse into a single cut-point, so fewer than 100 cuts may result.
///
/// # Examples
///
/// ```
/// use glassbox_stats::percentiles::percentile_cuts;
///
/// let values: Vec<f64> = (0..200).map(f64::from).collect();
/// let cuts = percentile_cuts(&values);
/// assert_eq!(cuts.len(), 100);
/// assert_eq!(cuts[0], 0.0);
///
/// // A constant column collapses to a single cut-point.
/// let constant = vec![7.0; 200];
/// assert_eq!(percentile_cuts(&constant), vec![7.0]);
/// ```
#[must_use]
pub fn percentile_cuts(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    if sorted.is_empty() {
        return Vec::new();
    }

    let mut cuts: Vec<f64> = (0..100)
        .map(|q| compute_percentile(&sorted, f64::from(q)))
        .collect();
    cuts.sort_by(f64::total_cmp);
    cuts.dedup();
    cuts
}
