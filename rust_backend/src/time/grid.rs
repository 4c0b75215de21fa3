use std::ops::Range;

use super::year_start_jd;

/// Tolerance used when deciding whether a JD still lies on the grid.
const GRID_EPSILON_DAYS: f64 = 1e-9;

/// Regular sampling grid `start_jd + k * step` split into zero-overlap windows.
///
/// The grid always begins at `start_jd`; the end is included when it falls on
/// the grid. A non-positive step or an inverted range yields an empty grid.
#[derive(Debug, Clone)]
pub struct SampleGrid {
    start_jd: f64,
    step: f64,
    len: usize,
    windows: Vec<Range<usize>>,
}

impl SampleGrid {
    /// Grid from January 1st of `start_year` to January 1st of `end_year`,
    /// windowed at every `chunk_years` year boundary.
    ///
    /// Returns `None` when a year falls outside the supported calendar.
    pub fn yearly(start_year: i32, end_year: i32, step: f64, chunk_years: u32) -> Option<Self> {
        let start_jd = year_start_jd(start_year)?;
        let end_jd = year_start_jd(end_year)?;

        let mut boundaries = Vec::new();
        if chunk_years > 0 {
            let mut year = i64::from(start_year) + i64::from(chunk_years);
            while year < i64::from(end_year) {
                // year < end_year, so it fits in i32
                boundaries.push(year_start_jd(year as i32)?);
                year += i64::from(chunk_years);
            }
        }

        Some(Self::new(start_jd, end_jd, step, &boundaries))
    }

    /// Grid up to `end_jd`, cut before every boundary.
    pub fn new(start_jd: f64, end_jd: f64, step: f64, boundaries: &[f64]) -> Self {
        let len = if step > 0.0 && step.is_finite() && end_jd >= start_jd {
            ((end_jd - start_jd) / step + GRID_EPSILON_DAYS).floor() as usize + 1
        } else {
            0
        };

        let first_index_at = |jd: f64| -> usize {
            let index = ((jd - start_jd) / step - GRID_EPSILON_DAYS).ceil();
            if index <= 0.0 {
                0
            } else {
                (index as usize).min(len)
            }
        };

        let mut windows = Vec::with_capacity(boundaries.len() + 1);
        let mut lo = 0;
        for &boundary in boundaries {
            let hi = first_index_at(boundary).max(lo);
            windows.push(lo..hi);
            lo = hi;
        }
        windows.push(lo..len);

        Self {
            start_jd,
            step,
            len,
            windows,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index ranges of the windows, in order, covering the grid exactly once.
    pub fn windows(&self) -> &[Range<usize>] {
        &self.windows
    }

    pub fn times(&self, indices: Range<usize>) -> Vec<f64> {
        indices
            .map(|k| self.start_jd + k as f64 * self.step)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_times(grid: &SampleGrid) -> Vec<f64> {
        grid.times(0..grid.len())
    }

    #[test]
    fn test_grid_includes_both_ends() {
        let grid = SampleGrid::new(100.0, 105.0, 1.0, &[]);
        assert_eq!(all_times(&grid), vec![100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
        assert_eq!(grid.windows().to_vec(), vec![0..6usize]);
    }

    #[test]
    fn test_grid_partial_last_step() {
        let grid = SampleGrid::new(0.0, 2.5, 1.0, &[]);
        assert_eq!(all_times(&grid), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_grid_degenerate_inputs() {
        assert_eq!(all_times(&SampleGrid::new(5.0, 5.0, 1.0, &[])), vec![5.0]);
        assert!(SampleGrid::new(5.0, 4.0, 1.0, &[]).is_empty());
        assert!(SampleGrid::new(0.0, 4.0, 0.0, &[]).is_empty());
        assert!(SampleGrid::new(0.0, 4.0, -1.0, &[]).is_empty());
        assert!(SampleGrid::new(0.0, 4.0, f64::NAN, &[]).is_empty());
    }

    #[test]
    fn test_yearly_windows_partition_the_grid() {
        let grid = SampleGrid::yearly(2000, 2010, 1.0, 3).unwrap();

        let windows = grid.windows();
        assert_eq!(windows.len(), 4);
        assert_eq!(windows[0].start, 0);
        assert_eq!(windows[windows.len() - 1].end, grid.len());
        assert!(windows.windows(2).all(|w| w[0].end == w[1].start));

        // Second window starts exactly on 2003-01-01
        let second = grid.times(windows[1].clone());
        assert_eq!(second[0], year_start_jd(2003).unwrap());

        let expected_len = (year_start_jd(2010).unwrap() - year_start_jd(2000).unwrap()) as usize + 1;
        assert_eq!(grid.len(), expected_len);
    }

    #[test]
    fn test_yearly_single_year_has_one_window() {
        let grid = SampleGrid::yearly(2024, 2025, 1.0, 1).unwrap();
        assert_eq!(grid.windows().len(), 1);
        assert_eq!(grid.len(), 367);
    }

    #[test]
    fn test_grid_with_fractional_step() {
        let grid = SampleGrid::new(0.0, 10.0, 0.75, &[3.0, 6.0]);
        assert_eq!(grid.len(), 14);
        assert_eq!(grid.times(grid.windows()[1].clone())[0], 3.0);
        assert_eq!(grid.times(grid.windows()[2].clone())[0], 6.0);
    }
}
