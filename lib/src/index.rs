use std::path::{Path, PathBuf};

use crate::config::SearchStrategy;
use crate::error::{Error, Result};
use crate::table::{DensityTable, TableEntry};

/// Density table sorted by score, ready for closest-score lookups
///
/// Entries with equal scores are ordered by ascending code so lookups are
/// deterministic regardless of the order the table file lists them in.
#[derive(Debug, Clone)]
pub struct DensityIndex {
    sorted: Vec<TableEntry>,
}

impl DensityIndex {
    /// Read and sort a table file
    pub fn load(path: &Path) -> Result<Self> {
        let table = DensityTable::read_from(path)?;
        if table.is_empty() {
            return Err(Error::EmptyTable {
                path: path.to_path_buf(),
            });
        }
        log::debug!("loaded {} density entries from {}", table.len(), path.display());
        Self::from_table(table)
    }

    /// Sort an in-memory table
    pub fn from_table(table: DensityTable) -> Result<Self> {
        if table.is_empty() {
            return Err(Error::EmptyTable {
                path: PathBuf::from("<memory>"),
            });
        }
        let mut sorted = table.into_entries();
        sorted.sort_by(|a, b| a.score.total_cmp(&b.score).then(a.code.cmp(&b.code)));
        Ok(Self { sorted })
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// Entries in ascending score order
    pub fn entries(&self) -> &[TableEntry] {
        &self.sorted
    }

    /// Look up `query` with the given strategy
    pub fn lookup(&self, query: f64, strategy: SearchStrategy) -> u32 {
        match strategy {
            SearchStrategy::Bisect => self.closest(query),
            SearchStrategy::Nearest => self.nearest(query),
        }
    }

    /// Code found by repeatedly halving the sorted entries
    ///
    /// At each step the midpoint of the remaining run is the pivot. If its
    /// score is above the query the left half is kept, otherwise the right
    /// half (pivot included). Stops at a single entry. The result is near
    /// the query but is not guaranteed to be the closest one, because the
    /// neighbour on the other side of the final split is never compared.
    /// Queries outside the table's range land on the first or last entry.
    pub fn closest(&self, query: f64) -> u32 {
        let mut start = 0;
        let mut len = self.sorted.len();

        while len > 1 {
            let half = len / 2;
            if self.sorted[start + half].score > query {
                len = half;
            } else {
                start += half;
                len -= half;
            }
        }

        self.sorted[start].code
    }

    /// Code whose score has the smallest absolute difference from `query`
    ///
    /// When two neighbours are equally close the lower score wins.
    pub fn nearest(&self, query: f64) -> u32 {
        let idx = self.sorted.partition_point(|e| e.score < query);

        if idx == 0 {
            return self.sorted[0].code;
        }
        if idx == self.sorted.len() {
            return self.sorted[idx - 1].code;
        }

        let below = &self.sorted[idx - 1];
        let above = &self.sorted[idx];
        if query - below.score <= above.score - query {
            below.code
        } else {
            above.code
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(pairs: &[(u32, f64)]) -> DensityIndex {
        let entries = pairs
            .iter()
            .map(|&(code, score)| TableEntry { code, score })
            .collect();
        DensityIndex::from_table(DensityTable::new(entries)).unwrap()
    }

    fn sample() -> DensityIndex {
        // Deliberately unsorted
        index(&[
            (64, 0.5),
            (32, 0.0),
            (46, 0.0625),
            (35, 0.375),
            (58, 0.125),
            (43, 0.25),
        ])
    }

    #[test]
    fn test_sorted_by_score() {
        let idx = sample();
        let scores: Vec<f64> = idx.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![0.0, 0.0625, 0.125, 0.25, 0.375, 0.5]);
    }

    #[test]
    fn test_ties_broken_by_code() {
        let idx = index(&[(90, 0.5), (70, 0.5), (80, 0.5), (10, 0.1)]);
        let codes: Vec<u32> = idx.entries().iter().map(|e| e.code).collect();
        assert_eq!(codes, vec![10, 70, 80, 90]);
    }

    #[test]
    fn test_empty_table_rejected() {
        let result = DensityIndex::from_table(DensityTable::default());
        assert!(matches!(result, Err(Error::EmptyTable { .. })));
    }

    #[test]
    fn test_load_empty_file_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let result = DensityIndex::load(file.path());
        assert!(matches!(result, Err(Error::EmptyTable { .. })));
    }

    #[test]
    fn test_closest_exact_scores() {
        let idx = sample();
        assert_eq!(idx.closest(0.0), 32);
        assert_eq!(idx.closest(0.25), 43);
        assert_eq!(idx.closest(0.5), 64);
    }

    #[test]
    fn test_closest_saturates() {
        let idx = sample();
        assert_eq!(idx.closest(-3.0), 32);
        assert_eq!(idx.closest(1.7), 64);
        assert_eq!(idx.nearest(-3.0), 32);
        assert_eq!(idx.nearest(1.7), 64);
    }

    #[test]
    fn test_closest_rounds_down_between_entries() {
        // 0.36 sits next to 0.375 but the halving keeps the lower run
        let idx = sample();
        assert_eq!(idx.closest(0.36), 43);
        assert_eq!(idx.nearest(0.36), 35);
    }

    #[test]
    fn test_nearest_midpoint_prefers_lower() {
        let idx = sample();
        assert_eq!(idx.nearest(0.3125), 43);
        assert_eq!(idx.nearest(0.32), 35);
    }

    #[test]
    fn test_single_entry() {
        let idx = index(&[(65, 0.3)]);
        assert_eq!(idx.closest(0.0), 65);
        assert_eq!(idx.nearest(0.9), 65);
    }

    #[test]
    fn test_result_always_in_table() {
        let idx = sample();
        let codes: Vec<u32> = idx.entries().iter().map(|e| e.code).collect();
        for step in -20..=40 {
            let query = step as f64 * 0.05;
            assert!(codes.contains(&idx.closest(query)));
            assert!(codes.contains(&idx.nearest(query)));
        }
    }

    #[test]
    fn test_lookup_dispatch() {
        let idx = sample();
        assert_eq!(idx.lookup(0.36, SearchStrategy::Bisect), 43);
        assert_eq!(idx.lookup(0.36, SearchStrategy::Nearest), 35);
    }
}
