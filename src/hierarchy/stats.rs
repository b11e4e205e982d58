//! Pagination and tree-building statistics.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Statistics from one cursor-following fetch loop.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationStats {
    /// Pages requested from the provider
    pub pages: usize,
    /// Records accumulated across all pages
    pub records: usize,
    /// Wall time of the whole loop
    #[serde(with = "duration_serde")]
    pub elapsed: Duration,
}

impl PaginationStats {
    pub fn log_summary(&self, what: &str) {
        tracing::info!(
            "Fetched {} {what} in {} page(s) in {:?}",
            self.records,
            self.pages,
            self.elapsed
        );
    }
}

/// Statistics from materializing an occurrence list into a tree.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStats {
    /// Occurrence records consumed
    pub records: usize,
    /// Nodes in the finished tree, root included
    pub nodes: usize,
    /// Records that repeated an existing parent/child placement
    pub repeated_instances: usize,
    /// Records that tried to move an already placed child to another parent
    pub conflicting_placements: usize,
    /// Records dropped because their parent was never reported
    pub orphaned: usize,
    /// Nodes dropped because their parent chain ends at an orphan
    pub unreachable: usize,
}

impl BuildStats {
    /// True when any record was dropped or skipped.
    #[must_use]
    pub const fn is_lossy(&self) -> bool {
        self.conflicting_placements > 0 || self.orphaned > 0 || self.unreachable > 0
    }

    pub fn log_summary(&self) {
        tracing::info!(
            "Built tree: {} records -> {} nodes ({} repeated instances)",
            self.records,
            self.nodes,
            self.repeated_instances
        );
        if self.is_lossy() {
            tracing::warn!(
                "Dropped occurrences: {} orphaned, {} unreachable, {} conflicting placements",
                self.orphaned,
                self.unreachable,
                self.conflicting_placements
            );
        }
    }
}

/// Serde support for Duration
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lossy_flag() {
        assert!(!BuildStats::default().is_lossy());
        let stats = BuildStats {
            orphaned: 1,
            ..BuildStats::default()
        };
        assert!(stats.is_lossy());
    }

    #[test]
    fn test_elapsed_serializes_as_millis() {
        let stats = PaginationStats {
            pages: 2,
            records: 10,
            elapsed: Duration::from_millis(1500),
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["elapsed"], 1500);
    }
}
