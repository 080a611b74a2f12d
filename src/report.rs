use crate::family::DocumentFamily;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub success: u32,
    pub skipped: u32,
    pub failed: u32,
}

impl Stats {
    pub fn merge(&mut self, other: &Stats) {
        self.success += other.success;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }

    pub fn total(&self) -> u32 {
        self.success + self.skipped + self.failed
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyReport {
    pub family: DocumentFamily,
    pub discovered: usize,
    pub stats: Stats,
    /// Family-level abort reason (engine launch or discovery failure). The
    /// other families still run.
    pub error: Option<String>,
}

impl FamilyReport {
    pub fn empty(family: DocumentFamily) -> Self {
        Self {
            family,
            discovered: 0,
            stats: Stats::default(),
            error: None,
        }
    }

    pub fn aborted(family: DocumentFamily, discovered: usize, error: String) -> Self {
        Self {
            family,
            discovered,
            stats: Stats::default(),
            error: Some(error),
        }
    }

    pub fn completed(family: DocumentFamily, discovered: usize, stats: Stats) -> Self {
        Self {
            family,
            discovered,
            stats,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub started: String,
    pub finished: String,
    pub families: Vec<FamilyReport>,
    pub totals: Stats,
}

impl BatchReport {
    pub fn new(families: Vec<FamilyReport>, started: String, finished: String) -> Self {
        let mut totals = Stats::default();
        for family in &families {
            totals.merge(&family.stats);
        }
        Self {
            started,
            finished,
            families,
            totals,
        }
    }

    pub fn summary_line(&self) -> String {
        format!(
            "success={} skipped={} failed={}",
            self.totals.success, self.totals.skipped, self.totals.failed
        )
    }
}
