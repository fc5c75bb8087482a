//! Tiling records consumed by downstream kernel-launch codegen.
//!
//! Plans are pure data: created once per operator compile, immutable
//! afterward. `to_words` flattens a plan into the scalar list the launch
//! convention expects; the field order is part of that contract and matches
//! the struct declaration order.

use serde::{Deserialize, Serialize};

/// Per-core partition of a flattened element range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TilingPlan {
    /// Cores that receive work; at most the profile's core count.
    pub active_core_count: usize,
    /// Natural ceil share of elements per core, before alignment.
    pub per_core_elements: u64,
    /// Per-core share rounded up to the block boundary. Every active core
    /// except a tail core processes exactly this many elements.
    pub aligned_per_core_elements: u64,
    /// Element count on the last active core.
    pub tail_elements: u64,
    /// Whether the last active core takes a residual smaller than the
    /// aligned share.
    pub has_tail_core: bool,
    /// Total elements across all cores.
    pub total_elements: u64,
    /// Elements per aligned transfer block.
    pub block_elements: u64,
}

impl TilingPlan {
    /// Element count processed by a given active core. Zero past the last
    /// active core.
    pub fn core_elements(&self, core: usize) -> u64 {
        if core + 1 == self.active_core_count {
            self.tail_elements
        } else if core < self.active_core_count {
            self.aligned_per_core_elements
        } else {
            0
        }
    }

    /// Flatten into the scalar list handed to the launch convention.
    pub fn to_words(&self) -> Vec<i64> {
        vec![
            self.active_core_count as i64,
            self.per_core_elements as i64,
            self.aligned_per_core_elements as i64,
            self.tail_elements as i64,
            self.has_tail_core as i64,
            self.total_elements as i64,
            self.block_elements as i64,
        ]
    }
}

/// Per-core partition at row granularity.
///
/// Used by operators whose kernels process whole rows at a time (loss
/// gradients, per-sample reductions): rows are distributed across cores and
/// each row's payload is block-aligned in scratch memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowTilingPlan {
    /// Cores that receive rows; at most the profile's core count.
    pub active_core_count: usize,
    /// Rows per core; every active core except a tail core takes this many.
    pub rows_per_core: u64,
    /// Row count on the last active core.
    pub tail_rows: u64,
    /// Whether the last active core takes fewer rows than the others.
    pub has_tail_core: bool,
    /// Total rows across all cores.
    pub total_rows: u64,
    /// Elements in one row.
    pub row_elements: u64,
    /// Row payload rounded up to the block boundary.
    pub aligned_row_elements: u64,
}

impl RowTilingPlan {
    /// Row count processed by a given active core. Zero past the last
    /// active core.
    pub fn core_rows(&self, core: usize) -> u64 {
        if core + 1 == self.active_core_count {
            self.tail_rows
        } else if core < self.active_core_count {
            self.rows_per_core
        } else {
            0
        }
    }

    /// Flatten into the scalar list handed to the launch convention.
    pub fn to_words(&self) -> Vec<i64> {
        vec![
            self.active_core_count as i64,
            self.rows_per_core as i64,
            self.tail_rows as i64,
            self.has_tail_core as i64,
            self.total_rows as i64,
            self.row_elements as i64,
            self.aligned_row_elements as i64,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan() -> TilingPlan {
        TilingPlan {
            active_core_count: 4,
            per_core_elements: 25,
            aligned_per_core_elements: 32,
            tail_elements: 4,
            has_tail_core: true,
            total_elements: 100,
            block_elements: 8,
        }
    }

    #[test]
    fn test_core_elements() {
        let plan = sample_plan();
        assert_eq!(plan.core_elements(0), 32);
        assert_eq!(plan.core_elements(2), 32);
        assert_eq!(plan.core_elements(3), 4);
        assert_eq!(plan.core_elements(4), 0);
    }

    #[test]
    fn test_to_words_layout() {
        let words = sample_plan().to_words();
        assert_eq!(words, vec![4, 25, 32, 4, 1, 100, 8]);
    }

    #[test]
    fn test_serde_round_trip() {
        let plan = sample_plan();
        let json = serde_json::to_string(&plan).unwrap();
        let back: TilingPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(back, plan);
    }

    #[test]
    fn test_row_plan_words() {
        let plan = RowTilingPlan {
            active_core_count: 8,
            rows_per_core: 3,
            tail_rows: 1,
            has_tail_core: true,
            total_rows: 22,
            row_elements: 10,
            aligned_row_elements: 16,
        };
        assert_eq!(plan.to_words(), vec![8, 3, 1, 1, 22, 10, 16]);
        assert_eq!(plan.core_rows(0), 3);
        assert_eq!(plan.core_rows(7), 1);
        assert_eq!(plan.core_rows(8), 0);
    }
}
