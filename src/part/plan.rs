use super::compare::Comparison;
use super::layout::ExistingPartition;
use super::DesiredPartition;
use crate::region::Region;
use crate::{Error, Result};

/// Edits that converge a device: removals first, then creations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    /// Partition numbers, ascending.
    pub removals: Vec<u32>,
    pub creations: Vec<Region<u64>>,
}

impl Plan {
    /// `existing` starts with the anchor partition, which ends at `anchor_end`.
    ///
    /// New boundaries come from the desired sizes of the kept partitions, not
    /// from where the kept partitions actually end, so tolerated drift never
    /// accumulates across runs.
    pub fn new(
        existing: &[ExistingPartition],
        desired: &[DesiredPartition],
        comparison: Comparison,
        anchor_end: u64,
    ) -> Result<Self> {
        let mismatch = match comparison {
            Comparison::Converged => return Ok(Self::default()),
            Comparison::MismatchAt(i) => i,
        };

        let removals = existing
            .iter()
            .skip(1 + mismatch)
            .map(|p| p.number)
            .collect();

        let mut offset = desired
            .iter()
            .take(mismatch)
            .try_fold(anchor_end, |acc, d| acc.checked_add(d.size))
            .ok_or_else(|| Error::SizeOverflow(format!("{} + kept partitions", anchor_end)))?;

        let mut creations = Vec::with_capacity(desired.len().saturating_sub(mismatch));
        for d in desired.iter().skip(mismatch) {
            let end = offset
                .checked_add(d.size)
                .ok_or_else(|| Error::SizeOverflow(format!("{} + {}", offset, d.size)))?;
            creations.push(Region::new(offset, end));
            offset = end;
        }

        Ok(Self {
            removals,
            creations,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.removals.is_empty() && self.creations.is_empty()
    }
}
