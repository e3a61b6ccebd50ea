use super::compare::{compare, MissingAnchor};
use super::layout::{self, Layout};
use super::plan::Plan;
use super::{DesiredPartition, Partitioner};
use crate::cmd::CmdRunner;
use crate::region::Region;
use crate::{Error, Result};

pub const DEFAULT_TOOL: &str = "parted";
pub const DEFAULT_DELTA: u64 = 1024 * 1024;

/// True for the read-only table query, the one command safe to repeat.
pub fn is_print_command(args: &[&str]) -> bool {
    args.get(1) == Some(&"-m") && args.last() == Some(&"print")
}

pub struct PartedPartitioner<R: CmdRunner> {
    runner: R,
    tool: String,
    delta: u64,
}

impl<R: CmdRunner> PartedPartitioner<R> {
    pub fn new(runner: R, delta: u64) -> Self {
        Self {
            runner,
            tool: DEFAULT_TOOL.to_owned(),
            delta,
        }
    }

    pub fn with_tool(mut self, tool: &str) -> Self {
        self.tool = tool.to_owned();
        self
    }

    #[inline]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Edits `partition` would make, without making them.
    pub fn plan(&self, device: &str, desired: &[DesiredPartition]) -> Result<Plan> {
        self.query(device)
            .and_then(|layout| self.plan_layout(device, &layout, desired))
            .map_err(|e| Error::partitioning(device, e))
    }

    fn query(&self, device: &str) -> Result<Layout> {
        let output = self
            .runner
            .run(&[self.tool.as_str(), "-m", device, "unit", "B", "print"])
            .map_err(|source| Error::DiskQueryFailed {
                device: device.to_owned(),
                source,
            })?;

        layout::parse(&output).map_err(|source| Error::LayoutParseFailed {
            device: device.to_owned(),
            source,
        })
    }

    fn anchor_end(device: &str, layout: &Layout) -> Result<u64> {
        layout
            .anchor()
            .map(|p| p.end)
            .ok_or_else(|| Error::MissingAnchorPartition {
                device: device.to_owned(),
            })
    }

    fn plan_layout(
        &self,
        device: &str,
        layout: &Layout,
        desired: &[DesiredPartition],
    ) -> Result<Plan> {
        let anchor_end = Self::anchor_end(device, layout)?;
        let comparison = compare(&layout.partitions, desired, self.delta).map_err(
            |MissingAnchor| Error::MissingAnchorPartition {
                device: device.to_owned(),
            },
        )?;
        debug!("{}: {:?} (delta {})", device, comparison, self.delta);

        Plan::new(&layout.partitions, desired, comparison, anchor_end)
    }

    fn remove(&self, device: &str, number: u32) -> Result<()> {
        info!("removing partition {} from {}", number, device);

        let n = number.to_string();
        self.runner
            .run(&[self.tool.as_str(), "-s", device, "rm", n.as_str()])
            .map(|_| ())
            .map_err(|source| Error::PartitionRemovalFailed {
                device: device.to_owned(),
                number,
                source,
            })
    }

    fn create(&self, device: &str, region: &Region<u64>) -> Result<()> {
        info!("creating partition {} on {}", region, device);

        let start = region.start().to_string();
        let end = region.end().to_string();
        self.runner
            .run(&[
                self.tool.as_str(),
                "-s",
                device,
                "unit",
                "B",
                "mkpart",
                "primary",
                start.as_str(),
                end.as_str(),
            ])
            .map(|_| ())
            .map_err(|source| Error::PartitionCreationFailed {
                device: device.to_owned(),
                start: region.start(),
                end: region.end(),
                source,
            })
    }

    fn reconcile(&self, device: &str, desired: &[DesiredPartition]) -> Result<()> {
        let layout = self.query(device)?;
        let plan = self.plan_layout(device, &layout, desired)?;

        if plan.is_empty() {
            info!("{} already has the desired partitions", device);
            return Ok(());
        }

        // No rollback: a rerun picks up from whatever was left on disk.
        for &number in plan.removals.iter() {
            self.remove(device, number)?;
        }
        for region in plan.creations.iter() {
            self.create(device, region)?;
        }

        Ok(())
    }

    fn remaining_size(&self, device: &str) -> Result<u64> {
        let layout = self.query(device)?;
        let anchor_end = Self::anchor_end(device, &layout)?;

        layout
            .device
            .size
            .checked_sub(anchor_end)
            .ok_or_else(|| {
                Error::SizeOverflow(format!(
                    "partition 1 ends at {} past device size {}",
                    anchor_end, layout.device.size
                ))
            })
    }
}

impl<R: CmdRunner> Partitioner for PartedPartitioner<R> {
    fn partition(&self, device: &str, partitions: &[DesiredPartition]) -> Result<()> {
        self.reconcile(device, partitions)
            .map_err(|e| Error::partitioning(device, e))
    }

    fn get_device_size_in_bytes(&self, device: &str) -> Result<u64> {
        self.remaining_size(device)
            .map_err(|e| Error::device_size(device, e))
    }

    fn get_partitions(&self, device: &str) -> Result<Layout> {
        self.query(device)
    }
}
