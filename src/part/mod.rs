pub mod compare;
pub mod layout;
pub mod parted;
pub mod plan;

pub use layout::{DeviceDescriptor, ExistingPartition, Layout};
pub use parted::PartedPartitioner;
pub use plan::Plan;

use crate::Result;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DesiredPartition {
    pub size: u64,
}

impl DesiredPartition {
    pub fn new(size: u64) -> Self {
        Self { size }
    }
}

/// Converges a device to a list of partition sizes placed after partition 1.
///
/// Calls for the same device must not overlap; nothing here locks the device.
pub trait Partitioner {
    fn partition(&self, device: &str, partitions: &[DesiredPartition]) -> Result<()>;

    /// Bytes available after partition 1.
    fn get_device_size_in_bytes(&self, device: &str) -> Result<u64>;

    fn get_partitions(&self, device: &str) -> Result<Layout>;
}
