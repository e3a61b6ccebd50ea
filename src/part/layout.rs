//! Parser for the machine readable, byte unit table print of `parted`
//! (`parted -m <device> unit B print`).
//!
//! ```text
//! BYT;
//! /dev/sda:128B:virtblk:512:512:msdos:Virtio Block Device;
//! 1:1B:33B:32B:ext4::;
//! ```

use thiserror::Error;

const UNITS_BYTES: &str = "BYT";
const UNIT_SUFFIX: char = 'B';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty output")]
    Empty,
    #[error("expected at least 2 lines, got {0}")]
    MissingLines(usize),
    #[error("unexpected units `{0}`")]
    UnexpectedUnits(String),
    #[error("malformed device line `{0}`")]
    MalformedDevice(String),
    #[error("malformed partition line `{0}`")]
    MalformedPartition(String),
    #[error("invalid {field} `{value}`")]
    InvalidNumber { field: &'static str, value: String },
    #[error("partition {number} spans {start}-{end} but reports size {size}")]
    InconsistentPartition {
        number: u32,
        start: u64,
        end: u64,
        size: u64,
    },
    #[error("partition {number} listed after partition {previous}")]
    UnorderedPartition { number: u32, previous: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    pub path: String,
    pub size: u64,
    pub table: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingPartition {
    pub number: u32,
    pub start: u64,
    pub end: u64,
    pub size: u64,
    pub fs_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub device: DeviceDescriptor,
    pub partitions: Vec<ExistingPartition>,
}

impl Layout {
    /// Partition 1, reserved for the system and never touched.
    pub fn anchor(&self) -> Option<&ExistingPartition> {
        self.partitions.first().filter(|p| p.number == 1)
    }
}

fn strip_terminator(line: &str) -> &str {
    let line = line.trim_end();
    line.strip_suffix(';').unwrap_or(line)
}

/// Integer byte count with the `B` suffix; anything else, fractions
/// included, is rejected.
fn parse_bytes(field: &'static str, value: &str) -> Result<u64, ParseError> {
    let invalid = || ParseError::InvalidNumber {
        field,
        value: value.to_owned(),
    };

    let digits = value.strip_suffix(UNIT_SUFFIX).ok_or_else(invalid)?;
    if digits.is_empty() || !digits.bytes().all(|x| x.is_ascii_digit()) {
        return Err(invalid());
    }

    digits.parse().map_err(|_| invalid())
}

fn parse_device(line: &str) -> Result<DeviceDescriptor, ParseError> {
    let fields: Vec<&str> = strip_terminator(line).split(':').collect();
    if fields.len() < 7 || fields[0].is_empty() {
        return Err(ParseError::MalformedDevice(line.to_owned()));
    }

    Ok(DeviceDescriptor {
        path: fields[0].to_owned(),
        size: parse_bytes("device size", fields[1])?,
        table: fields[5].to_owned(),
        model: fields[6].to_owned(),
    })
}

fn parse_partition(line: &str) -> Result<ExistingPartition, ParseError> {
    let fields: Vec<&str> = strip_terminator(line).split(':').collect();
    if fields.len() < 4 {
        return Err(ParseError::MalformedPartition(line.to_owned()));
    }

    let number = match fields[0].parse::<u32>() {
        Ok(n) if n > 0 && fields[0].bytes().all(|x| x.is_ascii_digit()) => n,
        _ => {
            return Err(ParseError::InvalidNumber {
                field: "partition number",
                value: fields[0].to_owned(),
            })
        }
    };

    let start = parse_bytes("partition start", fields[1])?;
    let end = parse_bytes("partition end", fields[2])?;
    let size = parse_bytes("partition size", fields[3])?;

    // parted reports an inclusive end, so `size` may be one more than the span.
    let consistent = end
        .checked_sub(start)
        .map_or(false, |span| size == span || Some(size) == span.checked_add(1));
    if !consistent {
        return Err(ParseError::InconsistentPartition {
            number,
            start,
            end,
            size,
        });
    }

    Ok(ExistingPartition {
        number,
        start,
        end,
        size,
        fs_type: fields.get(4).copied().unwrap_or("").to_owned(),
    })
}

pub fn parse(output: &str) -> Result<Layout, ParseError> {
    let lines: Vec<&str> = output
        .lines()
        .map(str::trim)
        .filter(|x| !x.is_empty())
        .collect();

    match lines.len() {
        0 => return Err(ParseError::Empty),
        1 => return Err(ParseError::MissingLines(1)),
        _ => {}
    }

    let units = strip_terminator(lines[0]);
    if units != UNITS_BYTES {
        return Err(ParseError::UnexpectedUnits(units.to_owned()));
    }

    let device = parse_device(lines[1])?;

    let mut partitions: Vec<ExistingPartition> = Vec::with_capacity(lines.len() - 2);
    for line in &lines[2..] {
        let partition = parse_partition(line)?;
        if let Some(previous) = partitions.last() {
            if partition.number <= previous.number {
                return Err(ParseError::UnorderedPartition {
                    number: partition.number,
                    previous: previous.number,
                });
            }
        }
        partitions.push(partition);
    }

    trace!(
        "parsed {} partition(s) on {} ({} bytes)",
        partitions.len(),
        device.path,
        device.size
    );

    Ok(Layout { device, partitions })
}
