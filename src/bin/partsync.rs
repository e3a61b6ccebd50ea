extern crate better_panic;
extern crate clap;
extern crate partsync;

use anyhow::Context;
use clap::{Parser, Subcommand};
use partsync::cmd::{CmdRunner, ExecCmdRunner};
use partsync::part::parted::{is_print_command, DEFAULT_DELTA};
use partsync::part::{DesiredPartition, PartedPartitioner, Partitioner};
use partsync::retry::RetryingCmdRunner;

mod utils;

#[derive(Subcommand)]
enum Command {
    #[clap(about = "Remove and create partitions after partition 1 until their sizes match")]
    Partition {
        device: String,
        #[clap(required = true, parse(try_from_str = utils::parse_size))]
        sizes: Vec<u64>,
    },

    #[clap(about = "Print bytes available after partition 1")]
    Size { device: String },

    #[clap(
        about = "Print partitions",
        long_about = "Print partitions. When sizes are given, also print what `partition` would do."
    )]
    Print {
        device: String,
        #[clap(parse(try_from_str = utils::parse_size))]
        sizes: Vec<u64>,
    },
}

#[derive(Parser)]
#[clap(about = "Converge disk partitions to a list of sizes")]
struct Options {
    #[clap(short, long, parse(from_occurrences))]
    pub verbose: u32,

    #[clap(long, default_value = "parted", help = "parted binary")]
    pub parted: String,

    #[clap(long, parse(try_from_str = utils::parse_size), help = "Size difference still treated as equal [default: 1M]")]
    pub delta: Option<u64>,

    #[clap(long, default_value = "1", help = "Attempts for the partition table query; rm and mkpart always run once")]
    pub max_tries: u32,

    #[clap(subcommand)]
    pub command: Command,
}

fn desired(sizes: &[u64]) -> Vec<DesiredPartition> {
    sizes.iter().copied().map(DesiredPartition::new).collect()
}

fn print<R: CmdRunner>(
    partitioner: &PartedPartitioner<R>,
    device: &str,
    sizes: &[u64],
) -> anyhow::Result<()> {
    let layout = partitioner.get_partitions(device)?;

    println!(
        "{} ({}, {}): {} bytes ({})",
        layout.device.path,
        layout.device.table,
        layout.device.model,
        layout.device.size,
        utils::size_to_string(layout.device.size)
    );
    println!("{:>4} {:>16} {:>16} {:>16}  {}", "#", "start", "end", "size", "fs");
    for p in layout.partitions.iter() {
        println!(
            "{:>4} {:>16} {:>16} {:>16}  {}",
            p.number, p.start, p.end, p.size, p.fs_type
        );
    }

    if sizes.is_empty() {
        return Ok(());
    }

    let plan = partitioner.plan(device, &desired(sizes))?;
    if plan.is_empty() {
        println!("nothing to do");
    }
    for number in plan.removals.iter() {
        println!("remove #{}", number);
    }
    for region in plan.creations.iter() {
        println!(
            "create {} ({})",
            region,
            utils::size_to_string(region.size())
        );
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    better_panic::install();
    let o = Options::parse();
    utils::setup_logging(o.verbose).context("failed to set up logging")?;

    let runner = RetryingCmdRunner::new(ExecCmdRunner::new(), o.max_tries)
        .context("invalid --max-tries")?
        .retry_only(is_print_command);
    let partitioner =
        PartedPartitioner::new(runner, o.delta.unwrap_or(DEFAULT_DELTA)).with_tool(&o.parted);

    match o.command {
        Command::Partition { device, sizes } => {
            partitioner.partition(&device, &desired(&sizes))?;
        }
        Command::Size { device } => {
            println!("{}", partitioner.get_device_size_in_bytes(&device)?);
        }
        Command::Print { device, sizes } => print(&partitioner, &device, &sizes)?,
    }

    Ok(())
}
