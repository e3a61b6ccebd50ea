#[macro_use]
extern crate log;

pub mod cmd;
mod error;
pub mod part;
pub mod region;
pub mod retry;

pub use error::*;

#[cfg(test)]
extern crate better_panic;

#[cfg(test)]
pub(crate) fn tests_init() {
    better_panic::install();
}
