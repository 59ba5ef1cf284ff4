#![warn(clippy::all, clippy::pedantic)]

pub mod cli;
pub mod constants;
pub mod error;
pub mod linker;
pub mod package;
pub mod utils;

mod test_utils;
