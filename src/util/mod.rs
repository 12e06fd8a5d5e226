pub mod cli;
pub mod random;
