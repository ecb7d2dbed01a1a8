pub mod app;
pub mod cli;
pub mod compare;
pub mod config;
pub mod debounce;
pub mod filter;
pub mod interviews;
pub mod offer;
pub mod output;
pub mod pager;
pub mod pipeline;
pub mod runner;
pub mod stats;
pub mod suggest;
pub mod utils;

#[cfg(test)]
mod tests;
