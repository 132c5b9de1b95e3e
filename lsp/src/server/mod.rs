mod cli;
pub(crate) mod config;
mod entry;
mod handlers;
pub(crate) mod heptc;
pub(crate) mod loader;
mod signature;
mod state;
pub(crate) mod text;

pub use entry::run;
