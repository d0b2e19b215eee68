pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod export;
pub mod form;
pub mod normalize;
pub mod output;
pub mod record;
pub mod render;
pub mod session;
pub mod store;

#[cfg(test)]
mod tests;
