pub mod analyzers;
pub mod config;
pub mod fetch;
pub mod output;
pub mod parser;
