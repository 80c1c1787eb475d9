pub mod config;
pub mod issue;
