pub mod config;
pub mod facts;
pub mod rules;
pub mod violation;
