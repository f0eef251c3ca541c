pub mod config;
pub mod corpus;
pub mod correction;
pub mod dataset;
pub mod key;
