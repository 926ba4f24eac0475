pub mod audit;
pub mod backup;
pub mod config;
pub mod links;
pub mod recovery;
pub mod tasks;
