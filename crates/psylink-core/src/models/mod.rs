pub mod audit;
pub mod import;
pub mod link;
pub mod recovery;
pub mod snapshot;
