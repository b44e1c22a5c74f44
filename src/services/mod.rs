pub mod gban;
pub mod rater_cache;
