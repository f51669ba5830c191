//! Local resume cache adapters

pub mod file_cache;
