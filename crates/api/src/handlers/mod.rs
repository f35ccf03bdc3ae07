pub mod entries;
pub mod explanation;
