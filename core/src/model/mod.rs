pub mod filter;
pub mod mappings;
pub mod query;
