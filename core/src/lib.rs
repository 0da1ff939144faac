pub mod client;
pub mod conf;
pub mod diag;
pub mod error;
pub mod lookup;
pub mod model;
pub mod schema;
