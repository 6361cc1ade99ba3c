pub mod client;
pub mod types;

pub use client::{fetch, fetch_json, Target};
