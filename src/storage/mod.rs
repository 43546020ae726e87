mod json_store;
pub mod outcome;

pub use json_store::JsonStore;
pub use outcome::{CategoryAdded, MergeReport, Removal};
