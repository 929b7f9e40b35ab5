// shopflow/src/pipeline/mod.rs

pub mod definition;
pub mod execution;
