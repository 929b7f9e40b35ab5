// shopflow/src/core/mod.rs

pub mod context_data;
pub mod control;
pub mod step;
