//! Built-in render passes.

mod clear;

pub use clear::ClearPass;
