//! common - 通用类型和工具库

pub mod latch;
pub mod types;

pub use latch::*;
pub use types::*;
