//! 枚举模块

mod engine_state;
mod release_status;

pub use engine_state::EngineState;
pub use release_status::ReleaseStatus;
