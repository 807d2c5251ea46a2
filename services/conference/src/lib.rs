//! 收货核验服务
//!
//! 逐件扫描商品条码并提交放行，每次扫描单独提交，无本地台账

pub mod application;
pub mod domain;

pub use application::GoodsConference;
pub use domain::GoodsReleaseOutcome;
