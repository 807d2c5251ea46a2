//! 实体模块

mod sale;
mod volume_reading;

pub use sale::{Sale, SaleItem};
pub use volume_reading::VolumeReading;
