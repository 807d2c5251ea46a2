//! 值对象模块

mod volume_barcode;

pub use volume_barcode::{decode_product_code, MIN_BARCODE_LEN, VOLUME_SUFFIX_LEN};
