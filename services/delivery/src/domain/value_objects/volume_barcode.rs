//! 包裹条码解析
//!
//! 条码格式: `<产品编码><6 位采集日期><2 位序号>`，产品编码长度不定

/// 条码尾部固定段长度（日期 + 序号）
pub const VOLUME_SUFFIX_LEN: usize = 8;

/// 可解析的最短条码长度
pub const MIN_BARCODE_LEN: usize = VOLUME_SUFFIX_LEN + 1;

/// 从包裹条码中取出产品编码
///
/// 不足 [`MIN_BARCODE_LEN`] 个字符时返回空串，调用方按产品不符处理
pub fn decode_product_code(raw: &str) -> String {
    let len = raw.chars().count();
    if len < MIN_BARCODE_LEN {
        return String::new();
    }
    raw.chars().take(len - VOLUME_SUFFIX_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_date_and_sequence() {
        assert_eq!(decode_product_code("50005042501"), "500");
        assert_eq!(decode_product_code("12345678901234"), "123456");
    }

    #[test]
    fn test_minimum_length() {
        assert_eq!(decode_product_code("105042501"), "1");
        assert_eq!(decode_product_code("05042501"), "");
    }

    #[test]
    fn test_short_or_empty_input() {
        assert_eq!(decode_product_code("999"), "");
        assert_eq!(decode_product_code(""), "");
    }

    #[test]
    fn test_keeps_leading_zeros() {
        // 前导零保留，比较时与产品编码的十进制文本不相等
        assert_eq!(decode_product_code("050005042501"), "0500");
    }
}
