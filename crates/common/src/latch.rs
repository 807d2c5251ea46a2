//! 扫码重入锁
//!
//! 从接受一次解码事件开始持有，直到调用方显式恢复扫描才释放，
//! 防止同一次扫过条码时摄像头连续上报两次解码而重复提交

use tracing::debug;

/// 扫码重入锁
#[derive(Debug, Default)]
pub struct ScanLatch {
    held: bool,
}

impl ScanLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// 尝试获取锁，已被持有时返回 false
    pub fn try_acquire(&mut self) -> bool {
        if self.held {
            debug!("Scan latch already held, decode event discarded");
            return false;
        }
        self.held = true;
        true
    }

    /// 释放锁
    pub fn release(&mut self) {
        self.held = false;
    }

    pub fn is_held(&self) -> bool {
        self.held
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_is_refused() {
        let mut latch = ScanLatch::new();
        assert!(latch.try_acquire());
        assert!(!latch.try_acquire());
        assert!(latch.is_held());
    }

    #[test]
    fn test_release_allows_next_acquire() {
        let mut latch = ScanLatch::new();
        assert!(latch.try_acquire());
        latch.release();
        assert!(!latch.is_held());
        assert!(latch.try_acquire());
    }
}
