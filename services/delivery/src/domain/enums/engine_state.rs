//! 核对引擎状态

use std::fmt;

/// 核对引擎状态
///
/// `Idle → ItemSelected ⇄ Scanning → ReadyToRelease → Releasing → Released`，
/// 远端放行失败时从 `Releasing` 回到 `ReadyToRelease`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineState {
    #[default]
    Idle,
    ItemSelected,
    Scanning,
    ReadyToRelease,
    Releasing,
    Released,
}

impl EngineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ItemSelected => "item_selected",
            Self::Scanning => "scanning",
            Self::ReadyToRelease => "ready_to_release",
            Self::Releasing => "releasing",
            Self::Released => "released",
        }
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
