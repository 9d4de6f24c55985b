//! 通用常量.

/// 单通道二值栅格.
pub mod gray {
    /// 二值栅格中, 背景 (域外) 的像素值.
    pub const BACKGROUND: u8 = 0;

    /// 二值栅格中, 前景 (域内) 的像素值. 任何非零值都会被视为前景,
    /// 该值只是约定的写入值.
    pub const FOREGROUND: u8 = 255;

    /// 像素是否是背景?
    #[inline]
    pub const fn is_background(p: u8) -> bool {
        matches!(p, BACKGROUND)
    }

    /// 像素是否是前景?
    #[inline]
    pub const fn is_foreground(p: u8) -> bool {
        !is_background(p)
    }
}

/// 优先队列修正阶段中, 每弹出多少个元素检查一次取消信号.
pub const CANCEL_CHECK_INTERVAL: usize = 4096;

/// `Strategy::Iterative` 缺省的最大扫描轮数 (一轮 = 一次前向 + 一次后向).
pub const DEFAULT_MAX_ROUNDS: usize = 64;

/// 默认掩膜在注册表中的名称.
pub const DEFAULT_MASK_NAME: &str = "borgefors";
