//! 常用倒角掩膜.
//!
//! 二维掩膜族:
//!
//! - `W2(a, b)`: 3×3 邻域, 正交权重 `a`, 对角权重 `b`;
//! - `W3(a, b, c)`: 5×5 邻域, 另加 "马步" 偏移 `(±1, ±2)`, `(±2, ±1)`, 权重 `c`.
//!
//! 三维掩膜族:
//!
//! - `W3(a, b, c)`: 3×3×3 邻域, 按非零分量个数取 `a`, `b`, `c`;
//! - `W4(a, b, c, d)`: 5×5×5 邻域, 另加 `(±2, ±1, 0)` 的全部排列, 权重 `d`.

use super::{ChamferMask, MaskDim, Offset};
use crate::error::MaskError;

const SQRT_2: f64 = std::f64::consts::SQRT_2;

/// 偏移各分量绝对值, 升序.
#[inline]
fn abs_sorted(o: Offset) -> [usize; 3] {
    let mut a = [o.dz.unsigned_abs(), o.dh.unsigned_abs(), o.dw.unsigned_abs()];
    a.sort_unstable();
    a
}

/// 预置掩膜的参数都是合法的.
#[inline]
fn preset(mask: Result<ChamferMask, MaskError>) -> ChamferMask {
    mask.expect("预置掩膜参数必然合法")
}

/// 掩膜族
impl ChamferMask {
    /// 二维 3×3 掩膜, 正交权重 `a`, 对角权重 `b`.
    pub fn w2(a: f64, b: f64) -> Result<Self, MaskError> {
        Self::from_forward_fn(MaskDim::Two, 1, |o| match abs_sorted(o) {
            [_, 0, 1] => Some(a),
            [_, 1, 1] => Some(b),
            _ => None,
        })
    }

    /// 二维 5×5 掩膜, 正交权重 `a`, 对角权重 `b`, 马步权重 `c`.
    pub fn w3(a: f64, b: f64, c: f64) -> Result<Self, MaskError> {
        Self::from_forward_fn(MaskDim::Two, 2, |o| match abs_sorted(o) {
            [_, 0, 1] => Some(a),
            [_, 1, 1] => Some(b),
            [_, 1, 2] => Some(c),
            _ => None,
        })
    }

    /// 三维 3×3×3 掩膜, 面邻居 `a`, 棱邻居 `b`, 顶点邻居 `c`.
    pub fn w3_3d(a: f64, b: f64, c: f64) -> Result<Self, MaskError> {
        Self::from_forward_fn(MaskDim::Three, 1, |o| match abs_sorted(o) {
            [0, 0, 1] => Some(a),
            [0, 1, 1] => Some(b),
            [1, 1, 1] => Some(c),
            _ => None,
        })
    }

    /// 三维 5×5×5 掩膜: 在 [`Self::w3_3d`] 的基础上加入 `(2, 1, 0)` 型偏移, 权重 `d`.
    pub fn w4_3d(a: f64, b: f64, c: f64, d: f64) -> Result<Self, MaskError> {
        Self::from_forward_fn(MaskDim::Three, 2, |o| match abs_sorted(o) {
            [0, 0, 1] => Some(a),
            [0, 1, 1] => Some(b),
            [1, 1, 1] => Some(c),
            [0, 1, 2] => Some(d),
            _ => None,
        })
    }
}

/// 二维预置掩膜
impl ChamferMask {
    /// 棋盘距离 (1, 1).
    pub fn chessboard() -> Self {
        preset(Self::w2(1.0, 1.0))
    }

    /// 城市街区距离 (1, 2). 对角一步等价于两步正交.
    pub fn city_block() -> Self {
        preset(Self::w2(1.0, 2.0))
    }

    /// 准欧氏距离 (1, √2). 整数权重按缺省规则取整为 (1, 1).
    pub fn quasi_euclidean() -> Self {
        preset(Self::w2(1.0, SQRT_2))
    }

    /// Borgefors (3, 4).
    pub fn borgefors() -> Self {
        preset(Self::w2(3.0, 4.0))
    }

    /// (2, 3).
    pub fn weights_23() -> Self {
        preset(Self::w2(2.0, 3.0))
    }

    /// (5, 7).
    pub fn weights_57() -> Self {
        preset(Self::w2(5.0, 7.0))
    }

    /// 马步掩膜 (5, 7, 11).
    pub fn chess_knight() -> Self {
        preset(Self::w3(5.0, 7.0, 11.0))
    }

    /// Verwer (12, 17, 27).
    pub fn verwer() -> Self {
        preset(Self::w3(12.0, 17.0, 27.0))
    }
}

/// 三维预置掩膜
impl ChamferMask {
    /// 三维棋盘距离 (1, 1, 1).
    pub fn chessboard_3d() -> Self {
        preset(Self::w3_3d(1.0, 1.0, 1.0))
    }

    /// 三维城市街区距离 (1, 2, 3).
    pub fn city_block_3d() -> Self {
        preset(Self::w3_3d(1.0, 2.0, 3.0))
    }

    /// 三维准欧氏距离 (1, √2, √3). 整数权重按缺省规则取整为 (1, 1, 2).
    pub fn quasi_euclidean_3d() -> Self {
        preset(Self::w3_3d(1.0, SQRT_2, 3f64.sqrt()))
    }

    /// 三维 Borgefors (3, 4, 5).
    pub fn borgefors_3d() -> Self {
        preset(Self::w3_3d(3.0, 4.0, 5.0))
    }

    /// 三维 5×5×5 (3, 4, 5, 7).
    pub fn weights_3457_3d() -> Self {
        preset(Self::w4_3d(3.0, 4.0, 5.0, 7.0))
    }
}
