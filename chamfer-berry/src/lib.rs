#![warn(missing_docs)] // <= 合适时移除它.
// #![warn(clippy::missing_docs_in_private_items)]  // <= too strict.

//! 核心库. 在二维/三维栅格上计算倒角距离图 (chamfer distance map)
//! 与测地距离图 (geodesic distance map).
//!
//! 该 crate 目前仅提供 `safe` 接口, 且所有算法都是单线程、同步执行的.
//!
//! # 注意
//!
//! 1. 所有栅格均按 "行优先" 访问. 二维索引为 `(height, width)`,
//!   三维索引为 `(z, height, width)`. 二维栅格在内部被视为深度为 1 的三维栅格.
//! 2. 整数距离在超出表示范围时饱和到类型最大值 (即 "不可达"), 而不会回绕.
//!   需要精确大距离的调用者应使用浮点模式.
//!
//! # 模块一览
//!
//! ### 倒角掩膜 ✅
//!
//! 带权局部偏移集合, 以及前向/后向两半的划分. 提供常用掩膜及按名称查询的注册表.
//!
//! 实现位于 `chamfer-berry/src/mask`.
//!
//! ### 前向/后向两遍扫描距离变换 ✅
//!
//! 计算每个前景像素到最近背景像素 (或不同标签像素) 的倒角距离.
//!
//! 实现位于 `chamfer-berry/src/transform`.
//!
//! ### 混合测地距离传播 ✅
//!
//! 先做一次前向 + 后向扫描得到近似值, 再用优先队列修正扫描顺序无法覆盖的路径.
//! 支持按标签隔离传播.
//!
//! 实现位于 `chamfer-berry/src/geodesic`.
//!
//! ### 数值策略 ✅
//!
//! 整数 (饱和) 与浮点 (`NaN` 哨兵) 两种距离表示, 以及权重取整策略.
//!
//! 实现位于 `chamfer-berry/src/numeric.rs`.
//!
//! # 示例
//!
//! ```
//! use chamfer_berry::prelude::*;
//! use ndarray::Array2;
//!
//! let mut domain = Array2::<u8>::from_elem((9, 9), 1);
//! domain[(4, 4)] = 0;
//!
//! let mask = ChamferMask::borgefors();
//! let map: Array2<u16> = distance_map(&domain, &mask, false).unwrap();
//! assert_eq!(map[(0, 0)], 16);
//! assert_eq!(map[(4, 4)], 0);
//! ```

/// 二维索引 `(height, width)`.
pub type Idx2d = (usize, usize);

/// 三维索引 `(z, height, width)`.
pub type Idx3d = (usize, usize, usize);

pub mod consts;
mod error;
pub mod geodesic;
pub mod mask;
mod monitor;
pub mod numeric;
pub mod prelude;
mod raster;
pub mod transform;

#[cfg(test)]
mod test_utils;

pub use error::{ChamferError, ChamferResult, MaskError};
pub use geodesic::{
    geodesic_distance_map, geodesic_distance_map_3d, GeodesicTransform, PropagationStats, Seeds,
    Strategy,
};
pub use mask::{ChamferMask, MaskDim, Offset, WeightedOffset};
pub use monitor::Monitor;
pub use numeric::{DistanceValue, WeightRounding};
pub use raster::{Raster, RasterMut};
pub use transform::{
    distance_map, distance_map_3d, label_distance_map, label_distance_map_3d, DistanceTransform,
};

cfg_if::cfg_if! {
    if #[cfg(feature = "serde")] {
        mod persist;

        pub use persist::DecodeMaskError;
    }
}
