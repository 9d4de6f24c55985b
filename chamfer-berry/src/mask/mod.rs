//! 倒角掩膜: 对称的带权局部偏移集合.
//!
//! 掩膜在构建时被划分为两半:
//!
//! - 前向 (forward): 在光栅扫描顺序中位于原点 **之前** 的偏移, 即 `(dz, dh, dw)`
//!   按字典序小于 `(0, 0, 0)`;
//! - 后向 (backward): 前向一半关于原点的点对称, 即 `backward[i] == -forward[i]`.
//!
//! 前向扫描只读取前向偏移处的邻居, 后向扫描只读取后向偏移处的邻居,
//! 这样每次扫描读到的邻居都已经在本轮被处理过.
//!
//! 掩膜创建后不可变, 可以在多次变换之间共享.

use crate::error::MaskError;
use crate::numeric::WeightRounding;
use itertools::{iproduct, Itertools};
use std::ops::Neg;

mod presets;
pub mod registry;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 掩膜维度.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MaskDim {
    /// 二维掩膜, 所有偏移的 `dz` 均为 0.
    Two,

    /// 三维掩膜.
    Three,
}

/// 有符号整数偏移 `(dz, dh, dw)`. 二维偏移的 `dz` 恒为 0.
///
/// 派生的 `Ord` 即光栅扫描顺序 (z 优先, 然后 height, 最后 width).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Offset {
    /// 层间方向.
    pub dz: isize,
    /// 垂直方向.
    pub dh: isize,
    /// 水平方向.
    pub dw: isize,
}

impl Offset {
    /// 零偏移.
    pub const ZERO: Offset = Offset::new(0, 0, 0);

    /// 创建三维偏移.
    #[inline]
    pub const fn new(dz: isize, dh: isize, dw: isize) -> Self {
        Self { dz, dh, dw }
    }

    /// 创建二维偏移 `(dh, dw)`.
    #[inline]
    pub const fn new_2d(dh: isize, dw: isize) -> Self {
        Self { dz: 0, dh, dw }
    }

    /// 是否为零偏移?
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.dz == 0 && self.dh == 0 && self.dw == 0
    }

    /// 是否位于前向一半, 即在光栅扫描顺序中先于原点?
    #[inline]
    pub fn is_forward(&self) -> bool {
        *self < Self::ZERO
    }

    /// Chebyshev 范数.
    #[inline]
    pub fn chebyshev(&self) -> usize {
        self.dz
            .unsigned_abs()
            .max(self.dh.unsigned_abs())
            .max(self.dw.unsigned_abs())
    }

    /// 欧氏范数的平方.
    #[inline]
    pub fn norm_squared(&self) -> usize {
        [self.dz, self.dh, self.dw]
            .iter()
            .map(|d| d.unsigned_abs().pow(2))
            .sum()
    }
}

impl Neg for Offset {
    type Output = Offset;

    #[inline]
    fn neg(self) -> Self::Output {
        Self::new(-self.dz, -self.dh, -self.dw)
    }
}

/// 带权偏移. 同时保存实数权重 (浮点模式使用) 和取整后的整数权重 (整数模式使用).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WeightedOffset {
    offset: Offset,
    weight: f64,
    int_weight: u32,
}

impl WeightedOffset {
    /// 以 `rounding` 规则从实数权重导出整数权重.
    #[inline]
    pub fn new(offset: Offset, weight: f64, rounding: WeightRounding) -> Self {
        Self {
            offset,
            weight,
            int_weight: rounding.to_int_weight(weight),
        }
    }

    /// 偏移.
    #[inline]
    pub fn offset(&self) -> Offset {
        self.offset
    }

    /// 实数权重.
    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// 整数权重.
    #[inline]
    pub fn int_weight(&self) -> u32 {
        self.int_weight
    }
}

impl Neg for WeightedOffset {
    type Output = WeightedOffset;

    #[inline]
    fn neg(self) -> Self::Output {
        Self {
            offset: -self.offset,
            ..self
        }
    }
}

/// 倒角掩膜.
///
/// 常用掩膜见 [`ChamferMask::borgefors`] 等预置构造函数, 或通过
/// [`registry::mask_by_name`] 按名称获取.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChamferMask {
    dim: MaskDim,
    rounding: WeightRounding,
    /// 按光栅顺序排列.
    forward: Vec<WeightedOffset>,
    /// `backward[i] == -forward[i]`.
    backward: Vec<WeightedOffset>,
}

/// 构建与校验
impl ChamferMask {
    /// 由完整的 (对称的) 带权偏移集合构建掩膜. 整数权重按缺省规则取整.
    ///
    /// # 返回值
    ///
    /// 偏移集合为空、含零偏移、含重复偏移、权重非正、不对称、
    /// 权重不随长度单调、缺少坐标轴单位偏移时, 返回相应的 `Err(MaskError)`.
    pub fn new<I>(dim: MaskDim, offsets: I) -> Result<Self, MaskError>
    where
        I: IntoIterator<Item = (Offset, f64)>,
    {
        let all: Vec<(Offset, f64)> = offsets.into_iter().collect();
        check_offsets(dim, &all)?;

        for &(o, w) in all.iter() {
            // 必须存在点对称、且权重完全相同的偏移.
            if !all.iter().any(|&(p, v)| p == -o && v == w) {
                return Err(MaskError::Asymmetric(o));
            }
        }
        let forward = all.into_iter().filter(|(o, _)| o.is_forward());
        Self::assemble(dim, WeightRounding::default(), forward)
    }

    /// 只由前向一半构建掩膜, 后向一半按点对称自动生成.
    ///
    /// 若某个偏移不在前向一半, 返回 `Err(MaskError::NotForward)`.
    pub fn from_forward<I>(dim: MaskDim, offsets: I) -> Result<Self, MaskError>
    where
        I: IntoIterator<Item = (Offset, f64)>,
    {
        Self::from_forward_with(dim, WeightRounding::default(), offsets)
    }

    /// 同 [`Self::from_forward`], 使用指定的取整规则.
    pub(crate) fn from_forward_with<I>(
        dim: MaskDim,
        rounding: WeightRounding,
        offsets: I,
    ) -> Result<Self, MaskError>
    where
        I: IntoIterator<Item = (Offset, f64)>,
    {
        let half: Vec<(Offset, f64)> = offsets.into_iter().collect();
        check_offsets(dim, &half)?;
        if let Some(&(o, _)) = half.iter().find(|(o, _)| !o.is_forward()) {
            return Err(MaskError::NotForward(o));
        }
        Self::assemble(dim, rounding, half)
    }

    /// 以 `rounding` 重新导出整数权重, 得到新的掩膜. 实数权重保持不变.
    ///
    /// 取整后整数权重为 0 或不再单调时返回 `Err`.
    pub fn with_rounding(&self, rounding: WeightRounding) -> Result<Self, MaskError> {
        let forward = self.forward.iter().map(|w| (w.offset, w.weight));
        Self::assemble(self.dim, rounding, forward)
    }

    /// 在以原点为中心、Chebyshev 半径为 `radius` 的邻域内枚举前向偏移,
    /// 由 `classify` 决定每个偏移的权重; 返回 `None` 的偏移不属于掩膜.
    pub fn from_forward_fn<F>(dim: MaskDim, radius: usize, classify: F) -> Result<Self, MaskError>
    where
        F: Fn(Offset) -> Option<f64>,
    {
        let r = radius as isize;
        let z_range = match dim {
            MaskDim::Two => 0..=0,
            MaskDim::Three => -r..=r,
        };
        let half = iproduct!(z_range, -r..=r, -r..=r)
            .map(|(dz, dh, dw)| Offset::new(dz, dh, dw))
            .filter(Offset::is_forward)
            .filter_map(|o| classify(o).map(|w| (o, w)));
        Self::from_forward(dim, half)
    }

    /// 组装并执行与构建方式无关的校验.
    fn assemble<I>(dim: MaskDim, rounding: WeightRounding, forward: I) -> Result<Self, MaskError>
    where
        I: IntoIterator<Item = (Offset, f64)>,
    {
        let forward: Vec<WeightedOffset> = forward
            .into_iter()
            .sorted_by_key(|(o, _)| *o)
            .map(|(o, w)| WeightedOffset::new(o, w, rounding))
            .collect();

        if let Some(w) = forward.iter().find(|w| w.int_weight == 0) {
            return Err(MaskError::NonPositiveWeight(w.offset));
        }

        // 更长的偏移不能更 "便宜", 否则先走正交方向再走对角方向会出现负增量.
        for (a, b) in forward.iter().tuple_combinations() {
            let (long, short) = match a.offset.norm_squared().cmp(&b.offset.norm_squared()) {
                std::cmp::Ordering::Greater => (a, b),
                std::cmp::Ordering::Less => (b, a),
                std::cmp::Ordering::Equal => continue,
            };
            if long.weight < short.weight || long.int_weight < short.int_weight {
                return Err(MaskError::NotMonotonic(long.offset, short.offset));
            }
        }

        let units: &[Offset] = match dim {
            MaskDim::Two => &[Offset::new_2d(0, -1), Offset::new_2d(-1, 0)],
            MaskDim::Three => &[
                Offset::new(0, 0, -1),
                Offset::new(0, -1, 0),
                Offset::new(-1, 0, 0),
            ],
        };
        if let Some(&u) = units.iter().find(|u| forward.iter().all(|w| w.offset != **u)) {
            return Err(MaskError::MissingUnitOffset(u));
        }

        let backward = forward.iter().map(|w| -*w).collect();
        Ok(Self {
            dim,
            rounding,
            forward,
            backward,
        })
    }
}

/// 与构建方式无关的逐偏移校验: 非空, 维度, 零偏移, 重复, 实数权重为正.
fn check_offsets(dim: MaskDim, offsets: &[(Offset, f64)]) -> Result<(), MaskError> {
    if offsets.is_empty() {
        return Err(MaskError::Empty);
    }
    for (i, &(o, w)) in offsets.iter().enumerate() {
        if o.is_zero() {
            return Err(MaskError::ZeroOffset);
        }
        if dim == MaskDim::Two && o.dz != 0 {
            return Err(MaskError::WrongDimension(dim));
        }
        if !(w.is_finite() && w > 0.0) {
            return Err(MaskError::NonPositiveWeight(o));
        }
        if offsets[..i].iter().any(|(p, _)| *p == o) {
            return Err(MaskError::DuplicateOffset(o));
        }
    }
    Ok(())
}

/// 查询方法集合
impl ChamferMask {
    /// 掩膜维度.
    #[inline]
    pub fn dim(&self) -> MaskDim {
        self.dim
    }

    /// 整数权重的取整规则.
    #[inline]
    pub fn rounding(&self) -> WeightRounding {
        self.rounding
    }

    /// 前向一半 (光栅顺序中位于原点之前的偏移).
    #[inline]
    pub fn forward_offsets(&self) -> &[WeightedOffset] {
        &self.forward
    }

    /// 后向一半, 与前向一半逐项点对称.
    #[inline]
    pub fn backward_offsets(&self) -> &[WeightedOffset] {
        &self.backward
    }

    /// 所有偏移, 先前向后后向.
    #[inline]
    pub fn offsets(&self) -> impl Iterator<Item = &WeightedOffset> + '_ {
        self.forward.iter().chain(self.backward.iter())
    }

    /// 偏移总数.
    #[inline]
    pub fn len(&self) -> usize {
        self.forward.len() * 2
    }

    /// 掩膜是否为空? 合法掩膜永远不为空.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// 查找偏移. 不是掩膜中的邻居时返回 `Err(MaskError::UnknownOffset)`.
    pub fn find(&self, offset: Offset) -> Result<&WeightedOffset, MaskError> {
        self.offsets()
            .find(|w| w.offset == offset)
            .ok_or(MaskError::UnknownOffset(offset))
    }

    /// 偏移的实数权重.
    #[inline]
    pub fn weight(&self, offset: Offset) -> Result<f64, MaskError> {
        self.find(offset).map(WeightedOffset::weight)
    }

    /// 偏移的整数权重.
    #[inline]
    pub fn int_weight(&self, offset: Offset) -> Result<u32, MaskError> {
        self.find(offset).map(WeightedOffset::int_weight)
    }

    /// 水平方向单位偏移. 校验保证它存在.
    #[inline]
    pub fn normalization_offset(&self) -> &WeightedOffset {
        let unit = Offset::new_2d(0, -1);
        // 构建时已检查单位偏移, 不会越过末尾.
        self.forward
            .iter()
            .find(|w| w.offset == unit)
            .unwrap_or(&self.forward[0])
    }

    /// 归一化权重, 即正交单位偏移的实数权重. 调用者用它把距离值换算成像素半径,
    /// 见 [`Self::radius_threshold`].
    #[inline]
    pub fn normalization_weight(&self) -> f64 {
        self.normalization_offset().weight
    }

    /// 半径为 `radius` 像素的距离阈值 `(radius + 0.5) * normalization_weight()`.
    #[inline]
    pub fn radius_threshold(&self, radius: f64) -> f64 {
        (radius + 0.5) * self.normalization_weight()
    }

    /// 邻域的 Chebyshev 半径. 1 对应 3×3 (×3), 2 对应 5×5 (×5).
    #[inline]
    pub fn neighborhood_radius(&self) -> usize {
        self.forward
            .iter()
            .map(|w| w.offset.chebyshev())
            .max()
            .unwrap_or(0)
    }
}
