//! 运行时错误.

use crate::mask::{MaskDim, Offset};
use crate::Idx3d;
use std::fmt::{self, Formatter};

/// 构建倒角掩膜时的错误. 掩膜只在构建时校验一次, 传播过程中不会产生该错误.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MaskError {
    /// 偏移集合为空.
    Empty,

    /// 出现了零偏移 `(0, 0, 0)`.
    ZeroOffset,

    /// 同一偏移出现了多次.
    DuplicateOffset(Offset),

    /// 权重不是正的有限值 (实数权重或取整后的整数权重).
    NonPositiveWeight(Offset),

    /// 找不到与该偏移点对称、且权重相同的偏移.
    Asymmetric(Offset),

    /// 在 "仅给出前向一半" 的构建方式下, 该偏移并不位于前向一半.
    NotForward(Offset),

    /// 权重没有随欧氏长度单调不减. 第一个偏移更长, 但权重比第二个偏移更小.
    NotMonotonic(Offset, Offset),

    /// 缺少某个坐标轴方向的单位偏移, 无法确定归一化权重.
    MissingUnitOffset(Offset),

    /// 查询的偏移不是掩膜中定义的邻居.
    UnknownOffset(Offset),

    /// 偏移的维度与掩膜声明的维度不符 (例如二维掩膜中 `dz != 0`),
    /// 或掩膜维度与栅格维度不符.
    WrongDimension(MaskDim),
}

impl fmt::Display for MaskError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty offset set"),
            Self::ZeroOffset => write!(f, "zero offset is not a neighbour"),
            Self::DuplicateOffset(o) => write!(f, "duplicated offset {o:?}"),
            Self::NonPositiveWeight(o) => write!(f, "offset {o:?} has a non-positive weight"),
            Self::Asymmetric(o) => write!(f, "offset {o:?} has no symmetric counterpart"),
            Self::NotForward(o) => write!(f, "offset {o:?} is not in the forward half"),
            Self::NotMonotonic(a, b) => {
                write!(f, "offset {a:?} is longer than {b:?} but weighs less")
            }
            Self::MissingUnitOffset(o) => write!(f, "missing axis unit offset {o:?}"),
            Self::UnknownOffset(o) => write!(f, "offset {o:?} is not a neighbour of the mask"),
            Self::WrongDimension(d) => write!(f, "dimension mismatch, mask is {d:?}"),
        }
    }
}

impl std::error::Error for MaskError {}

/// 距离变换运行时错误.
#[derive(Clone, Debug, PartialEq)]
pub enum ChamferError {
    /// 掩膜非法.
    InvalidMask(MaskError),

    /// 域、标签、标记栅格的形状不一致. 在分配任何缓冲区之前检查.
    ShapeMismatch {
        /// 域栅格的形状.
        expected: Idx3d,
        /// 实际遇到的形状.
        found: Idx3d,
    },

    /// 外部取消信号要求停止. 此时不返回任何部分结果.
    Cancelled,
}

impl fmt::Display for ChamferError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMask(e) => write!(f, "invalid chamfer mask: {e}"),
            Self::ShapeMismatch { expected, found } => {
                write!(f, "shape mismatch: expected {expected:?}, found {found:?}")
            }
            Self::Cancelled => write!(f, "computation cancelled"),
        }
    }
}

impl std::error::Error for ChamferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidMask(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MaskError> for ChamferError {
    #[inline]
    fn from(value: MaskError) -> Self {
        Self::InvalidMask(value)
    }
}

/// 距离变换运行时结果.
pub type ChamferResult<T> = Result<T, ChamferError>;
