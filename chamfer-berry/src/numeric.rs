//! 数值策略: 整数 (定点、饱和) 与浮点两种距离表示, 以及实数权重的取整规则.
//!
//! | 类型 | 尚未到达 (传播中) | 不可达 (最终结果) | 归一化 |
//! |------|-------------------|-------------------|--------|
//! | `u16`, `u32` | `MAX` | `MAX` | 四舍五入 (远离零) |
//! | `f32`, `f64` | `MAX` | `NaN` | 直接相除 |

use crate::mask::WeightedOffset;
use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::fmt::Debug;

/// 实数权重转换为整数权重的取整规则.
///
/// 不同掩膜族对 `√2`, `√3` 一类权重的整数化历来并不统一
/// (例如 `√2` 既可能取 1 也可能取 2), 因此这里把它做成可配置的策略,
/// 并用特征测试固定下来. 缺省为四舍五入 (远离零).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeightRounding {
    /// 四舍五入, `0.5` 远离零. `√2 -> 1`, `√3 -> 2`.
    #[default]
    HalfAwayFromZero,

    /// 向上取整. `√2 -> 2`, `√3 -> 2`.
    Up,

    /// 向下取整. `√2 -> 1`, `√3 -> 1`.
    Down,
}

impl WeightRounding {
    /// 按该规则取整. 非有限值或非正值原样返回, 由掩膜校验负责拒绝.
    #[inline]
    pub fn apply(self, weight: f64) -> f64 {
        match self {
            Self::HalfAwayFromZero => weight.round(),
            Self::Up => weight.ceil(),
            Self::Down => weight.floor(),
        }
    }

    /// 取整并转换为整数权重. 超出 `u32` 范围时饱和; 非有限值得到 0.
    #[inline]
    pub fn to_int_weight(self, weight: f64) -> u32 {
        let w = self.apply(weight);
        if !w.is_finite() || w <= 0.0 {
            0
        } else {
            num::cast::<f64, u32>(w).unwrap_or(u32::MAX)
        }
    }
}

/// 距离缓冲区的元素类型.
///
/// 整数实现使用掩膜的整数权重, 加法饱和于 `MAX`; 浮点实现使用掩膜的实数权重.
/// "尚未到达" 在两类实现中都用 `MAX` 表示, 因此它总是大于任何可达距离,
/// 松弛时只需比较大小.
pub trait DistanceValue: Copy + PartialOrd + Debug + 'static {
    /// 零距离.
    const ZERO: Self;

    /// 传播过程中 "尚未到达" 的工作值.
    const UNREACHED: Self;

    /// 最终结果中 "不可达" 的哨兵值.
    const UNREACHABLE: Self;

    /// 取出该类型对应的偏移权重.
    fn weight_of(offset: &WeightedOffset) -> Self;

    /// 沿一条带权偏移前进一步. 整数饱和, 不会回绕.
    fn step(self, weight: Self) -> Self;

    /// 是否已到达 (即不是 "尚未到达", 也不是 `NaN`).
    fn is_reached(self) -> bool;

    /// 除以归一化权重. 未到达的值原样返回.
    fn normalized(self, by: Self) -> Self;

    /// 全序比较, 用于优先队列.
    fn cmp_distance(&self, other: &Self) -> Ordering;

    /// 转换为 `f64`, 便于统计和展示.
    fn to_f64(self) -> f64;

    /// 将传播结束后的工作值转换为最终输出值.
    #[inline]
    fn finalize(self, normalize_by: Option<Self>) -> Self {
        match (self.is_reached(), normalize_by) {
            (false, _) => Self::UNREACHABLE,
            (true, Some(n)) => self.normalized(n),
            (true, None) => self,
        }
    }
}

/// 整数距离类型的实现.
macro_rules! impl_integer_distance {
    ($($t: ty),*) => {$(
        impl DistanceValue for $t {
            const ZERO: Self = 0;
            const UNREACHED: Self = <$t>::MAX;
            const UNREACHABLE: Self = <$t>::MAX;

            #[inline]
            fn weight_of(offset: &WeightedOffset) -> Self {
                num::cast(offset.int_weight()).unwrap_or(<$t>::MAX)
            }

            #[inline]
            fn step(self, weight: Self) -> Self {
                self.saturating_add(weight)
            }

            #[inline]
            fn is_reached(self) -> bool {
                self < Self::UNREACHED
            }

            fn normalized(self, by: Self) -> Self {
                if !self.is_reached() || by == 0 {
                    return self;
                }
                let (q, r) = (self / by, self % by);
                // r * 2 >= by, 写成减法避免溢出.
                if r >= by - r {
                    q + 1
                } else {
                    q
                }
            }

            #[inline]
            fn cmp_distance(&self, other: &Self) -> Ordering {
                self.cmp(other)
            }

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    )*};
}

/// 浮点距离类型的实现.
macro_rules! impl_float_distance {
    ($($t: ty),*) => {$(
        impl DistanceValue for $t {
            const ZERO: Self = 0.0;
            const UNREACHED: Self = <$t>::MAX;
            const UNREACHABLE: Self = <$t>::NAN;

            #[inline]
            fn weight_of(offset: &WeightedOffset) -> Self {
                offset.weight() as $t
            }

            #[inline]
            fn step(self, weight: Self) -> Self {
                (self + weight).min(Self::UNREACHED)
            }

            #[inline]
            fn is_reached(self) -> bool {
                self < Self::UNREACHED
            }

            #[inline]
            fn normalized(self, by: Self) -> Self {
                if self.is_reached() {
                    self / by
                } else {
                    self
                }
            }

            #[inline]
            fn cmp_distance(&self, other: &Self) -> Ordering {
                OrderedFloat(*self).cmp(&OrderedFloat(*other))
            }

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    )*};
}

impl_integer_distance!(u16, u32);
impl_float_distance!(f32, f64);

#[cfg(test)]
mod tests {
    use super::{DistanceValue, WeightRounding};
    use std::cmp::Ordering;

    #[test]
    fn test_rounding_policies() {
        let sqrt_2 = 2f64.sqrt();
        let sqrt_3 = 3f64.sqrt();
        assert_eq!(WeightRounding::HalfAwayFromZero.to_int_weight(sqrt_2), 1);
        assert_eq!(WeightRounding::HalfAwayFromZero.to_int_weight(sqrt_3), 2);
        assert_eq!(WeightRounding::HalfAwayFromZero.to_int_weight(2.5), 3);
        assert_eq!(WeightRounding::Up.to_int_weight(sqrt_2), 2);
        assert_eq!(WeightRounding::Down.to_int_weight(sqrt_3), 1);
        assert_eq!(WeightRounding::Down.to_int_weight(0.5), 0);
        assert_eq!(WeightRounding::Up.to_int_weight(f64::NAN), 0);
        assert_eq!(WeightRounding::Up.to_int_weight(1e20), u32::MAX);
    }

    #[test]
    fn test_integer_saturation() {
        assert_eq!(u16::MAX.step(3), u16::MAX);
        assert_eq!((u16::MAX - 1).step(3), u16::MAX);
        assert!(!(u16::MAX - 1).step(3).is_reached());
        assert_eq!(7u32.step(4), 11);
    }

    #[test]
    fn test_integer_normalization_rounds_half_away() {
        assert_eq!(16u16.normalized(3), 5);
        assert_eq!(17u16.normalized(3), 6);
        assert_eq!(15u16.normalized(2), 8);
        assert_eq!(14u16.normalized(4), 4);
        assert_eq!(u16::MAX.normalized(3), u16::MAX);
    }

    #[test]
    fn test_float_sentinels() {
        assert!(!f32::UNREACHED.is_reached());
        assert!(!f32::NAN.is_reached());
        assert!(f32::UNREACHABLE.is_nan());
        assert_eq!(f32::UNREACHED.step(4.0), f32::UNREACHED);
        assert_eq!(1.5f64.finalize(Some(3.0)), 0.5);
        assert!(f64::UNREACHED.finalize(Some(3.0)).is_nan());
        assert_eq!(u16::UNREACHED.finalize(None), u16::MAX);
    }

    #[test]
    fn test_cmp_distance() {
        assert_eq!(1.0f32.cmp_distance(&2.0), Ordering::Less);
        assert_eq!(f64::NAN.cmp_distance(&f64::MAX), Ordering::Greater);
        assert_eq!(3u16.cmp_distance(&3), Ordering::Equal);
    }
}
