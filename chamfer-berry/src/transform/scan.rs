//! 掩膜在某个数值类型下的展开形式, 以及单个体素的松弛.

use crate::mask::{ChamferMask, Offset};
use crate::numeric::DistanceValue;
use crate::raster::Grid;
use crate::Idx3d;

/// 预先换算好权重的掩膜两半.
#[derive(Clone, Debug)]
pub(crate) struct Kernel<T> {
    forward: Vec<(Offset, T)>,
    backward: Vec<(Offset, T)>,
}

impl<T: DistanceValue> Kernel<T> {
    pub fn new(mask: &ChamferMask) -> Self {
        let expand = |half: &[crate::mask::WeightedOffset]| {
            half.iter()
                .map(|w| (w.offset(), T::weight_of(w)))
                .collect::<Vec<_>>()
        };
        Self {
            forward: expand(mask.forward_offsets()),
            backward: expand(mask.backward_offsets()),
        }
    }

    /// 前向或后向一半.
    #[inline]
    pub fn half(&self, backward: bool) -> &[(Offset, T)] {
        if backward {
            &self.backward
        } else {
            &self.forward
        }
    }

    /// 全部偏移.
    #[inline]
    pub fn all(&self) -> impl Iterator<Item = &(Offset, T)> {
        self.forward.iter().chain(self.backward.iter())
    }

    /// 以一半偏移松弛 `pos`: `min(current, base(q) + w)`.
    ///
    /// `base` 给出邻居 `q` 可供传播的距离, 返回 `None` 表示该邻居不参与传播.
    /// 越界邻居与尚未到达的邻居都被跳过.
    #[inline]
    pub fn relax<F>(&self, grid: &Grid, pos: Idx3d, current: T, backward: bool, mut base: F) -> T
    where
        F: FnMut(Idx3d) -> Option<T>,
    {
        self.half(backward)
            .iter()
            .fold(current, |best, &(o, w)| match grid.shift(pos, o).and_then(&mut base) {
                Some(b) if b.is_reached() => {
                    let candidate = b.step(w);
                    if candidate < best {
                        candidate
                    } else {
                        best
                    }
                }
                _ => best,
            })
    }
}
