//! 前向/后向两遍扫描的倒角距离变换.
//!
//! 每个域内体素得到它到最近的域外体素 (二值模式) 或最近的不同标签体素
//! (标签模式) 的倒角距离. 域外体素恒为 0.
//!
//! 对凸域以及不含需要 "回头" 的最短路径的场景, 两遍扫描已经是精确的;
//! 一般情形下的测地传播见 [`crate::geodesic`].

use crate::error::ChamferResult;
use crate::mask::ChamferMask;
use crate::monitor::Monitor;
use crate::numeric::DistanceValue;
use crate::raster::{Grid, Raster, RasterMut};
use ndarray::{Array2, Array3, ArrayBase, Axis, Data, Ix2, Ix3};
use num::Zero;

mod scan;

pub(crate) use scan::Kernel;

/// 倒角距离变换.
///
/// ```
/// use chamfer_berry::{ChamferMask, DistanceTransform};
/// use ndarray::Array3;
///
/// let mut domain = Array3::<u8>::ones((5, 5, 5));
/// domain[(2, 2, 2)] = 0;
///
/// let mask = ChamferMask::borgefors_3d();
/// let map: Array3<f32> = DistanceTransform::new(&mask).distance_map(&domain).unwrap();
/// assert_eq!(map[(0, 0, 0)], 10.0);
/// ```
#[derive(Copy, Clone, Debug)]
pub struct DistanceTransform<'m> {
    mask: &'m ChamferMask,
    normalize: bool,
}

impl<'m> DistanceTransform<'m> {
    /// 使用 `mask` 的变换, 不归一化.
    #[inline]
    pub fn new(mask: &'m ChamferMask) -> Self {
        Self {
            mask,
            normalize: false,
        }
    }

    /// 结果是否除以掩膜的归一化权重, 即以正交像素为单位输出.
    #[inline]
    pub fn normalize(mut self, yes: bool) -> Self {
        self.normalize = yes;
        self
    }

    /// 使用的掩膜.
    #[inline]
    pub fn mask(&self) -> &'m ChamferMask {
        self.mask
    }

    /// 二值模式: 非零体素为域内, 零为背景.
    ///
    /// # 注意
    ///
    /// 二维栅格的结果深度为 1, 可用 [`distance_map`] 直接得到二维结果.
    pub fn distance_map<T, R>(&self, domain: &R) -> ChamferResult<Array3<T>>
    where
        T: DistanceValue,
        R: Raster + ?Sized,
        R::Elem: Zero,
    {
        self.distance_map_with(domain, &mut Monitor::silent())
    }

    /// 同 [`Self::distance_map`], 带进度与取消.
    pub fn distance_map_with<T, R>(&self, domain: &R, monitor: &mut Monitor) -> ChamferResult<Array3<T>>
    where
        T: DistanceValue,
        R: Raster + ?Sized,
        R::Elem: Zero,
    {
        self.run(domain, |v| !v.is_zero(), |_, q| !q.is_zero(), monitor)
    }

    /// 标签模式: 标签 0 为背景, 其他体素的距离量到最近的 **不同** 标签体素.
    pub fn label_distance_map<T, R>(&self, labels: &R) -> ChamferResult<Array3<T>>
    where
        T: DistanceValue,
        R: Raster + ?Sized,
        R::Elem: Zero + PartialEq,
    {
        self.label_distance_map_with(labels, &mut Monitor::silent())
    }

    /// 同 [`Self::label_distance_map`], 带进度与取消.
    pub fn label_distance_map_with<T, R>(
        &self,
        labels: &R,
        monitor: &mut Monitor,
    ) -> ChamferResult<Array3<T>>
    where
        T: DistanceValue,
        R: Raster + ?Sized,
        R::Elem: Zero + PartialEq,
    {
        self.run(labels, |v| !v.is_zero(), |p, q| p == q, monitor)
    }

    /// 原地变换: 非零体素被替换为它到最近零体素的距离.
    ///
    /// 取消时 `raster` 保持原样.
    pub fn transform_in_place<R>(&self, raster: &mut R, monitor: &mut Monitor) -> ChamferResult<()>
    where
        R: RasterMut + ?Sized,
        R::Elem: DistanceValue,
    {
        let zero = <R::Elem as DistanceValue>::ZERO;
        let map: Array3<R::Elem> = self.run(&*raster, |v| v != zero, |_, q| q != zero, monitor)?;
        for (pos, &v) in map.indexed_iter() {
            raster.set(pos, v);
        }
        Ok(())
    }

    /// 两遍扫描.
    ///
    /// `inside(v)`: 值为 `v` 的体素是否在域内;
    /// `same(p, q)`: 域内体素 `p` 能否从邻居 `q` 继承距离. 不能继承时,
    /// 邻居被视为距离为 0 的源.
    fn run<T, R, I, S>(&self, domain: &R, inside: I, same: S, monitor: &mut Monitor) -> ChamferResult<Array3<T>>
    where
        T: DistanceValue,
        R: Raster + ?Sized,
        I: Fn(R::Elem) -> bool,
        S: Fn(R::Elem, R::Elem) -> bool,
    {
        let grid = Grid::of(domain);
        grid.expect_dim(self.mask.dim())?;
        let kernel = Kernel::<T>::new(self.mask);

        let mut buf = Array3::from_shape_fn(grid.shape(), |p| {
            if inside(domain.at(p)) {
                T::UNREACHED
            } else {
                T::ZERO
            }
        });

        for backward in [false, true] {
            monitor.status(if backward { "Backward scan" } else { "Forward scan" });
            grid.sweep(backward, monitor, |pos| {
                let v = domain.at(pos);
                if !inside(v) {
                    return;
                }
                let best = kernel.relax(&grid, pos, buf[pos], backward, |q| {
                    Some(if same(v, domain.at(q)) { buf[q] } else { T::ZERO })
                });
                buf[pos] = best;
            })?;
        }
        let total = grid.progress_total();
        monitor.progress(total, total);

        let unreached = buf.iter().filter(|v| !v.is_reached()).count();
        log::debug!(
            "distance map {:?} done, {} cell(s) unreachable",
            grid.shape(),
            unreached
        );

        let by = self
            .normalize
            .then(|| T::weight_of(self.mask.normalization_offset()));
        buf.mapv_inplace(|v| v.finalize(by));
        Ok(buf)
    }
}

/// 深度为 1 的三维结果 -> 二维结果.
#[inline]
pub(crate) fn planar<T>(a: Array3<T>) -> Array2<T> {
    a.index_axis_move(Axis(0), 0)
}

/// 二维二值距离图. 非零像素为域内.
///
/// 掩膜必须是二维的, 否则返回 `Err(ChamferError::InvalidMask(..))`.
pub fn distance_map<T, S>(
    domain: &ArrayBase<S, Ix2>,
    mask: &ChamferMask,
    normalize: bool,
) -> ChamferResult<Array2<T>>
where
    T: DistanceValue,
    S: Data,
    S::Elem: Copy + Zero,
{
    DistanceTransform::new(mask)
        .normalize(normalize)
        .distance_map(domain)
        .map(planar)
}

/// 三维二值距离图. 非零体素为域内.
pub fn distance_map_3d<T, S>(
    domain: &ArrayBase<S, Ix3>,
    mask: &ChamferMask,
    normalize: bool,
) -> ChamferResult<Array3<T>>
where
    T: DistanceValue,
    S: Data,
    S::Elem: Copy + Zero,
{
    DistanceTransform::new(mask)
        .normalize(normalize)
        .distance_map(domain)
}

/// 二维标签距离图. 见 [`DistanceTransform::label_distance_map`].
pub fn label_distance_map<T, S>(
    labels: &ArrayBase<S, Ix2>,
    mask: &ChamferMask,
    normalize: bool,
) -> ChamferResult<Array2<T>>
where
    T: DistanceValue,
    S: Data,
    S::Elem: Copy + Zero + PartialEq,
{
    DistanceTransform::new(mask)
        .normalize(normalize)
        .label_distance_map(labels)
        .map(planar)
}

/// 三维标签距离图.
pub fn label_distance_map_3d<T, S>(
    labels: &ArrayBase<S, Ix3>,
    mask: &ChamferMask,
    normalize: bool,
) -> ChamferResult<Array3<T>>
where
    T: DistanceValue,
    S: Data,
    S::Elem: Copy + Zero + PartialEq,
{
    DistanceTransform::new(mask)
        .normalize(normalize)
        .label_distance_map(labels)
}
