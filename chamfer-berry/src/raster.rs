//! 栅格访问.
//!
//! 二维栅格被视为深度为 1 的三维栅格, 这样所有算法只需实现一次.

use crate::error::{ChamferError, ChamferResult, MaskError};
use crate::mask::{MaskDim, Offset};
use crate::monitor::Monitor;
use crate::Idx3d;
use either::Either;
use ndarray::{ArrayBase, Data, DataMut, Ix2, Ix3};
use std::iter::Rev;
use std::ops::Range;

/// 只读栅格.
pub trait Raster {
    /// 元素类型.
    type Elem: Copy;

    /// 形状 `(z, height, width)`. 二维栅格的 `z` 为 1.
    fn extent(&self) -> Idx3d;

    /// 读取 `pos` 处的值. 越界时 panic.
    fn at(&self, pos: Idx3d) -> Self::Elem;

    /// 栅格是否为二维?
    fn is_planar(&self) -> bool;

    /// 元素个数.
    #[inline]
    fn len(&self) -> usize {
        let (z, h, w) = self.extent();
        z * h * w
    }

    /// 是否不含任何元素?
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 可写栅格.
pub trait RasterMut: Raster {
    /// 写入 `pos` 处的值. 越界时 panic.
    fn set(&mut self, pos: Idx3d, value: Self::Elem);
}

impl<S> Raster for ArrayBase<S, Ix2>
where
    S: Data,
    S::Elem: Copy,
{
    type Elem = S::Elem;

    #[inline]
    fn extent(&self) -> Idx3d {
        let (h, w) = self.dim();
        (1, h, w)
    }

    #[inline]
    fn at(&self, (_, h, w): Idx3d) -> Self::Elem {
        self[(h, w)]
    }

    #[inline]
    fn is_planar(&self) -> bool {
        true
    }
}

impl<S> RasterMut for ArrayBase<S, Ix2>
where
    S: DataMut,
    S::Elem: Copy,
{
    #[inline]
    fn set(&mut self, (_, h, w): Idx3d, value: Self::Elem) {
        self[(h, w)] = value;
    }
}

impl<S> Raster for ArrayBase<S, Ix3>
where
    S: Data,
    S::Elem: Copy,
{
    type Elem = S::Elem;

    #[inline]
    fn extent(&self) -> Idx3d {
        self.dim()
    }

    #[inline]
    fn at(&self, pos: Idx3d) -> Self::Elem {
        self[pos]
    }

    #[inline]
    fn is_planar(&self) -> bool {
        false
    }
}

impl<S> RasterMut for ArrayBase<S, Ix3>
where
    S: DataMut,
    S::Elem: Copy,
{
    #[inline]
    fn set(&mut self, pos: Idx3d, value: Self::Elem) {
        self[pos] = value;
    }
}

/// 栅格几何: 越界检查、带偏移移动、行优先遍历.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Grid {
    shape: Idx3d,
    planar: bool,
}

impl Grid {
    /// 由栅格构建.
    #[inline]
    pub fn of<R: Raster + ?Sized>(raster: &R) -> Self {
        Self {
            shape: raster.extent(),
            planar: raster.is_planar(),
        }
    }

    /// 形状.
    #[inline]
    pub fn shape(&self) -> Idx3d {
        self.shape
    }

    /// 检查 `other` 是否与自身形状一致.
    pub fn expect_same<R: Raster + ?Sized>(&self, other: &R) -> ChamferResult<()> {
        match other.extent() {
            found if found == self.shape => Ok(()),
            found => Err(ChamferError::ShapeMismatch {
                expected: self.shape,
                found,
            }),
        }
    }

    /// 检查掩膜维度与栅格维度一致.
    pub fn expect_dim(&self, dim: MaskDim) -> ChamferResult<()> {
        match (self.planar, dim) {
            (true, MaskDim::Two) | (false, MaskDim::Three) => Ok(()),
            _ => Err(MaskError::WrongDimension(dim).into()),
        }
    }

    /// `pos` 是否在栅格内?
    #[inline]
    pub fn contains(&self, (z, h, w): Idx3d) -> bool {
        let (zn, hn, wn) = self.shape;
        z < zn && h < hn && w < wn
    }

    /// `pos + offset`. 越界时返回 `None`.
    #[inline]
    pub fn shift(&self, (z, h, w): Idx3d, o: Offset) -> Option<Idx3d> {
        let (zn, hn, wn) = self.shape;
        let z = z.checked_add_signed(o.dz).filter(|&v| v < zn)?;
        let h = h.checked_add_signed(o.dh).filter(|&v| v < hn)?;
        let w = w.checked_add_signed(o.dw).filter(|&v| v < wn)?;
        Some((z, h, w))
    }

    /// 进度汇报的单位总数: 二维按行, 三维按层.
    #[inline]
    pub fn progress_total(&self) -> usize {
        let (z, h, _) = self.shape;
        if self.planar {
            h
        } else {
            z
        }
    }

    /// 行 `(z, h)` 完成后的进度值. 若该行不是汇报点则返回 `None`.
    #[inline]
    pub fn progress_after_row(&self, (z, h): (usize, usize), backward: bool) -> Option<usize> {
        let (zn, hn, _) = self.shape;
        match (self.planar, backward) {
            (true, false) => Some(h + 1),
            (true, true) => Some(hn - h),
            (false, false) => (h + 1 == hn).then_some(z + 1),
            (false, true) => (h == 0).then_some(zn - z),
        }
    }

    /// 按光栅顺序 (或其逆序) 遍历全部行 `(z, h)`.
    pub fn rows(&self, backward: bool) -> impl Iterator<Item = (usize, usize)> {
        let (zn, hn, _) = self.shape;
        axis(zn, backward).flat_map(move |z| axis(hn, backward).map(move |h| (z, h)))
    }

    /// 按光栅顺序遍历全部位置.
    pub fn positions(&self) -> impl Iterator<Item = Idx3d> {
        let wn = self.shape.2;
        self.rows(false)
            .flat_map(move |(z, h)| (0..wn).map(move |w| (z, h, w)))
    }

    /// 一行之内的列顺序.
    #[inline]
    pub fn cols(&self, backward: bool) -> Either<Range<usize>, Rev<Range<usize>>> {
        axis(self.shape.2, backward)
    }

    /// 一次完整的光栅扫描. 对每个体素调用 `visit`; 每行结束后检查取消信号,
    /// 并在行/层结束时汇报进度.
    pub fn sweep<F>(&self, backward: bool, monitor: &mut Monitor, mut visit: F) -> ChamferResult<()>
    where
        F: FnMut(Idx3d),
    {
        let total = self.progress_total();
        for (z, h) in self.rows(backward) {
            for w in self.cols(backward) {
                visit((z, h, w));
            }
            if let Some(current) = self.progress_after_row((z, h), backward) {
                monitor.progress(current, total);
            }
            monitor.checkpoint()?;
        }
        Ok(())
    }
}

/// `0..n` 或其逆序.
#[inline]
fn axis(n: usize, backward: bool) -> Either<Range<usize>, Rev<Range<usize>>> {
    if backward {
        Either::Right((0..n).rev())
    } else {
        Either::Left(0..n)
    }
}
