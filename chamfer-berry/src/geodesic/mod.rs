//! 测地距离: 只经过域内体素的最短带权路径长度, 从标记集合出发.
//!
//! # 策略
//!
//! - [`Strategy::Hybrid`] (缺省): 一次前向 + 后向扫描得到近似值, 然后把所有仍然违反
//!   三角不等式的体素放入优先队列, 做类 Dijkstra 的修正. 对非凸域、多连通域、
//!   标签隔离都是精确的.
//! - [`Strategy::RasterOnly`]: 只做一次前向 + 后向扫描. 路径需要 "回头" 时结果偏大,
//!   甚至不可达. 用于对比.
//! - [`Strategy::Iterative`]: 反复扫描直到稳定, 经典的非混合算法. 用于对比.
//!
//! # 哨兵
//!
//! 域外体素与无法从任何标记到达的域内体素都是 "不可达":
//! 整数为 `MAX`, 浮点为 `NaN`.

use crate::consts::DEFAULT_MAX_ROUNDS;
use crate::error::{ChamferError, ChamferResult};
use crate::mask::ChamferMask;
use crate::monitor::Monitor;
use crate::numeric::DistanceValue;
use crate::raster::{Grid, Raster};
use crate::transform::{planar, Kernel};
use crate::Idx3d;
use either::Either;
use ndarray::{Array2, Array3, ArrayBase, Data, Ix2, Ix3};
use num::Zero;

mod queue;

/// 传播策略.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Strategy {
    /// 扫描 + 优先队列修正.
    #[default]
    Hybrid,

    /// 仅一次前向 + 后向扫描, 结果是近似的.
    RasterOnly,

    /// 反复前向 + 后向扫描, 直到没有体素变化或达到 `max_rounds` 轮.
    Iterative {
        /// 最大轮数. 0 按 1 处理.
        max_rounds: usize,
    },
}

impl Strategy {
    /// 使用缺省轮数上限的 [`Strategy::Iterative`].
    #[inline]
    pub fn iterative() -> Self {
        Self::Iterative {
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

/// 标记 (种子) 集合.
#[derive(Debug)]
pub enum Seeds<'s, M: ?Sized = Array3<u8>> {
    /// 与域同形状的栅格, 非零体素为标记.
    Raster(&'s M),

    /// 显式坐标 `(z, h, w)`. 二维栅格的 `z` 为 0.
    Points(&'s [Idx3d]),
}

impl<M: ?Sized> Clone for Seeds<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: ?Sized> Copy for Seeds<'_, M> {}

impl<'s> Seeds<'s> {
    /// 由显式坐标构建.
    #[inline]
    pub fn points(points: &'s [Idx3d]) -> Self {
        Self::Points(points)
    }
}

impl<'s, M: Raster + ?Sized> Seeds<'s, M> {
    /// 由标记栅格构建.
    #[inline]
    pub fn raster(markers: &'s M) -> Self {
        Self::Raster(markers)
    }
}

impl<'s, M> Seeds<'s, M>
where
    M: Raster + ?Sized,
    M::Elem: Zero,
{
    /// 全部标记坐标. 标记栅格的形状必须与 `grid` 一致.
    fn positions<'g>(&'g self, grid: &'g Grid) -> impl Iterator<Item = Idx3d> + 'g {
        match *self {
            Seeds::Raster(m) => Either::Left(grid.positions().filter(move |&p| !m.at(p).is_zero())),
            Seeds::Points(ps) => Either::Right(ps.iter().copied()),
        }
    }
}

/// 一次传播的统计信息.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct PropagationStats {
    /// 有效标记数.
    pub seeds: usize,
    /// 落在域外 (或栅格外) 而被忽略的标记数.
    pub ignored_seeds: usize,
    /// 入队总次数.
    pub queued: usize,
    /// 出队总次数.
    pub popped: usize,
    /// 出队时已过期的条目数.
    pub stale: usize,
    /// 队列阶段使体素距离下降的次数.
    pub corrections: usize,
    /// 完成的扫描轮数 (一轮 = 一次前向 + 一次后向).
    pub raster_rounds: usize,
}

/// 由独立标签栅格给出的 "同一区域" 判定.
struct LabelRule<'a> {
    extent: Idx3d,
    same: Box<dyn Fn(Idx3d, Idx3d) -> bool + 'a>,
}

/// 测地距离变换.
///
/// ```
/// use chamfer_berry::{ChamferMask, GeodesicTransform, Seeds};
/// use ndarray::Array2;
///
/// let domain = Array2::<u8>::ones((3, 5));
/// let seeds = [(0, 1, 0)];
/// let mask = ChamferMask::borgefors();
/// let map: ndarray::Array3<u16> = GeodesicTransform::new(&mask)
///     .compute(Seeds::points(&seeds), &domain)
///     .unwrap();
/// assert_eq!(map[(0, 1, 4)], 12);
/// ```
pub struct GeodesicTransform<'a> {
    mask: &'a ChamferMask,
    normalize: bool,
    label_aware: bool,
    strategy: Strategy,
    labels: Option<LabelRule<'a>>,
}

impl<'a> GeodesicTransform<'a> {
    /// 使用 `mask` 的变换. 缺省不归一化、不区分标签、使用 [`Strategy::Hybrid`].
    pub fn new(mask: &'a ChamferMask) -> Self {
        Self {
            mask,
            normalize: false,
            label_aware: false,
            strategy: Strategy::default(),
            labels: None,
        }
    }

    /// 结果是否除以掩膜的归一化权重.
    #[inline]
    pub fn normalize(mut self, yes: bool) -> Self {
        self.normalize = yes;
        self
    }

    /// 是否只在标签相同的体素之间传播. 未提供 [`Self::with_labels`] 时,
    /// 以域栅格本身的值作为标签. 传入 `false` 会同时丢弃已设置的标签栅格.
    #[inline]
    pub fn label_aware(mut self, yes: bool) -> Self {
        self.label_aware = yes;
        if !yes {
            self.labels = None;
        }
        self
    }

    /// 使用独立的标签栅格限制传播, 同时开启 `label_aware`.
    /// 标签栅格的形状必须与域一致.
    pub fn with_labels<L>(mut self, labels: &'a L) -> Self
    where
        L: Raster + ?Sized,
        L::Elem: PartialEq,
    {
        self.label_aware = true;
        self.labels = Some(LabelRule {
            extent: labels.extent(),
            same: Box::new(move |p, q| labels.at(p) == labels.at(q)),
        });
        self
    }

    /// 传播策略.
    #[inline]
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// 使用的掩膜.
    #[inline]
    pub fn mask(&self) -> &'a ChamferMask {
        self.mask
    }

    /// 计算测地距离图. 域中非零体素为域内.
    ///
    /// # 注意
    ///
    /// 二维域的结果深度为 1, 可用 [`geodesic_distance_map`] 直接得到二维结果.
    pub fn compute<T, D, M>(&self, seeds: Seeds<M>, domain: &D) -> ChamferResult<Array3<T>>
    where
        T: DistanceValue,
        D: Raster + ?Sized,
        D::Elem: Zero + PartialEq,
        M: Raster + ?Sized,
        M::Elem: Zero,
    {
        self.compute_with_stats(seeds, domain, &mut Monitor::silent())
            .map(|(map, _)| map)
    }

    /// 同 [`Self::compute`], 带进度、取消与统计信息.
    ///
    /// # 返回值
    ///
    /// - 标记栅格或标签栅格与域形状不一致: `Err(ChamferError::ShapeMismatch)`;
    /// - 掩膜维度与域不一致: `Err(ChamferError::InvalidMask)`;
    /// - 被取消: `Err(ChamferError::Cancelled)`.
    pub fn compute_with_stats<T, D, M>(
        &self,
        seeds: Seeds<M>,
        domain: &D,
        monitor: &mut Monitor,
    ) -> ChamferResult<(Array3<T>, PropagationStats)>
    where
        T: DistanceValue,
        D: Raster + ?Sized,
        D::Elem: Zero + PartialEq,
        M: Raster + ?Sized,
        M::Elem: Zero,
    {
        let grid = Grid::of(domain);
        if let Seeds::Raster(m) = seeds {
            grid.expect_same(m)?;
        }
        if let Some(rule) = self.labels.as_ref() {
            if rule.extent != grid.shape() {
                return Err(ChamferError::ShapeMismatch {
                    expected: grid.shape(),
                    found: rule.extent,
                });
            }
        }
        grid.expect_dim(self.mask.dim())?;

        let inside = |p: Idx3d| !domain.at(p).is_zero();
        let same_label = |p: Idx3d, q: Idx3d| match self.labels.as_ref() {
            Some(rule) => (rule.same)(p, q),
            None => domain.at(p) == domain.at(q),
        };
        let linked = |p: Idx3d, q: Idx3d| inside(q) && (!self.label_aware || same_label(p, q));

        let mut stats = PropagationStats::default();
        let mut buf = Array3::from_elem(grid.shape(), T::UNREACHED);
        for p in seeds.positions(&grid) {
            if !grid.contains(p) || !inside(p) {
                stats.ignored_seeds += 1;
                continue;
            }
            if buf[p] != T::ZERO {
                buf[p] = T::ZERO;
                stats.seeds += 1;
            }
        }
        if stats.ignored_seeds > 0 {
            log::warn!(
                "{} marker(s) outside the domain ignored",
                stats.ignored_seeds
            );
        }
        log::debug!(
            "geodesic {:?} over {:?}: {} seed(s)",
            self.strategy,
            grid.shape(),
            stats.seeds
        );

        let kernel = Kernel::<T>::new(self.mask);
        let mut round = |buf: &mut Array3<T>, monitor: &mut Monitor| -> ChamferResult<usize> {
            let mut changed = 0;
            for backward in [false, true] {
                monitor.status(if backward { "Backward scan" } else { "Forward scan" });
                grid.sweep(backward, monitor, |pos| {
                    if !inside(pos) {
                        return;
                    }
                    let current = buf[pos];
                    let best = kernel.relax(&grid, pos, current, backward, |q| {
                        linked(pos, q).then(|| buf[q])
                    });
                    if best < current {
                        buf[pos] = best;
                        changed += 1;
                    }
                })?;
            }
            stats.raster_rounds += 1;
            Ok(changed)
        };

        match self.strategy {
            Strategy::RasterOnly => {
                round(&mut buf, monitor)?;
            }
            Strategy::Iterative { max_rounds } => {
                let mut converged = false;
                for _ in 0..max_rounds.max(1) {
                    if round(&mut buf, monitor)? == 0 {
                        converged = true;
                        break;
                    }
                }
                if !converged {
                    log::warn!("raster scans not stable after {} round(s)", max_rounds.max(1));
                }
            }
            Strategy::Hybrid => {
                round(&mut buf, monitor)?;
                monitor.status("Queue correction");
                // 后向扫描结束后, 只有后向邻居可能被低估.
                let violating: Vec<Idx3d> = grid
                    .positions()
                    .filter(|&p| {
                        let d = buf[p];
                        d.is_reached()
                            && kernel.half(true).iter().any(|&(o, w)| {
                                grid.shift(p, o)
                                    .is_some_and(|q| linked(p, q) && d.step(w) < buf[q])
                            })
                    })
                    .collect();
                queue::correct(&grid, &kernel, &mut buf, linked, violating, monitor, &mut stats)?;
            }
        }
        let total = grid.progress_total();
        monitor.progress(total, total);

        let by = self
            .normalize
            .then(|| T::weight_of(self.mask.normalization_offset()));
        buf.mapv_inplace(|v| v.finalize(by));
        Ok((buf, stats))
    }
}

impl std::fmt::Debug for GeodesicTransform<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeodesicTransform")
            .field("mask", self.mask)
            .field("normalize", &self.normalize)
            .field("label_aware", &self.label_aware)
            .field("strategy", &self.strategy)
            .field("labels", &self.labels.as_ref().map(|r| r.extent))
            .finish()
    }
}

/// 二维测地距离图. `markers` 与 `domain` 中的非零像素分别为标记与域内.
/// 结果按掩膜的归一化权重归一化, 即以正交像素为单位.
///
/// `label_aware` 为 `true` 时, 距离只在 `domain` 值相同的像素之间传播.
pub fn geodesic_distance_map<T, S, U>(
    markers: &ArrayBase<S, Ix2>,
    domain: &ArrayBase<U, Ix2>,
    mask: &ChamferMask,
    label_aware: bool,
) -> ChamferResult<Array2<T>>
where
    T: DistanceValue,
    S: Data,
    S::Elem: Copy + Zero,
    U: Data,
    U::Elem: Copy + Zero + PartialEq,
{
    GeodesicTransform::new(mask)
        .normalize(true)
        .label_aware(label_aware)
        .compute(Seeds::Raster(markers), domain)
        .map(planar)
}

/// 三维测地距离图, 见 [`geodesic_distance_map`].
pub fn geodesic_distance_map_3d<T, S, U>(
    markers: &ArrayBase<S, Ix3>,
    domain: &ArrayBase<U, Ix3>,
    mask: &ChamferMask,
    label_aware: bool,
) -> ChamferResult<Array3<T>>
where
    T: DistanceValue,
    S: Data,
    S::Elem: Copy + Zero,
    U: Data,
    U::Elem: Copy + Zero + PartialEq,
{
    GeodesicTransform::new(mask)
        .normalize(true)
        .label_aware(label_aware)
        .compute(Seeds::Raster(markers), domain)
}

#[cfg(test)]
mod tests {
    use super::{geodesic_distance_map, geodesic_distance_map_3d, GeodesicTransform, Seeds, Strategy};
    use crate::error::ChamferError;
    use crate::mask::ChamferMask;
    use crate::monitor::Monitor;
    use crate::consts::CANCEL_CHECK_INTERVAL;
    use crate::test_utils::{float_eq, init_logger};
    use crate::transform::distance_map;
    use ndarray::{s, Array2, Array3, Axis};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::cell::{Cell, RefCell};
    use std::cmp::Reverse;
    use std::collections::BinaryHeap;

    /// 逐体素的 Dijkstra, 作为正确结果.
    fn reference(domain: &Array2<u8>, markers: &Array2<u8>, mask: &ChamferMask, label_aware: bool) -> Array2<u32> {
        let (hn, wn) = domain.dim();
        let mut dist = Array2::from_elem((hn, wn), u32::MAX);
        let mut heap = BinaryHeap::new();
        for (p, &m) in markers.indexed_iter() {
            if m != 0 && domain[p] != 0 {
                dist[p] = 0;
                heap.push(Reverse((0u32, p)));
            }
        }
        while let Some(Reverse((d, (h, w)))) = heap.pop() {
            if d > dist[(h, w)] {
                continue;
            }
            for wo in mask.offsets() {
                let o = wo.offset();
                let (Some(qh), Some(qw)) = (h.checked_add_signed(o.dh), w.checked_add_signed(o.dw))
                else {
                    continue;
                };
                if qh >= hn || qw >= wn || domain[(qh, qw)] == 0 {
                    continue;
                }
                if label_aware && domain[(qh, qw)] != domain[(h, w)] {
                    continue;
                }
                let nd = d + wo.int_weight();
                if nd < dist[(qh, qw)] {
                    dist[(qh, qw)] = nd;
                    heap.push(Reverse((nd, (qh, qw))));
                }
            }
        }
        dist
    }

    /// 8 行 10 列, 中间一块贴着上边缘的矩形障碍, 只能从下方绕过.
    fn u_shape() -> Array2<u8> {
        let mut d = Array2::ones((8, 10));
        d.slice_mut(s![0..6, 3..7]).fill(0);
        d
    }

    /// `n×n` 的蛇形通道: 每隔 4 行一道墙, 交替在右端、左端开口.
    fn serpentine(n: usize) -> Array2<u8> {
        let mut d = Array2::ones((n, n));
        for (k, r) in (2..n - 1).step_by(4).enumerate() {
            if k % 2 == 0 {
                d.slice_mut(s![r, 0..n - 1]).fill(0);
            } else {
                d.slice_mut(s![r, 1..n]).fill(0);
            }
        }
        d
    }

    fn single_marker(shape: (usize, usize), at: (usize, usize)) -> Array2<u8> {
        let mut m = Array2::zeros(shape);
        m[at] = 1;
        m
    }

    fn plane<T>(a: Array3<T>) -> Array2<T> {
        a.index_axis_move(Axis(0), 0)
    }

    #[test]
    fn test_u_shape_detour() {
        init_logger();
        let domain = u_shape();
        let markers = single_marker((8, 10), (0, 0));
        let mask = ChamferMask::borgefors();

        let map: Array2<f32> = geodesic_distance_map(&markers, &domain, &mask, false).unwrap();
        assert_eq!(map[(0, 9)], 17.0);
        assert_eq!(map[(0, 0)], 0.0);
        assert!(map[(0, 3)].is_nan());
        assert!(map.slice(s![0..6, 3..7]).iter().all(|v| v.is_nan()));

        let raw: Array3<u16> = GeodesicTransform::new(&mask)
            .compute(Seeds::raster(&markers), &domain)
            .unwrap();
        assert_eq!(raw[(0, 0, 9)], 51);

        let points = [(0, 0, 0)];
        let from_points: Array3<u16> = GeodesicTransform::new(&mask)
            .compute(Seeds::points(&points), &domain)
            .unwrap();
        assert_eq!(raw, from_points);
    }

    #[test]
    fn test_serpentine_needs_correction() {
        let domain = serpentine(15);
        let markers = single_marker((15, 15), (14, 0));
        let mask = ChamferMask::borgefors();
        let expected = reference(&domain, &markers, &mask, false);
        assert!(expected[(0, 0)] < u32::MAX);

        let (hybrid, stats) = GeodesicTransform::new(&mask)
            .compute_with_stats::<u32, _, _>(Seeds::raster(&markers), &domain, &mut Monitor::silent())
            .unwrap();
        assert_eq!(plane(hybrid), expected);
        assert_eq!(stats.seeds, 1);
        assert_eq!(stats.raster_rounds, 1);
        assert!(stats.corrections > 0);
        assert_eq!(stats.popped, stats.queued);

        let raster: Array3<u32> = GeodesicTransform::new(&mask)
            .strategy(Strategy::RasterOnly)
            .compute(Seeds::raster(&markers), &domain)
            .unwrap();
        assert_eq!(raster[(0, 0, 0)], u32::MAX);

        let (iterative, stats) = GeodesicTransform::new(&mask)
            .strategy(Strategy::iterative())
            .compute_with_stats::<u32, _, _>(Seeds::raster(&markers), &domain, &mut Monitor::silent())
            .unwrap();
        assert_eq!(plane(iterative), expected);
        assert!(stats.raster_rounds > 1);
        assert_eq!(stats.queued, 0);
    }

    #[test]
    fn test_random_labels_match_reference() {
        let mut rng = StdRng::seed_from_u64(2024);
        let domain = Array2::from_shape_fn((25, 25), |_| rng.gen_range(0..3u8));
        let markers = Array2::from_shape_fn((25, 25), |_| u8::from(rng.gen_bool(0.03)));
        for mask in [ChamferMask::borgefors(), ChamferMask::chess_knight()] {
            for label_aware in [false, true] {
                let expected = reference(&domain, &markers, &mask, label_aware);
                for strategy in [Strategy::Hybrid, Strategy::iterative()] {
                    let map: Array3<u32> = GeodesicTransform::new(&mask)
                        .label_aware(label_aware)
                        .strategy(strategy)
                        .compute(Seeds::raster(&markers), &domain)
                        .unwrap();
                    assert_eq!(plane(map), expected, "{strategy:?}, label_aware = {label_aware}");
                }
            }
        }
    }

    #[test]
    fn test_label_isolation() {
        let mut domain = Array2::<u8>::ones((5, 10));
        domain.slice_mut(s![.., 5..]).fill(2);
        let markers = single_marker((5, 10), (2, 1));
        let mask = ChamferMask::borgefors();

        let isolated: Array2<f32> = geodesic_distance_map(&markers, &domain, &mask, true).unwrap();
        assert!(isolated.slice(s![.., 5..]).iter().all(|v| v.is_nan()));
        assert_eq!(isolated[(2, 4)], 3.0);

        let shared: Array2<f32> = geodesic_distance_map(&markers, &domain, &mask, false).unwrap();
        assert_eq!(shared[(2, 9)], 8.0);

        // 另一区域中的标记不影响本区域.
        let mut more = markers.clone();
        more[(2, 8)] = 1;
        let again: Array2<f32> = geodesic_distance_map(&more, &domain, &mask, true).unwrap();
        assert_eq!(again.slice(s![.., ..5]), isolated.slice(s![.., ..5]));
        assert_eq!(again[(2, 9)], 1.0);
    }

    #[test]
    fn test_separate_label_raster() {
        let domain = Array2::<u8>::ones((5, 10));
        let mut labels = Array2::<u16>::from_elem((5, 10), 7);
        labels.slice_mut(s![.., 5..]).fill(9);
        let markers = single_marker((5, 10), (2, 1));
        let mask = ChamferMask::borgefors();

        let map: Array3<u16> = GeodesicTransform::new(&mask)
            .with_labels(&labels)
            .compute(Seeds::raster(&markers), &domain)
            .unwrap();
        assert_eq!(map[(0, 2, 4)], 9);
        assert_eq!(map[(0, 2, 5)], u16::MAX);

        let wrong = Array2::<u16>::zeros((5, 9));
        let r: Result<Array3<u16>, _> = GeodesicTransform::new(&mask)
            .with_labels(&wrong)
            .compute(Seeds::raster(&markers), &domain);
        assert_eq!(
            r,
            Err(ChamferError::ShapeMismatch {
                expected: (1, 5, 10),
                found: (1, 5, 9)
            })
        );

        // 关闭标签限制后, 标签栅格不再参与传播与形状检查.
        let map: Array3<u16> = GeodesicTransform::new(&mask)
            .with_labels(&wrong)
            .label_aware(false)
            .compute(Seeds::raster(&markers), &domain)
            .unwrap();
        assert_eq!(map[(0, 2, 5)], 12);
    }

    /// 凸域上, 以边界为标记的测地距离与距离图一致.
    #[test]
    fn test_agrees_with_distance_map_on_convex_domain() {
        let mut background = Array2::<u8>::ones((9, 13));
        background.slice_mut(s![1..8, 1..12]).fill(2);
        background.mapv_inplace(|v| u8::from(v == 2));
        let domain = Array2::<u8>::ones((9, 13));
        let markers = background.mapv(|v| 1 - v);
        for mask in [ChamferMask::borgefors(), ChamferMask::chess_knight()] {
            let expected: Array2<u16> = distance_map(&background, &mask, false).unwrap();
            let (map, stats) = GeodesicTransform::new(&mask)
                .compute_with_stats::<u16, _, _>(Seeds::raster(&markers), &domain, &mut Monitor::silent())
                .unwrap();
            assert_eq!(plane(map), expected);
            assert_eq!(stats.queued, 0);
        }

        let mut centered = Array2::<u8>::ones((9, 9));
        centered[(4, 4)] = 0;
        let mask = ChamferMask::borgefors();
        let expected: Array2<u16> = distance_map(&centered, &mask, false).unwrap();
        let map: Array3<u16> = GeodesicTransform::new(&mask)
            .compute(Seeds::raster(&centered.mapv(|v| 1 - v)), &Array2::<u8>::ones((9, 9)))
            .unwrap();
        assert_eq!(plane(map), expected);
    }

    #[test]
    fn test_no_markers_and_outside_markers() {
        let domain = u_shape();
        let mask = ChamferMask::borgefors();

        let none = Array2::<u8>::zeros((8, 10));
        let map: Array2<f64> = geodesic_distance_map(&none, &domain, &mask, false).unwrap();
        assert!(map.iter().all(|v| v.is_nan()));

        let outside = single_marker((8, 10), (0, 4));
        let (map, stats) = GeodesicTransform::new(&mask)
            .compute_with_stats::<u16, _, _>(Seeds::raster(&outside), &domain, &mut Monitor::silent())
            .unwrap();
        assert!(map.iter().all(|&v| v == u16::MAX));
        assert_eq!(stats.seeds, 0);
        assert_eq!(stats.ignored_seeds, 1);

        let points = [(0, 0, 0), (0, 0, 0), (0, 20, 0), (1, 0, 0)];
        let (_, stats) = GeodesicTransform::new(&mask)
            .compute_with_stats::<u16, _, _>(Seeds::points(&points), &domain, &mut Monitor::silent())
            .unwrap();
        assert_eq!(stats.seeds, 1);
        assert_eq!(stats.ignored_seeds, 2);
    }

    #[test]
    fn test_shape_mismatch() {
        let domain = Array2::<u8>::ones((3, 4));
        let markers = Array2::<u8>::ones((3, 3));
        let r: Result<Array2<u16>, _> =
            geodesic_distance_map(&markers, &domain, &ChamferMask::borgefors(), false);
        assert_eq!(
            r,
            Err(ChamferError::ShapeMismatch {
                expected: (1, 3, 4),
                found: (1, 3, 3)
            })
        );
    }

    #[test]
    fn test_progress_and_cancellation() {
        let domain = u_shape();
        let markers = single_marker((8, 10), (0, 0));
        let mask = ChamferMask::borgefors();

        let calls = RefCell::new(Vec::new());
        let mut monitor = Monitor::silent().on_progress(|c, t| calls.borrow_mut().push((c, t)));
        GeodesicTransform::new(&mask)
            .compute_with_stats::<f32, _, _>(Seeds::raster(&markers), &domain, &mut monitor)
            .unwrap();
        drop(monitor);
        let calls = calls.into_inner();
        assert_eq!(calls.len(), 17);
        assert_eq!(calls.last(), Some(&(8, 8)));

        let mut monitor = Monitor::silent().cancel_when(|| true);
        let r = GeodesicTransform::new(&mask)
            .compute_with_stats::<f32, _, _>(Seeds::raster(&markers), &domain, &mut monitor);
        assert_eq!(r.unwrap_err(), ChamferError::Cancelled);
    }

    /// 两次光栅扫描中的逐行检查都放行, 之后的取消只能在队列阶段生效.
    #[test]
    fn test_cancel_during_queue_correction() {
        let n = 100;
        let domain = serpentine(n);
        let markers = single_marker((n, n), (n - 1, 0));
        let mask = ChamferMask::borgefors();

        let (_, stats) = GeodesicTransform::new(&mask)
            .compute_with_stats::<u32, _, _>(Seeds::raster(&markers), &domain, &mut Monitor::silent())
            .unwrap();
        assert!(stats.popped > CANCEL_CHECK_INTERVAL);

        let checks = Cell::new(0usize);
        let mut monitor = Monitor::silent().cancel_when(|| {
            checks.set(checks.get() + 1);
            checks.get() > 2 * n
        });
        let r = GeodesicTransform::new(&mask)
            .compute_with_stats::<u32, _, _>(Seeds::raster(&markers), &domain, &mut monitor);
        drop(monitor);
        assert_eq!(r.unwrap_err(), ChamferError::Cancelled);
        assert_eq!(checks.get(), 2 * n + 1);
    }

    #[test]
    fn test_3d() {
        let domain = Array3::<u8>::ones((5, 5, 5));
        let mut markers = Array3::<u8>::zeros((5, 5, 5));
        markers[(2, 2, 2)] = 1;

        let raw: Array3<u16> = GeodesicTransform::new(&ChamferMask::borgefors_3d())
            .compute(Seeds::raster(&markers), &domain)
            .unwrap();
        assert_eq!(raw[(0, 0, 0)], 10);
        assert_eq!(raw[(2, 2, 0)], 6);

        let map: Array3<f64> =
            geodesic_distance_map_3d(&markers, &domain, &ChamferMask::city_block_3d(), false)
                .unwrap();
        assert!(float_eq(map[(4, 4, 4)], 6.0));

        // 中间一层挖空, 只留一个角落的通道.
        let mut walled = domain.clone();
        walled.slice_mut(s![3, .., ..]).fill(0);
        walled[(3, 4, 4)] = 1;
        let map: Array3<u32> = GeodesicTransform::new(&ChamferMask::chessboard_3d())
            .compute(Seeds::raster(&markers), &walled)
            .unwrap();
        assert_eq!(map[(3, 4, 4)], 2);
        assert_eq!(map[(4, 0, 0)], 6);
    }
}
