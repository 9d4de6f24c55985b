//! 优先队列修正阶段.
//!
//! 队列中的条目 `(dist, seq, pos)` 按 `dist` 从小到大弹出, `dist` 相同时按入队顺序
//! (`seq`) 先进先出. 同一体素可以多次入队; 弹出时若 `dist` 与缓冲区中的值不同,
//! 说明该条目已过期, 直接丢弃.

use super::PropagationStats;
use crate::consts::CANCEL_CHECK_INTERVAL;
use crate::error::ChamferResult;
use crate::monitor::Monitor;
use crate::numeric::DistanceValue;
use crate::raster::Grid;
use crate::transform::Kernel;
use crate::Idx3d;
use binary_heap_plus::BinaryHeap;
use ndarray::Array3;
use std::cmp::Ordering;

/// 队列条目.
#[derive(Copy, Clone, Debug)]
struct Entry<T> {
    dist: T,
    seq: u64,
    pos: Idx3d,
}

/// "更小的距离、更早的入队" 具有更高的优先级.
#[inline]
fn priority<T: DistanceValue>(a: &Entry<T>, b: &Entry<T>) -> Ordering {
    b.dist
        .cmp_distance(&a.dist)
        .then_with(|| b.seq.cmp(&a.seq))
}

/// 从 `initial` 出发做类 Dijkstra 的松弛, 直到队列为空.
///
/// 调用前 `buf` 中的每个值都必须是某条合法路径的长度 (或尚未到达),
/// 且所有违反 `buf[q] <= buf[p] + w` 的边的起点 `p` 都在 `initial` 中.
/// 结束后 `buf` 即为精确的最短路径长度.
///
/// `linked(p, q)` 决定能否从 `p` 走到邻居 `q`.
pub(crate) fn correct<T, L, I>(
    grid: &Grid,
    kernel: &Kernel<T>,
    buf: &mut Array3<T>,
    linked: L,
    initial: I,
    monitor: &mut Monitor,
    stats: &mut PropagationStats,
) -> ChamferResult<()>
where
    T: DistanceValue,
    L: Fn(Idx3d, Idx3d) -> bool,
    I: IntoIterator<Item = Idx3d>,
{
    let mut heap: BinaryHeap<Entry<T>, _> = BinaryHeap::new_by(priority::<T>);
    let mut seq = 0u64;

    for pos in initial {
        heap.push(Entry {
            dist: buf[pos],
            seq,
            pos,
        });
        seq += 1;
    }
    stats.queued += heap.len();

    while let Some(Entry { dist, pos, .. }) = heap.pop() {
        stats.popped += 1;
        if stats.popped % CANCEL_CHECK_INTERVAL == 0 {
            monitor.checkpoint()?;
        }
        if dist.cmp_distance(&buf[pos]) != Ordering::Equal {
            stats.stale += 1;
            continue;
        }

        for &(o, w) in kernel.all() {
            let Some(q) = grid.shift(pos, o) else {
                continue;
            };
            if !linked(pos, q) {
                continue;
            }
            let candidate = dist.step(w);
            if candidate < buf[q] {
                buf[q] = candidate;
                stats.corrections += 1;
                heap.push(Entry {
                    dist: candidate,
                    seq,
                    pos: q,
                });
                seq += 1;
                stats.queued += 1;
            }
        }
    }

    log::trace!(
        "queue drained: {} queued, {} popped, {} stale, {} correction(s)",
        stats.queued,
        stats.popped,
        stats.stale,
        stats.corrections
    );
    Ok(())
}
