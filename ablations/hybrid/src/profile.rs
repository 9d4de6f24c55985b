//! 算法运行统计.

use chamfer_berry::PropagationStats;
use std::time::{Duration, Instant};

/// ablation/benchmark 计时器.
///
/// 该计时器支持 "中途中断" 与 "结束中断, 继续开始计时".
#[derive(Clone, Debug)]
struct AccTimer {
    consumed: Duration,
    since: Instant,
}

impl AccTimer {
    /// 初始化计时器. 初始化时会视为已经开始计时.
    #[inline]
    pub fn new() -> Self {
        Self {
            consumed: Duration::ZERO,
            since: Instant::now(),
        }
    }

    /// 开始计时.
    #[inline]
    pub fn start(&mut self) {
        self.since = Instant::now();
    }

    /// 结束计时, 并将这一区间的时间累加. 返回本轮计时时长.
    ///
    /// # 注意
    ///
    /// 上一次调用必须是 `self.start()`, 否则计算时间值无意义.
    #[inline]
    pub fn elapsed(&mut self) -> Duration {
        let d = self.since.elapsed();
        self.consumed += d;
        d
    }

    /// 累计时间 (微秒).
    #[inline]
    pub fn get_total_us(&self) -> u64 {
        self.consumed.as_micros() as u64
    }
}

impl Default for AccTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// 单个策略在全部幻影上的统计.
#[derive(Clone, Debug)]
pub struct Profile {
    /// 处理过的幻影个数.
    phantoms: u64,

    /// 处理过的域内像素总数.
    cells: u64,

    /// 传播本身花费的时间.
    compute_time: AccTimer,

    /// 整个任务花费的总时间 (包括构造幻影、比较结果).
    real_time: AccTimer,

    /// 最耗时的一次传播.
    most: Option<Duration>,

    /// 传播统计的累加.
    stats: PropagationStats,

    /// 结果中仍不可达的域内像素.
    unreachable: u64,

    /// 与混合策略结果不一致的像素.
    mismatched: u64,
}

impl Profile {
    /// 初始化, 同时开始总计时.
    #[inline]
    pub fn new() -> Self {
        Self {
            phantoms: 0,
            cells: 0,
            compute_time: AccTimer::default(),
            real_time: AccTimer::default(),
            most: None,
            stats: PropagationStats::default(),
            unreachable: 0,
            mismatched: 0,
        }
    }

    /// 开始一次传播计时.
    #[inline]
    pub fn compute_start(&mut self) {
        self.compute_time.start();
    }

    /// 结束一次传播计时, 并记录该次传播.
    pub fn compute_elapsed(&mut self, cells: usize, stats: &PropagationStats) {
        let d = self.compute_time.elapsed();
        self.most = Some(self.most.map_or(d, |m| m.max(d)));
        self.phantoms += 1;
        self.cells += cells as u64;

        let acc = &mut self.stats;
        acc.seeds += stats.seeds;
        acc.ignored_seeds += stats.ignored_seeds;
        acc.queued += stats.queued;
        acc.popped += stats.popped;
        acc.stale += stats.stale;
        acc.corrections += stats.corrections;
        acc.raster_rounds += stats.raster_rounds;
    }

    /// 记录不可达像素.
    #[inline]
    pub fn count_unreachable(&mut self, count: usize) {
        self.unreachable += count as u64;
    }

    /// 记录不一致像素.
    #[inline]
    pub fn count_mismatched(&mut self, count: usize) {
        self.mismatched += count as u64;
    }

    /// 结束全部计时.
    #[inline]
    pub fn finish(mut self) -> Self {
        self.real_time.elapsed();
        self
    }

    #[inline]
    pub fn get_phantoms(&self) -> u64 {
        self.phantoms
    }

    #[inline]
    pub fn get_cells(&self) -> u64 {
        self.cells
    }

    #[inline]
    pub fn get_stats(&self) -> &PropagationStats {
        &self.stats
    }

    #[inline]
    pub fn get_unreachable(&self) -> u64 {
        self.unreachable
    }

    #[inline]
    pub fn get_mismatched(&self) -> u64 {
        self.mismatched
    }

    /// 以微秒为单位获得传播的总时间.
    #[inline]
    pub fn get_compute_time_us(&self) -> u64 {
        self.compute_time.get_total_us()
    }

    /// 以微秒为单位获得任务的总时间.
    #[inline]
    pub fn get_real_time_us(&self) -> u64 {
        self.real_time.get_total_us()
    }

    /// 平均每个域内像素的传播时间 (纳秒).
    pub fn get_ns_per_cell(&self) -> Option<f64> {
        match self.cells {
            0 => None,
            cells => Some(self.get_compute_time_us() as f64 * 1000.0 / cells as f64),
        }
    }

    /// 最耗时的一次传播. 如果没有任何传播, 则返回 `None`.
    #[inline]
    pub fn get_most_time_consuming(&self) -> Option<Duration> {
        self.most
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Profile;
    use chamfer_berry::PropagationStats;

    #[test]
    fn test_accumulate() {
        let mut p = Profile::new();
        assert_eq!(p.get_ns_per_cell(), None);
        assert!(p.get_most_time_consuming().is_none());

        let stats = PropagationStats {
            seeds: 1,
            queued: 10,
            popped: 10,
            corrections: 4,
            raster_rounds: 1,
            ..Default::default()
        };
        for _ in 0..2 {
            p.compute_start();
            p.compute_elapsed(100, &stats);
        }
        p.count_unreachable(3);
        let p = p.finish();

        assert_eq!(p.get_phantoms(), 2);
        assert_eq!(p.get_cells(), 200);
        assert_eq!(p.get_stats().queued, 20);
        assert_eq!(p.get_stats().corrections, 8);
        assert_eq!(p.get_unreachable(), 3);
        assert!(p.get_most_time_consuming().is_some());
        assert!(p.get_ns_per_cell().is_some());
    }
}
