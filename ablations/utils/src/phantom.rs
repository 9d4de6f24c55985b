//! 合成的测试图形 ("幻影"). 每个幻影都带有域与标记, 尺寸由调用者指定.

use chamfer_berry::consts::gray::{BACKGROUND, FOREGROUND};
use ndarray::{s, Array2};

/// 一个实验样本.
#[derive(Clone, Debug)]
pub struct Phantom {
    /// 名称, 同时用作输出文件名.
    pub name: &'static str,
    /// 域. 标签图形中不同的非零值代表不同区域.
    pub domain: Array2<u8>,
    /// 标记. 非零像素为标记.
    pub markers: Array2<u8>,
    /// 是否按标签隔离传播.
    pub label_aware: bool,
}

impl Phantom {
    fn new(name: &'static str, domain: Array2<u8>, markers: &[(usize, usize)]) -> Self {
        let mut m = Array2::from_elem(domain.dim(), BACKGROUND);
        for &p in markers {
            m[p] = FOREGROUND;
        }
        Self {
            name,
            domain,
            markers: m,
            label_aware: false,
        }
    }

    /// 域内像素个数.
    pub fn area(&self) -> usize {
        self.domain.iter().filter(|&&v| v != BACKGROUND).count()
    }
}

/// 全部幻影, 边长均为 `n`.
pub fn all(n: usize) -> Vec<Phantom> {
    vec![open(n), u_shape(n), serpentine(n), rings(n), stripes(n)]
}

/// 凸的全前景域, 标记在左上角. 扫描即可得到精确结果.
pub fn open(n: usize) -> Phantom {
    Phantom::new("open", Array2::from_elem((n, n), FOREGROUND), &[(0, 0)])
}

/// 中间一块贴着上边缘的矩形障碍, 路径需从其下方绕过. 标记在左上角.
pub fn u_shape(n: usize) -> Phantom {
    let mut d = Array2::from_elem((n, n), FOREGROUND);
    let (left, right) = (n * 3 / 10, n * 7 / 10);
    d.slice_mut(s![..n * 3 / 4, left..right]).fill(BACKGROUND);
    Phantom::new("u-shape", d, &[(0, 0)])
}

/// 水平的墙每隔 `n / 8` 行一道, 开口在左右两端交替. 标记在左下角.
pub fn serpentine(n: usize) -> Phantom {
    let mut d = Array2::from_elem((n, n), FOREGROUND);
    let step = (n / 8).max(2);
    for (i, h) in (step..n - 1).step_by(step).enumerate() {
        if i % 2 == 0 {
            d.slice_mut(s![h, ..n - 1]).fill(BACKGROUND);
        } else {
            d.slice_mut(s![h, 1..]).fill(BACKGROUND);
        }
    }
    Phantom::new("serpentine", d, &[(n - 1, 0)])
}

/// 同心方环, 缺口在上下交替. 标记在中心.
pub fn rings(n: usize) -> Phantom {
    let mut d = Array2::from_elem((n, n), FOREGROUND);
    let c = n / 2;
    for (i, r) in (2..c).step_by(3).enumerate() {
        let (lo, hi) = (c - r, c + r);
        d.slice_mut(s![lo, lo..=hi]).fill(BACKGROUND);
        d.slice_mut(s![hi, lo..=hi]).fill(BACKGROUND);
        d.slice_mut(s![lo..=hi, lo]).fill(BACKGROUND);
        d.slice_mut(s![lo..=hi, hi]).fill(BACKGROUND);
        let gap = if i % 2 == 0 { lo } else { hi };
        d[(gap, c)] = FOREGROUND;
    }
    Phantom::new("rings", d, &[(c, c)])
}

/// 竖直条带, 每条带一个标签, 只有第一条带有标记. 标签隔离时其余条带不可达.
pub fn stripes(n: usize) -> Phantom {
    let width = (n / 4).max(1);
    let d = Array2::from_shape_fn((n, n), |(_, w)| (w / width + 1).min(u8::MAX as usize) as u8);
    let mut p = Phantom::new("stripes", d, &[(n / 2, 0)]);
    p.label_aware = true;
    p
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shapes_and_markers() {
        for p in all(32) {
            assert_eq!(p.domain.dim(), (32, 32), "{}", p.name);
            assert_eq!(p.markers.dim(), (32, 32), "{}", p.name);
            let marker_count = p.markers.iter().filter(|&&v| v != BACKGROUND).count();
            assert_eq!(marker_count, 1, "{}", p.name);
            // 标记必须落在域内.
            for ((h, w), &m) in p.markers.indexed_iter() {
                if m != BACKGROUND {
                    assert_ne!(p.domain[(h, w)], BACKGROUND, "{}", p.name);
                }
            }
            assert!(p.area() > 0);
        }
    }

    #[test]
    fn test_serpentine_openings_alternate() {
        let p = serpentine(32);
        assert_eq!(p.domain[(4, 31)], FOREGROUND);
        assert_eq!(p.domain[(4, 0)], BACKGROUND);
        assert_eq!(p.domain[(8, 0)], FOREGROUND);
        assert_eq!(p.domain[(8, 31)], BACKGROUND);
    }

    #[test]
    fn test_stripes_labels() {
        let p = stripes(16);
        assert!(p.label_aware);
        assert_eq!(p.domain[(0, 0)], 1);
        assert_eq!(p.domain[(0, 15)], 4);
    }
}
