//! 在全部幻影上运行单个传播策略.

use crate::profile::Profile;
use chamfer_berry::prelude::*;
use ndarray::Array2;
use utils::phantom::Phantom;

/// 参与比较的策略. 第一个为基准.
pub const STRATEGIES: [(&str, Strategy); 3] = [
    ("hybrid", Strategy::Hybrid),
    ("raster-only", Strategy::RasterOnly),
    (
        "iterative",
        Strategy::Iterative {
            max_rounds: chamfer_berry::consts::DEFAULT_MAX_ROUNDS,
        },
    ),
];

/// 单个策略的运行结果.
pub struct Outcome {
    /// 统计信息.
    pub profile: Profile,
    /// 每个幻影的 (归一化) 距离图, 顺序与输入一致.
    pub maps: Vec<Array2<f32>>,
}

/// 以 `strategy` 处理 `phantoms`.
pub fn run(name: &str, strategy: Strategy, phantoms: &[Phantom], mask: &ChamferMask) -> Outcome {
    let mut profile = Profile::new();
    let mut maps = Vec::with_capacity(phantoms.len());
    for p in phantoms {
        log::info!("{name}: phantom `{}`...", p.name);
        let transform = GeodesicTransform::new(mask)
            .normalize(true)
            .label_aware(p.label_aware)
            .strategy(strategy);

        profile.compute_start();
        let (map, stats) = transform
            .compute_with_stats::<f32, _, _>(Seeds::raster(&p.markers), &p.domain, &mut Monitor::silent())
            .expect("Geodesic propagation error");
        profile.compute_elapsed(p.area(), &stats);

        let map = map.index_axis_move(ndarray::Axis(0), 0);
        let unreachable = map
            .iter()
            .zip(p.domain.iter())
            .filter(|(d, &v)| v != BACKGROUND && d.is_nan())
            .count();
        profile.count_unreachable(unreachable);
        maps.push(map);
    }
    Outcome {
        profile: profile.finish(),
        maps,
    }
}

/// `a` 与 `b` 中不一致的像素个数. 两边都是 `NaN` 视为一致.
pub fn mismatched(a: &Array2<f32>, b: &Array2<f32>) -> usize {
    a.iter()
        .zip(b.iter())
        .filter(|(x, y)| match (x.is_nan(), y.is_nan()) {
            (true, true) => false,
            (false, false) => (**x - **y).abs() > 1e-3,
            _ => true,
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::{mismatched, run, STRATEGIES};
    use chamfer_berry::mask::registry::default_mask;
    use ndarray::array;
    use utils::phantom;

    #[test]
    fn test_mismatched() {
        let a = array![[1.0f32, f32::NAN, 3.0]];
        let b = array![[1.0f32, f32::NAN, f32::NAN]];
        assert_eq!(mismatched(&a, &a), 0);
        assert_eq!(mismatched(&a, &b), 1);
    }

    #[test]
    fn test_strategies_on_small_phantoms() {
        let phantoms = vec![phantom::u_shape(20), phantom::serpentine(20)];
        let mask = default_mask();
        let outcomes: Vec<_> = STRATEGIES
            .iter()
            .map(|&(name, s)| run(name, s, &phantoms, mask))
            .collect();

        let (hybrid, raster, iterative) = (&outcomes[0], &outcomes[1], &outcomes[2]);
        for i in 0..phantoms.len() {
            assert_eq!(mismatched(&hybrid.maps[i], &iterative.maps[i]), 0);
        }
        assert!(mismatched(&hybrid.maps[1], &raster.maps[1]) > 0);
        assert_eq!(hybrid.profile.get_phantoms(), 2);
        assert_eq!(hybrid.profile.get_unreachable(), 0);
        assert!(raster.profile.get_unreachable() > 0);
    }
}
