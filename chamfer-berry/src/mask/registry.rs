//! 按名称查询的预置掩膜表.
//!
//! 该表在第一次访问时构建, 之后只读.

use super::ChamferMask;
use once_cell::sync::Lazy;

/// 名称 -> 掩膜. 保持插入顺序, 便于列举.
static REGISTRY: Lazy<Vec<(&'static str, ChamferMask)>> = Lazy::new(|| {
    vec![
        ("chessboard", ChamferMask::chessboard()),
        ("city-block", ChamferMask::city_block()),
        ("quasi-euclidean", ChamferMask::quasi_euclidean()),
        ("borgefors", ChamferMask::borgefors()),
        ("weights-2-3", ChamferMask::weights_23()),
        ("weights-5-7", ChamferMask::weights_57()),
        ("chess-knight", ChamferMask::chess_knight()),
        ("verwer", ChamferMask::verwer()),
        ("chessboard-3d", ChamferMask::chessboard_3d()),
        ("city-block-3d", ChamferMask::city_block_3d()),
        ("quasi-euclidean-3d", ChamferMask::quasi_euclidean_3d()),
        ("borgefors-3d", ChamferMask::borgefors_3d()),
        ("weights-3-4-5-7-3d", ChamferMask::weights_3457_3d()),
    ]
});

/// 按名称获取预置掩膜. 名称不区分大小写, `_` 与 `-` 等价.
/// 未知名称返回 `None`.
pub fn mask_by_name(name: &str) -> Option<&'static ChamferMask> {
    let key = name.trim().to_ascii_lowercase().replace('_', "-");
    REGISTRY.iter().find(|(n, _)| *n == key).map(|(_, m)| m)
}

/// 所有预置掩膜的名称, 按注册顺序.
pub fn mask_names() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|(n, _)| *n)
}

/// 缺省掩膜, 见 [`crate::consts::DEFAULT_MASK_NAME`].
pub fn default_mask() -> &'static ChamferMask {
    mask_by_name(crate::consts::DEFAULT_MASK_NAME).unwrap_or(&REGISTRY[0].1)
}
