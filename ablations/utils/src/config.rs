//! 从环境变量读取的实验配置.

use std::env;
use std::path::PathBuf;

/// 缺省幻影边长.
pub const DEFAULT_SIZE: usize = 256;

/// 允许的最小幻影边长. 更小的图形放不下障碍物.
pub const MIN_SIZE: usize = 16;

/// 获取幻影边长.
///
/// 1. 若环境变量 `$CHAMFER_ABLATION_SIZE` 是不小于 [`MIN_SIZE`] 的整数, 则返回其值;
/// 2. 否则, 返回 [`DEFAULT_SIZE`].
pub fn size_from_env() -> usize {
    env::var("CHAMFER_ABLATION_SIZE")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .filter(|&n| n >= MIN_SIZE)
        .unwrap_or(DEFAULT_SIZE)
}

/// 获取结果输出目录.
///
/// 1. 若环境变量 `$CHAMFER_ABLATION_OUT` 非空, 则返回其值;
/// 2. 否则, 返回 `$HOME/chamfer-ablation`. 无法确定主目录时返回 `None`.
pub fn out_dir_from_env_or_home() -> Option<PathBuf> {
    match env::var("CHAMFER_ABLATION_OUT") {
        Ok(d) if !d.is_empty() => Some(PathBuf::from(d)),
        _ => {
            let mut ans = dirs::home_dir()?;
            ans.push("chamfer-ablation");
            Some(ans)
        }
    }
}
