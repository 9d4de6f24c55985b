//! 混合测地传播的消融实验: 在合成幻影上比较三种传播策略的速度与结果.
//!
//! 环境变量:
//!
//! - `CHAMFER_ABLATION_SIZE`: 幻影边长;
//! - `CHAMFER_ABLATION_OUT`: 距离图输出目录, 缺省为 `$HOME/chamfer-ablation`;
//! - `RUST_LOG`: 日志级别.

mod profile;
mod result;
mod runner;
mod strategies;

fn main() {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .env()
        .init()
        .expect("Logger initialization error");

    let result = runner::run();
    result.analyze();

    match utils::config::out_dir_from_env_or_home() {
        Some(dir) => match result.dump(&dir) {
            Ok(n) => log::info!("{n} file(s) written to `{}`", dir.display()),
            Err(e) => log::error!("Cannot dump distance maps: {e}"),
        },
        None => log::warn!("Cannot determine output directory, skip dumping"),
    }
}
