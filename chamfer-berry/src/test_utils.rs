//! 测试辅助.

use std::sync::Once;

static LOGGER: Once = Once::new();

/// 初始化测试日志. 多次调用是安全的.
pub fn init_logger() {
    LOGGER.call_once(|| {
        let _ = simple_logger::SimpleLogger::new()
            .with_level(log::LevelFilter::Debug)
            .init();
    });
}

/// 浮点近似相等.
#[inline]
pub fn float_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}
