//! 进度、状态与取消信号.
//!
//! 调用者以闭包的形式注入回调, 不需要注册/注销监听器.

use crate::error::{ChamferError, ChamferResult};

type ProgressFn<'a> = Box<dyn FnMut(usize, usize) + 'a>;
type StatusFn<'a> = Box<dyn FnMut(&str) + 'a>;
type CancelFn<'a> = Box<dyn Fn() -> bool + 'a>;

/// 长时间运算的观察者. 所有回调都是可选的.
///
/// ```
/// use chamfer_berry::Monitor;
/// use std::cell::Cell;
///
/// let rows = Cell::new(0);
/// let m = Monitor::silent().on_progress(|_, _| rows.set(rows.get() + 1));
/// # drop(m);
/// ```
#[derive(Default)]
pub struct Monitor<'a> {
    progress: Option<ProgressFn<'a>>,
    status: Option<StatusFn<'a>>,
    cancel: Option<CancelFn<'a>>,
}

impl<'a> Monitor<'a> {
    /// 不做任何事情的观察者.
    #[inline]
    pub fn silent() -> Self {
        Self::default()
    }

    /// 设置进度回调 `(current, total)`.
    /// 每处理完一行 (二维) 或一层 (三维) 调用一次, 结束时以 `(total, total)` 再调用一次.
    pub fn on_progress<F: FnMut(usize, usize) + 'a>(mut self, f: F) -> Self {
        self.progress = Some(Box::new(f));
        self
    }

    /// 设置状态消息回调. 每个阶段开始时调用.
    pub fn on_status<F: FnMut(&str) + 'a>(mut self, f: F) -> Self {
        self.status = Some(Box::new(f));
        self
    }

    /// 设置取消查询. 返回 `true` 时运算尽快以 [`ChamferError::Cancelled`] 结束.
    pub fn cancel_when<F: Fn() -> bool + 'a>(mut self, f: F) -> Self {
        self.cancel = Some(Box::new(f));
        self
    }

    /// 汇报进度.
    #[inline]
    pub(crate) fn progress(&mut self, current: usize, total: usize) {
        if let Some(f) = self.progress.as_mut() {
            f(current, total);
        }
    }

    /// 汇报状态. 同时以 `debug` 级别写入日志.
    pub(crate) fn status(&mut self, message: &str) {
        log::debug!("{message}");
        if let Some(f) = self.status.as_mut() {
            f(message);
        }
    }

    /// 取消检查点.
    #[inline]
    pub(crate) fn checkpoint(&self) -> ChamferResult<()> {
        match self.cancel.as_ref() {
            Some(f) if f() => Err(ChamferError::Cancelled),
            _ => Ok(()),
        }
    }
}

impl std::fmt::Debug for Monitor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor")
            .field("progress", &self.progress.is_some())
            .field("status", &self.status.is_some())
            .field("cancel", &self.cancel.is_some())
            .finish()
    }
}
