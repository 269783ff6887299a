//! GPU 同步机制模块
//!
//! 提供 CPU-GPU 之间基于 Fence 的同步原语。
//!
//! # 同步模型
//!
//! 每帧提交后用递增的 Fence 值 signal 一次队列；如果 GPU 的完成值落后于
//! 刚刚 signal 的值，CPU 就在操作系统事件上阻塞等待，直到 GPU 追上。
//! 同一时刻最多只有一帧在 GPU 上执行。

use crate::core::error::Result;

/// Fence 值
///
/// 用于CPU-GPU同步的单调递增值。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FenceValue(u64);

impl FenceValue {
    /// 创建新的Fence值
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// 获取内部值
    pub fn value(&self) -> u64 {
        self.0
    }

    /// 下一个Fence值
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

/// GPU Fence 的抽象
///
/// DX12 后端用 `ID3D12Fence` + 事件句柄实现，测试中用内存模拟实现。
pub trait GpuFence {
    /// 在命令队列上 signal 指定的值（GPU 执行到这里时写入）
    fn signal(&mut self, value: FenceValue) -> Result<()>;

    /// GPU 当前已完成的值
    fn completed_value(&self) -> FenceValue;

    /// 阻塞当前线程，直到 GPU 完成值到达 `value`
    fn wait_for(&mut self, value: FenceValue) -> Result<()>;
}

/// Fence 计数器
///
/// 保存下一次要 signal 的值。设备初始化时 Fence 以 0 创建，
/// 因此第一次 signal 的值为 1。
#[derive(Debug)]
pub struct FenceTracker {
    next_value: FenceValue,
}

impl FenceTracker {
    /// 创建新的计数器，第一次 signal 的值为 1
    pub fn new() -> Self {
        Self {
            next_value: FenceValue::new(1),
        }
    }

    /// 下一次要 signal 的值
    pub fn next_value(&self) -> FenceValue {
        self.next_value
    }

    /// signal 当前值，递增计数器，并在 GPU 落后时等待
    ///
    /// 只有 signal 失败时计数器保持不变；一旦值进入队列就不会再被复用，
    /// 即使随后的等待失败。返回 signal 的值以及是否发生了阻塞等待。
    pub fn signal_and_wait<F: GpuFence + ?Sized>(&mut self, fence: &mut F) -> Result<(FenceValue, bool)> {
        let value = self.next_value;
        fence.signal(value)?;
        self.next_value = value.next();

        let waited = if fence.completed_value() < value {
            fence.wait_for(value)?;
            true
        } else {
            false
        };

        Ok((value, waited))
    }
}

impl Default for FenceTracker {
    fn default() -> Self {
        Self::new()
    }
}
