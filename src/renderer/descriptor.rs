//! 描述符句柄运算
//!
//! RTV 描述符堆中的句柄是 "堆起始地址 + 索引 × 增量" 形式的 CPU 地址，
//! 本模块把这部分运算与具体 API 分开，方便测试。

/// 描述符句柄（CPU 可见）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuDescriptorHandle {
    /// 句柄指针值
    pub ptr: usize,
    /// 描述符索引
    pub index: u32,
}

impl CpuDescriptorHandle {
    /// 创建新的 CPU 描述符句柄
    pub fn new(ptr: usize, index: u32) -> Self {
        Self { ptr, index }
    }

    /// 偏移句柄
    pub fn offset(&self, count: u32, increment_size: u32) -> Self {
        Self {
            ptr: self.ptr + count as usize * increment_size as usize,
            index: self.index + count,
        }
    }
}

/// 一段连续的描述符（例如交换链每个后台缓冲区对应的 RTV）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorRange {
    start: CpuDescriptorHandle,
    increment_size: u32,
    count: u32,
}

impl DescriptorRange {
    /// 创建描述符范围
    ///
    /// * `heap_start` - 堆起始 CPU 地址
    /// * `increment_size` - 设备报告的描述符增量大小
    /// * `count` - 描述符数量
    pub fn new(heap_start: usize, increment_size: u32, count: u32) -> Self {
        Self {
            start: CpuDescriptorHandle::new(heap_start, 0),
            increment_size,
            count,
        }
    }

    /// 第 `index` 个描述符的句柄，越界时返回 `None`
    pub fn handle(&self, index: usize) -> Option<CpuDescriptorHandle> {
        let index = u32::try_from(index).ok().filter(|i| *i < self.count)?;
        Some(self.start.offset(index, self.increment_size))
    }

    /// 描述符数量
    pub fn len(&self) -> usize {
        self.count as usize
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
