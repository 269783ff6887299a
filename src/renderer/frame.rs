//! 帧提交协议
//!
//! 每帧的命令记录、提交、呈现和 Fence 等待的顺序在这里实现一次，
//! 具体的图形 API 只需要实现 [`FrameBackend`] 中的各个步骤。
//!
//! # 每帧顺序
//!
//! ```text
//! reset allocator/list
//!   -> viewport/scissor（覆盖整个后台缓冲区）
//!   -> barrier PRESENT -> RENDER_TARGET
//!   -> 绑定并清除 RTV
//!   -> 绑定根签名/PSO/顶点缓冲区 -> DrawInstanced(3, 1, 0, 0)
//!   -> barrier RENDER_TARGET -> PRESENT
//!   -> close -> execute -> present
//!   -> signal fence；GPU 落后时阻塞等待
//!   -> 读取交换链新的后台缓冲区索引
//! ```
//!
//! 任何一步失败都会立即返回错误，后续步骤不会再执行。
//!
//! 窗口尺寸变化也在这里决定：宽或高为 0 时既不重建交换链也不绘制，
//! 尺寸未变时什么都不做，否则先等待 GPU 空闲再重建缓冲区并重新读取后台缓冲区索引。

use tracing::trace;

use crate::core::error::Result;
use crate::renderer::sync::{FenceTracker, FenceValue, GpuFence};

/// 交换链缓冲区数量（双缓冲）
pub const FRAME_COUNT: usize = 2;

/// 后台缓冲区的资源状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    /// 可被交换链呈现
    Present,
    /// 可作为渲染目标写入
    RenderTarget,
}

/// 二维尺寸（像素）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// 任一维度为 0（例如窗口最小化）
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// 视口
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub top_left_x: f32,
    pub top_left_y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

impl Viewport {
    /// 覆盖整个缓冲区、深度范围 0..1 的视口
    pub fn covering(extent: Extent) -> Self {
        Self {
            top_left_x: 0.0,
            top_left_y: 0.0,
            width: extent.width as f32,
            height: extent.height as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }
}

/// 裁剪矩形
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScissorRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ScissorRect {
    /// 覆盖整个缓冲区的裁剪矩形
    pub fn covering(extent: Extent) -> Self {
        Self {
            left: 0,
            top: 0,
            right: i32::try_from(extent.width).unwrap_or(i32::MAX),
            bottom: i32::try_from(extent.height).unwrap_or(i32::MAX),
        }
    }
}

/// 一次非索引绘制
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    pub vertex_count: u32,
    pub instance_count: u32,
}

/// 三角形：3 个顶点、1 个实例
pub const TRIANGLE_DRAW: DrawCall = DrawCall {
    vertex_count: 3,
    instance_count: 1,
};

/// 帧提交协议中每一步的后端实现
///
/// 返回 `()` 的方法对应图形 API 中只记录命令、不会失败的调用。
pub trait FrameBackend: GpuFence {
    /// 重置命令分配器，并以三角形 PSO 重置命令列表
    fn reset_commands(&mut self) -> Result<()>;

    /// 查询后台缓冲区的当前尺寸
    ///
    /// 这是每帧第一次使用 `back_buffer` 索引的地方，之后的步骤假定索引有效。
    fn back_buffer_extent(&self, back_buffer: usize) -> Result<Extent>;

    /// 设置视口与裁剪矩形
    fn set_viewport(&mut self, viewport: &Viewport, scissor: &ScissorRect);

    /// 记录后台缓冲区的状态转换 barrier
    fn transition_back_buffer(&mut self, back_buffer: usize, before: ResourceState, after: ResourceState);

    /// 绑定后台缓冲区的 RTV 并清屏
    fn bind_and_clear_target(&mut self, back_buffer: usize, clear_color: [f32; 4]);

    /// 绑定根签名、图元拓扑和顶点缓冲区
    fn bind_pipeline(&mut self);

    /// 记录绘制命令
    fn draw(&mut self, call: DrawCall);

    /// 关闭命令列表
    fn close_commands(&mut self) -> Result<()>;

    /// 把命令列表提交到命令队列
    fn execute_commands(&mut self) -> Result<()>;

    /// 呈现当前后台缓冲区
    fn present(&mut self, sync_interval: u32) -> Result<()>;

    /// 交换链当前的后台缓冲区索引
    fn current_back_buffer(&self) -> usize;

    /// 按新尺寸重建交换链缓冲区和渲染目标视图（调用前 GPU 已空闲）
    fn resize_buffers(&mut self, extent: Extent) -> Result<()>;
}

/// 一次窗口尺寸变化的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    /// 宽或高为 0，交换链保持原样，暂停绘制
    Minimized,
    /// 尺寸与当前交换链相同
    Unchanged,
    /// 交换链缓冲区已按新尺寸重建
    Recreated(Extent),
}

/// 交换链当前尺寸和窗口是否最小化
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapChainState {
    extent: Extent,
    minimized: bool,
}

impl SwapChainState {
    pub fn new(extent: Extent) -> Self {
        Self {
            extent,
            minimized: extent.is_empty(),
        }
    }

    /// 交换链缓冲区的尺寸（最小化期间保持最小化前的值）
    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn is_minimized(&self) -> bool {
        self.minimized
    }
}

/// 单帧的执行结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    /// 本帧渲染的后台缓冲区
    pub back_buffer: usize,
    /// 本帧 signal 的 Fence 值
    pub fence_value: FenceValue,
    /// CPU 是否阻塞等待了 GPU
    pub waited: bool,
    /// 下一帧使用的后台缓冲区
    pub next_back_buffer: usize,
}

/// 帧节奏控制器
///
/// 持有当前后台缓冲区索引和 Fence 计数器，按固定顺序驱动 [`FrameBackend`]。
/// 每帧结束时都会等待 GPU 完成，同一时刻只有一帧在执行。
#[derive(Debug)]
pub struct FramePacer {
    frame_index: usize,
    swap_chain: SwapChainState,
    fence: FenceTracker,
    clear_color: [f32; 4],
    sync_interval: u32,
    frames_submitted: u64,
}

impl FramePacer {
    /// 创建控制器
    ///
    /// * `initial_back_buffer` - 交换链创建后报告的后台缓冲区索引
    /// * `extent` - 交换链创建时的尺寸
    /// * `clear_color` - 清屏颜色
    /// * `sync_interval` - Present 的 SyncInterval（0 或 1）
    pub fn new(initial_back_buffer: usize, extent: Extent, clear_color: [f32; 4], sync_interval: u32) -> Self {
        Self {
            frame_index: initial_back_buffer,
            swap_chain: SwapChainState::new(extent),
            fence: FenceTracker::new(),
            clear_color,
            sync_interval,
            frames_submitted: 0,
        }
    }

    /// 当前后台缓冲区索引
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// 交换链尺寸和最小化状态
    pub fn swap_chain(&self) -> &SwapChainState {
        &self.swap_chain
    }

    /// Fence 计数器
    pub fn fence(&self) -> &FenceTracker {
        &self.fence
    }

    /// 已经提交的帧数
    pub fn frames_submitted(&self) -> u64 {
        self.frames_submitted
    }

    /// 窗口未最小化时渲染一帧，否则返回 `None`
    pub fn render_if_visible<B: FrameBackend + ?Sized>(&mut self, backend: &mut B) -> Result<Option<FrameReport>> {
        if self.swap_chain.minimized {
            return Ok(None);
        }
        self.render(backend).map(Some)
    }

    /// 处理窗口尺寸变化
    ///
    /// 重建失败时记录的尺寸保持不变，后端此时处于不可用状态，
    /// 调用方应当把错误当作致命错误处理。
    pub fn resize<B: FrameBackend + ?Sized>(&mut self, backend: &mut B, extent: Extent) -> Result<ResizeOutcome> {
        if extent.is_empty() {
            self.swap_chain.minimized = true;
            return Ok(ResizeOutcome::Minimized);
        }
        self.swap_chain.minimized = false;

        if extent == self.swap_chain.extent {
            return Ok(ResizeOutcome::Unchanged);
        }

        self.flush(backend)?;
        backend.resize_buffers(extent)?;
        self.swap_chain.extent = extent;
        self.frame_index = backend.current_back_buffer();

        Ok(ResizeOutcome::Recreated(extent))
    }

    /// 记录、提交并呈现一帧，然后等待 GPU 完成
    pub fn render<B: FrameBackend + ?Sized>(&mut self, backend: &mut B) -> Result<FrameReport> {
        let back_buffer = self.frame_index;

        backend.reset_commands()?;

        let extent = backend.back_buffer_extent(back_buffer)?;
        backend.set_viewport(&Viewport::covering(extent), &ScissorRect::covering(extent));

        backend.transition_back_buffer(back_buffer, ResourceState::Present, ResourceState::RenderTarget);
        backend.bind_and_clear_target(back_buffer, self.clear_color);
        backend.bind_pipeline();
        backend.draw(TRIANGLE_DRAW);
        backend.transition_back_buffer(back_buffer, ResourceState::RenderTarget, ResourceState::Present);

        backend.close_commands()?;
        backend.execute_commands()?;
        backend.present(self.sync_interval)?;
        self.frames_submitted += 1;

        let (fence_value, waited) = self.wait_for_previous_frame(backend)?;

        trace!(
            back_buffer,
            fence_value = fence_value.value(),
            waited,
            next_back_buffer = self.frame_index,
            "Frame completed"
        );

        Ok(FrameReport {
            back_buffer,
            fence_value,
            waited,
            next_back_buffer: self.frame_index,
        })
    }

    /// signal Fence 并在 GPU 落后时阻塞，然后切换到交换链新的后台缓冲区
    pub fn wait_for_previous_frame<B: FrameBackend + ?Sized>(&mut self, backend: &mut B) -> Result<(FenceValue, bool)> {
        let result = self.fence.signal_and_wait(backend)?;
        self.frame_index = backend.current_back_buffer();
        Ok(result)
    }

    /// 等待 GPU 完成所有已提交的工作（调整大小和销毁前使用）
    pub fn flush<F: GpuFence + ?Sized>(&mut self, fence: &mut F) -> Result<FenceValue> {
        let (value, _) = self.fence.signal_and_wait(fence)?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{GraphicsError, TriangleError};
    use crate::renderer::sync::tests::MockFence;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Reset,
        Extent(usize),
        Viewport(Viewport, ScissorRect),
        Transition(usize, ResourceState, ResourceState),
        BindAndClear(usize, [f32; 4]),
        BindPipeline,
        Draw(DrawCall),
        Close,
        Execute,
        Present(u32),
        Signal(u64),
        Wait(u64),
        Resize(Extent),
    }

    /// 记录调用顺序的模拟后端，交换链按 0,1,0,1... 轮转，重建后回到 0
    #[derive(Default)]
    struct MockBackend {
        calls: Vec<Call>,
        fence: MockFence,
        back_buffer: usize,
        extent: Option<Extent>,
        fail_at: Option<&'static str>,
    }

    impl MockBackend {
        fn new() -> Self {
            Self {
                extent: Some(Extent::new(800, 600)),
                ..Default::default()
            }
        }

        fn fail(&self, step: &'static str) -> Result<()> {
            if self.fail_at == Some(step) {
                Err(TriangleError::Graphics(GraphicsError::CommandExecution(format!("{} failed", step))))
            } else {
                Ok(())
            }
        }
    }

    impl GpuFence for MockBackend {
        fn signal(&mut self, value: FenceValue) -> Result<()> {
            self.fence.signal(value)?;
            self.calls.push(Call::Signal(value.value()));
            Ok(())
        }

        fn completed_value(&self) -> FenceValue {
            self.fence.completed_value()
        }

        fn wait_for(&mut self, value: FenceValue) -> Result<()> {
            self.calls.push(Call::Wait(value.value()));
            self.fence.wait_for(value)
        }
    }

    impl FrameBackend for MockBackend {
        fn reset_commands(&mut self) -> Result<()> {
            self.fail("reset")?;
            self.calls.push(Call::Reset);
            Ok(())
        }

        fn back_buffer_extent(&self, back_buffer: usize) -> Result<Extent> {
            // 只读方法无法记录调用，由 Viewport 调用间接体现
            let _ = back_buffer;
            self.extent
                .ok_or_else(|| TriangleError::Graphics(GraphicsError::ResourceCreation("no back buffer".to_string())))
        }

        fn set_viewport(&mut self, viewport: &Viewport, scissor: &ScissorRect) {
            self.calls.push(Call::Viewport(*viewport, *scissor));
        }

        fn transition_back_buffer(&mut self, back_buffer: usize, before: ResourceState, after: ResourceState) {
            self.calls.push(Call::Transition(back_buffer, before, after));
        }

        fn bind_and_clear_target(&mut self, back_buffer: usize, clear_color: [f32; 4]) {
            self.calls.push(Call::BindAndClear(back_buffer, clear_color));
        }

        fn bind_pipeline(&mut self) {
            self.calls.push(Call::BindPipeline);
        }

        fn draw(&mut self, call: DrawCall) {
            self.calls.push(Call::Draw(call));
        }

        fn close_commands(&mut self) -> Result<()> {
            self.fail("close")?;
            self.calls.push(Call::Close);
            Ok(())
        }

        fn execute_commands(&mut self) -> Result<()> {
            self.fail("execute")?;
            self.calls.push(Call::Execute);
            Ok(())
        }

        fn present(&mut self, sync_interval: u32) -> Result<()> {
            self.fail("present")?;
            self.calls.push(Call::Present(sync_interval));
            self.back_buffer = (self.back_buffer + 1) % FRAME_COUNT;
            Ok(())
        }

        fn current_back_buffer(&self) -> usize {
            self.back_buffer
        }

        fn resize_buffers(&mut self, extent: Extent) -> Result<()> {
            self.fail("resize")?;
            self.calls.push(Call::Resize(extent));
            self.extent = Some(extent);
            self.back_buffer = 0;
            Ok(())
        }
    }

    const CLEAR: [f32; 4] = [0.39, 0.58, 0.93, 1.0];
    const START: Extent = Extent::new(800, 600);

    #[test]
    fn test_frame_call_order() {
        let mut backend = MockBackend { fence: MockFence { lagging: true, ..Default::default() }, ..MockBackend::new() };
        let mut pacer = FramePacer::new(0, START, CLEAR, 1);

        let report = pacer.render(&mut backend).unwrap();

        let extent = Extent::new(800, 600);
        assert_eq!(
            backend.calls,
            vec![
                Call::Reset,
                Call::Viewport(Viewport::covering(extent), ScissorRect::covering(extent)),
                Call::Transition(0, ResourceState::Present, ResourceState::RenderTarget),
                Call::BindAndClear(0, CLEAR),
                Call::BindPipeline,
                Call::Draw(TRIANGLE_DRAW),
                Call::Transition(0, ResourceState::RenderTarget, ResourceState::Present),
                Call::Close,
                Call::Execute,
                Call::Present(1),
                Call::Signal(1),
                Call::Wait(1),
            ]
        );
        assert_eq!(
            report,
            FrameReport {
                back_buffer: 0,
                fence_value: FenceValue::new(1),
                waited: true,
                next_back_buffer: 1,
            }
        );
    }

    #[test]
    fn test_fence_values_increase_and_index_follows_swap_chain() {
        let mut backend = MockBackend::new();
        let mut pacer = FramePacer::new(0, START, CLEAR, 0);

        let mut previous = FenceValue::new(0);
        for frame in 0..5usize {
            let report = pacer.render(&mut backend).unwrap();
            assert_eq!(report.back_buffer, frame % FRAME_COUNT);
            assert!(report.fence_value > previous);
            assert_eq!(report.fence_value.value(), frame as u64 + 1);
            assert_eq!(pacer.frame_index(), backend.current_back_buffer());
            assert!(!report.waited);
            previous = report.fence_value;
        }
        assert_eq!(pacer.frames_submitted(), 5);
        assert_eq!(pacer.fence().next_value().value(), 6);
        assert!(backend.calls.iter().all(|c| !matches!(c, Call::Wait(_))));
        assert!(backend.calls.contains(&Call::Present(0)));
    }

    #[test]
    fn test_completed_value_catches_up_after_wait() {
        let mut backend = MockBackend { fence: MockFence { lagging: true, ..Default::default() }, ..MockBackend::new() };
        let mut pacer = FramePacer::new(1, START, CLEAR, 1);

        for _ in 0..3 {
            let report = pacer.render(&mut backend).unwrap();
            assert!(backend.completed_value() >= report.fence_value);
        }
    }

    #[test]
    fn test_failure_stops_sequence() {
        for (step, last) in [
            ("reset", None),
            ("close", Some(Call::Transition(0, ResourceState::RenderTarget, ResourceState::Present))),
            ("execute", Some(Call::Close)),
            ("present", Some(Call::Execute)),
        ] {
            let mut backend = MockBackend { fail_at: Some(step), ..MockBackend::new() };
            let mut pacer = FramePacer::new(0, START, CLEAR, 1);

            assert!(pacer.render(&mut backend).is_err(), "{} should fail", step);
            assert_eq!(backend.calls.last().cloned(), last, "after {} failure", step);
            assert!(backend.fence.signals.is_empty());
            assert_eq!(pacer.fence().next_value().value(), 1);
            assert_eq!(pacer.frame_index(), 0);
        }
    }

    #[test]
    fn test_failed_signal_does_not_advance() {
        let mut backend = MockBackend { fence: MockFence { fail_signal: true, ..Default::default() }, ..MockBackend::new() };
        let mut pacer = FramePacer::new(0, START, CLEAR, 1);

        assert!(pacer.render(&mut backend).is_err());
        assert_eq!(backend.calls.last(), Some(&Call::Present(1)));
        assert_eq!(pacer.fence().next_value().value(), 1);
        // 后台缓冲区索引只在等待完成后才更新
        assert_eq!(pacer.frame_index(), 0);
    }

    #[test]
    fn test_missing_extent_aborts_before_recording() {
        let mut backend = MockBackend { extent: None, ..MockBackend::new() };
        let mut pacer = FramePacer::new(0, START, CLEAR, 1);

        assert!(pacer.render(&mut backend).is_err());
        assert_eq!(backend.calls, vec![Call::Reset]);
    }

    #[test]
    fn test_flush_uses_next_fence_value() {
        let mut backend = MockBackend::new();
        let mut pacer = FramePacer::new(0, START, CLEAR, 1);
        pacer.render(&mut backend).unwrap();

        let mut fence = MockFence { lagging: true, ..Default::default() };
        let value = pacer.flush(&mut fence).unwrap();
        assert_eq!(value.value(), 2);
        assert_eq!(fence.waits, vec![2]);
        assert_eq!(pacer.fence().next_value().value(), 3);
    }

    #[test]
    fn test_viewport_and_scissor_cover_buffer() {
        let extent = Extent::new(1280, 720);
        let viewport = Viewport::covering(extent);
        assert_eq!(viewport.width, 1280.0);
        assert_eq!(viewport.height, 720.0);
        assert_eq!(viewport.min_depth, 0.0);
        assert_eq!(viewport.max_depth, 1.0);

        let scissor = ScissorRect::covering(extent);
        assert_eq!(scissor, ScissorRect { left: 0, top: 0, right: 1280, bottom: 720 });

        assert!(Extent::new(0, 720).is_empty());
        assert!(!extent.is_empty());
    }

    #[test]
    fn test_minimize_then_restore() {
        let mut backend = MockBackend::new();
        let mut pacer = FramePacer::new(0, START, CLEAR, 1);

        let outcome = pacer.resize(&mut backend, Extent::new(0, 0)).unwrap();
        assert_eq!(outcome, ResizeOutcome::Minimized);
        assert!(pacer.swap_chain().is_minimized());
        assert_eq!(pacer.swap_chain().extent(), START);
        assert_eq!(pacer.render_if_visible(&mut backend).unwrap(), None);
        assert!(backend.calls.is_empty());

        // 还原到原尺寸不需要重建交换链
        let outcome = pacer.resize(&mut backend, START).unwrap();
        assert_eq!(outcome, ResizeOutcome::Unchanged);
        assert!(!pacer.swap_chain().is_minimized());
        assert!(backend.calls.is_empty());

        let report = pacer.render_if_visible(&mut backend).unwrap();
        assert_eq!(report.map(|r| r.back_buffer), Some(0));
        assert_eq!(backend.calls.last(), Some(&Call::Signal(1)));
    }

    #[test]
    fn test_zero_width_alone_counts_as_minimized() {
        let mut backend = MockBackend::new();
        let mut pacer = FramePacer::new(0, START, CLEAR, 1);

        assert_eq!(pacer.resize(&mut backend, Extent::new(0, 600)).unwrap(), ResizeOutcome::Minimized);
        assert_eq!(pacer.resize(&mut backend, Extent::new(800, 0)).unwrap(), ResizeOutcome::Minimized);
        assert!(backend.calls.is_empty());
        assert_eq!(pacer.fence().next_value().value(), 1);
    }

    #[test]
    fn test_same_size_is_noop() {
        let mut backend = MockBackend::new();
        let mut pacer = FramePacer::new(0, START, CLEAR, 1);
        pacer.render(&mut backend).unwrap();
        backend.calls.clear();

        assert_eq!(pacer.resize(&mut backend, START).unwrap(), ResizeOutcome::Unchanged);
        assert!(backend.calls.is_empty());
        assert_eq!(pacer.frame_index(), 1);
        assert_eq!(pacer.fence().next_value().value(), 2);
    }

    #[test]
    fn test_resize_flushes_then_rereads_back_buffer() {
        let mut backend = MockBackend { fence: MockFence { lagging: true, ..Default::default() }, ..MockBackend::new() };
        let mut pacer = FramePacer::new(0, START, CLEAR, 1);
        pacer.render(&mut backend).unwrap();
        assert_eq!(pacer.frame_index(), 1);
        backend.calls.clear();

        let larger = Extent::new(1024, 768);
        assert_eq!(pacer.resize(&mut backend, larger).unwrap(), ResizeOutcome::Recreated(larger));
        assert_eq!(backend.calls, vec![Call::Signal(2), Call::Wait(2), Call::Resize(larger)]);
        assert_eq!(pacer.swap_chain().extent(), larger);
        assert_eq!(pacer.frame_index(), 0);

        backend.calls.clear();
        let report = pacer.render(&mut backend).unwrap();
        assert_eq!(report.back_buffer, 0);
        assert_eq!(backend.calls[1], Call::Viewport(Viewport::covering(larger), ScissorRect::covering(larger)));
    }

    #[test]
    fn test_resize_after_minimize_to_new_size_recreates() {
        let mut backend = MockBackend::new();
        let mut pacer = FramePacer::new(0, START, CLEAR, 1);

        pacer.resize(&mut backend, Extent::new(0, 0)).unwrap();
        let restored = Extent::new(640, 480);
        assert_eq!(pacer.resize(&mut backend, restored).unwrap(), ResizeOutcome::Recreated(restored));
        assert!(!pacer.swap_chain().is_minimized());
        assert!(pacer.render_if_visible(&mut backend).unwrap().is_some());
    }

    #[test]
    fn test_failed_resize_keeps_previous_extent() {
        let mut backend = MockBackend { fail_at: Some("resize"), ..MockBackend::new() };
        let mut pacer = FramePacer::new(0, START, CLEAR, 1);

        assert!(pacer.resize(&mut backend, Extent::new(1024, 768)).is_err());
        assert_eq!(pacer.swap_chain().extent(), START);
        assert!(backend.calls.iter().all(|c| !matches!(c, Call::Resize(_))));
        // 等待已经完成，围栏值不会被重复使用
        assert_eq!(pacer.fence().next_value().value(), 2);
    }
}
