//! 统一的渲染后端接口
//!
//! 具体的图形后端（目前只有 DirectX 12）实现此 trait，
//! 由 [`crate::renderer::Renderer`] 以 trait object 的形式持有。

use crate::core::error::Result;

/// 统一的渲染后端接口
///
/// # 方法说明
///
/// - `resize()`: 处理窗口尺寸变化
/// - `update()`: 每帧的逻辑更新钩子
/// - `draw()`: 渲染一帧画面
pub trait RenderBackend {
    /// 后端名称，用于日志输出
    fn backend_name(&self) -> &'static str;

    /// 窗口尺寸变化时调用
    ///
    /// 宽或高为 0（最小化）时后端应跳过交换链重建。
    fn resize(&mut self, width: u32, height: u32) -> Result<()>;

    /// 每帧渲染前调用的逻辑更新
    ///
    /// # 参数
    ///
    /// * `delta_time` - 距离上一帧的时间间隔（秒）
    fn update(&mut self, delta_time: f32);

    /// 渲染一帧画面
    ///
    /// 包括命令记录、提交、呈现以及等待 GPU 完成。
    fn draw(&mut self) -> Result<()>;
}
