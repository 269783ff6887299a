//! hello_triangle - DirectX 12 三角形示例
//!
//! # 使用方法
//!
//! ```bash
//! # 使用配置文件
//! cargo run
//!
//! # 命令行覆盖
//! cargo run -- --width 1280 --height 720 --no-vsync
//! ```
//!
//! # 架构概览
//!
//! ```text
//! ┌─────────────┐
//! │   main.rs   │  窗口和事件循环
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Renderer   │  统一渲染接口 + 帧提交协议
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │    DX12     │  设备、交换链、管线
//! └─────────────┘
//! ```

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use hello_triangle::core::{log, Config};
use hello_triangle::renderer::Renderer;
use tracing::{debug, error, info};
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::EventLoop;
use winit::window::WindowBuilder;

/// 应用程序入口点
///
/// # 初始化流程
///
/// 1. 加载配置文件（config.toml）并应用命令行参数
/// 2. 验证配置
/// 3. 初始化日志系统
/// 4. 创建事件循环、窗口和渲染器
/// 5. 启动主循环
///
/// # 事件处理
///
/// - `WindowEvent::CloseRequested`：用户关闭窗口，退出程序
/// - `WindowEvent::Resized`：窗口大小改变，通知渲染器重建交换链缓冲区
/// - `Event::AboutToWait`：请求重绘
/// - `WindowEvent::RedrawRequested`：更新并绘制一帧
fn main() -> anyhow::Result<()> {
    // 1. 加载配置（在初始化日志之前）
    let mut config = Config::from_file_or_default("config.toml");
    config.apply_args(std::env::args().skip(1));

    // 2. 验证配置
    config.validate().context("Invalid configuration")?;

    // 3. 初始化日志系统
    let log_file = config.logging.file_output.then_some(config.logging.log_file.as_str());
    log::init_logger(config.logging.level, config.logging.file_output, log_file)
        .context("Failed to initialize logging")?;

    info!(version = env!("CARGO_PKG_VERSION"), "hello_triangle starting...");
    info!(
        width = config.window.width,
        height = config.window.height,
        vsync = config.graphics.vsync,
        debug_layer = config.graphics.debug_layer,
        "Graphics configuration"
    );

    // 4. 事件循环、窗口和渲染器
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window.title.as_str())
            .with_inner_size(LogicalSize::new(config.window.width, config.window.height))
            .with_resizable(config.window.resizable)
            .build(&event_loop)
            .context("Failed to create window")?,
    );

    let mut renderer = Renderer::new(window.clone(), &config).context("Failed to initialize renderer")?;
    info!("Entering main loop...");

    // 5. 主循环；绘制失败时保存错误并退出
    let mut draw_error = None;
    let mut last_frame = Instant::now();

    event_loop
        .run(|event, elwt| match event {
            Event::WindowEvent { event, window_id } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!("Close requested, shutting down...");
                    elwt.exit();
                }
                WindowEvent::Resized(new_size) => {
                    debug!(width = new_size.width, height = new_size.height, "Window resized");
                    if let Err(e) = renderer.resize(new_size.width, new_size.height) {
                        error!("Resize failed: {}", e);
                        draw_error = Some(e);
                        elwt.exit();
                    }
                }
                WindowEvent::RedrawRequested => {
                    let now = Instant::now();
                    renderer.update(now.duration_since(last_frame).as_secs_f32());
                    last_frame = now;

                    if let Err(e) = renderer.draw() {
                        error!("Draw failed: {}", e);
                        draw_error = Some(e);
                        elwt.exit();
                    }
                }
                _ => (),
            },
            Event::AboutToWait => window.request_redraw(),
            _ => (),
        })
        .context("Event loop terminated abnormally")?;

    // 在报告结果之前释放渲染器（等待 GPU 空闲）
    drop(renderer);

    match draw_error {
        Some(e) => Err(anyhow::Error::new(e).context("Rendering stopped")),
        None => {
            info!("hello_triangle exited cleanly");
            Ok(())
        }
    }
}
