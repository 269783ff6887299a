//! DirectX 12 渲染器
//!
//! 把 [`Dx12Context`] 和 [`TrianglePipeline`] 接入与 API 无关的帧提交协议
//! （[`FramePacer`]），并实现 [`RenderBackend`]。

use std::mem::ManuallyDrop;
use std::sync::Arc;
use tracing::{debug, info, warn};
use windows::core::Interface;
use windows::Win32::Foundation::RECT;
use windows::Win32::Graphics::Direct3D::D3D_PRIMITIVE_TOPOLOGY_TRIANGLELIST;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::DXGI_PRESENT;
use winit::window::Window;

use super::graphics_error;
use super::{Dx12Context, TrianglePipeline};
use crate::core::error::{GraphicsError, Result};
use crate::core::Config;
use crate::renderer::backend_trait::RenderBackend;
use crate::renderer::frame::{
    DrawCall, Extent, FrameBackend, FramePacer, ResizeOutcome, ResourceState, ScissorRect, Viewport,
};
use crate::renderer::metrics::FrameMetrics;
use crate::renderer::sync::{FenceValue, GpuFence};

/// DirectX 12 渲染器
///
/// 每帧结束时等待 GPU 完成，所以只需要一个命令分配器。
pub struct Renderer {
    context: Dx12Context,
    pipeline: TrianglePipeline,
    pacer: FramePacer,
    metrics: FrameMetrics,
    /// 交换链引用窗口的 HWND，窗口必须最后释放
    _window: Arc<Window>,
}

impl Renderer {
    pub fn new(window: Arc<Window>, config: &Config) -> Result<Self> {
        let size = window.inner_size();
        let context = Dx12Context::new(&window, size.width, size.height, config.graphics.debug_layer)?;
        let pipeline = TrianglePipeline::new(&context.device)?;

        let pacer = FramePacer::new(
            context.current_back_buffer_index(),
            Extent::new(size.width, size.height),
            config.graphics.clear_color,
            config.graphics.sync_interval(),
        );

        info!(
            adapter = %context.adapter_name,
            vsync = config.graphics.vsync,
            frame_index = pacer.frame_index(),
            "DX12 Renderer initialized"
        );

        Ok(Self {
            context,
            pipeline,
            pacer,
            metrics: FrameMetrics::new(),
            _window: window,
        })
    }

    /// 等待 GPU 完成所有已提交的工作
    pub fn wait_for_gpu(&mut self) -> Result<()> {
        let value = self.pacer.flush(&mut self.context)?;
        debug!(fence_value = value.value(), "DX12 command queue flushed");
        Ok(())
    }
}

impl RenderBackend for Renderer {
    fn backend_name(&self) -> &'static str {
        "DirectX 12"
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        let mut frame = Dx12Frame {
            context: &mut self.context,
            pipeline: &self.pipeline,
        };
        match self.pacer.resize(&mut frame, Extent::new(width, height))? {
            ResizeOutcome::Minimized => debug!(width, height, "Window minimized, skipping swap chain resize"),
            ResizeOutcome::Unchanged => {}
            ResizeOutcome::Recreated(_) => info!(width, height, "Swapchain recreated"),
        }
        Ok(())
    }

    fn update(&mut self, _delta_time: f32) {
        if self.metrics.record_frame() {
            debug!(
                fps = self.metrics.fps(),
                frame_time_ms = self.metrics.frame_time_ms(),
                total_frames = self.metrics.total_frames(),
                "Frame statistics"
            );
        }
    }

    fn draw(&mut self) -> Result<()> {
        let mut frame = Dx12Frame {
            context: &mut self.context,
            pipeline: &self.pipeline,
        };
        self.pacer.render_if_visible(&mut frame)?;
        Ok(())
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        // GPU 可能仍在使用交换链和顶点缓冲区
        if let Err(e) = self.wait_for_gpu() {
            warn!("Failed to flush GPU before shutdown: {}", e);
        }
        debug!(frames = self.pacer.frames_submitted(), "DX12 Renderer dropped");
    }
}

/// 一帧内可变借用的上下文和只读的管线
struct Dx12Frame<'a> {
    context: &'a mut Dx12Context,
    pipeline: &'a TrianglePipeline,
}

impl Dx12Frame<'_> {
    fn transition_barrier(
        resource: &ID3D12Resource,
        before: D3D12_RESOURCE_STATES,
        after: D3D12_RESOURCE_STATES,
    ) -> D3D12_RESOURCE_BARRIER {
        D3D12_RESOURCE_BARRIER {
            Type: D3D12_RESOURCE_BARRIER_TYPE_TRANSITION,
            Flags: D3D12_RESOURCE_BARRIER_FLAG_NONE,
            Anonymous: D3D12_RESOURCE_BARRIER_0 {
                Transition: ManuallyDrop::new(D3D12_RESOURCE_TRANSITION_BARRIER {
                    pResource: ManuallyDrop::new(Some(resource.clone())),
                    Subresource: D3D12_RESOURCE_BARRIER_ALL_SUBRESOURCES,
                    StateBefore: before,
                    StateAfter: after,
                }),
            },
        }
    }
}

fn d3d12_state(state: ResourceState) -> D3D12_RESOURCE_STATES {
    match state {
        ResourceState::Present => D3D12_RESOURCE_STATE_PRESENT,
        ResourceState::RenderTarget => D3D12_RESOURCE_STATE_RENDER_TARGET,
    }
}

impl GpuFence for Dx12Frame<'_> {
    fn signal(&mut self, value: FenceValue) -> Result<()> {
        self.context.signal(value)
    }

    fn completed_value(&self) -> FenceValue {
        self.context.completed_value()
    }

    fn wait_for(&mut self, value: FenceValue) -> Result<()> {
        self.context.wait_for(value)
    }
}

impl FrameBackend for Dx12Frame<'_> {
    fn reset_commands(&mut self) -> Result<()> {
        unsafe {
            self.context
                .command_allocator
                .Reset()
                .map_err(graphics_error(GraphicsError::CommandExecution, "Failed to reset command allocator"))?;
            self.context
                .command_list
                .Reset(&self.context.command_allocator, &self.pipeline.pipeline_state)
                .map_err(graphics_error(GraphicsError::CommandExecution, "Failed to reset command list"))
        }
    }

    fn back_buffer_extent(&self, back_buffer: usize) -> Result<Extent> {
        self.context.render_target_extent(back_buffer)
    }

    fn set_viewport(&mut self, viewport: &Viewport, scissor: &ScissorRect) {
        let viewport = D3D12_VIEWPORT {
            TopLeftX: viewport.top_left_x,
            TopLeftY: viewport.top_left_y,
            Width: viewport.width,
            Height: viewport.height,
            MinDepth: viewport.min_depth,
            MaxDepth: viewport.max_depth,
        };
        let scissor = RECT {
            left: scissor.left,
            top: scissor.top,
            right: scissor.right,
            bottom: scissor.bottom,
        };
        unsafe {
            self.context.command_list.RSSetViewports(&[viewport]);
            self.context.command_list.RSSetScissorRects(&[scissor]);
        }
    }

    fn transition_back_buffer(&mut self, back_buffer: usize, before: ResourceState, after: ResourceState) {
        // back_buffer_extent 已经校验过索引
        let render_target = &self.context.render_targets[back_buffer];
        let barrier = Self::transition_barrier(render_target, d3d12_state(before), d3d12_state(after));
        unsafe {
            self.context.command_list.ResourceBarrier(std::slice::from_ref(&barrier));
            // 释放 barrier 中克隆的资源引用，否则 ResizeBuffers 会因为残留引用而失败
            let transition = ManuallyDrop::into_inner(barrier.Anonymous.Transition);
            drop(ManuallyDrop::into_inner(transition.pResource));
        }
    }

    fn bind_and_clear_target(&mut self, back_buffer: usize, clear_color: [f32; 4]) {
        let rtv_handle = self.context.rtv_handle(back_buffer);
        unsafe {
            self.context.command_list.OMSetRenderTargets(1, Some(&rtv_handle), false, None);
            self.context.command_list.ClearRenderTargetView(rtv_handle, &clear_color, None);
        }
    }

    fn bind_pipeline(&mut self) {
        unsafe {
            self.context.command_list.SetGraphicsRootSignature(&self.pipeline.root_signature);
            self.context.command_list.IASetPrimitiveTopology(D3D_PRIMITIVE_TOPOLOGY_TRIANGLELIST);
            self.context.command_list.IASetVertexBuffers(0, Some(&[self.pipeline.vertex_buffer_view]));
        }
    }

    fn draw(&mut self, call: DrawCall) {
        unsafe {
            self.context.command_list.DrawInstanced(call.vertex_count, call.instance_count, 0, 0);
        }
    }

    fn close_commands(&mut self) -> Result<()> {
        unsafe { self.context.command_list.Close() }
            .map_err(graphics_error(GraphicsError::CommandExecution, "Failed to close command list"))
    }

    fn execute_commands(&mut self) -> Result<()> {
        let command_list: ID3D12CommandList = self
            .context
            .command_list
            .cast()
            .map_err(graphics_error(GraphicsError::CommandExecution, "Failed to cast command list"))?;
        unsafe {
            self.context.command_queue.ExecuteCommandLists(&[Some(command_list)]);
        }
        Ok(())
    }

    fn present(&mut self, sync_interval: u32) -> Result<()> {
        unsafe { self.context.swap_chain.Present(sync_interval, DXGI_PRESENT(0)).ok() }
            .map_err(graphics_error(GraphicsError::SwapchainError, "Failed to present"))
    }

    fn current_back_buffer(&self) -> usize {
        self.context.current_back_buffer_index()
    }

    fn resize_buffers(&mut self, extent: Extent) -> Result<()> {
        self.context.resize(extent.width, extent.height)
    }
}
