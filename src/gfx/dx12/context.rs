//! DirectX 12 设备上下文
//!
//! 封装设备、命令队列、交换链、RTV 描述符堆、命令分配器/列表以及 Fence。
//!
//! # 初始化流程
//!
//! 1. 启用调试层（可选）
//! 2. 创建 DXGI 工厂
//! 3. 选择第一个支持 Feature Level 11.0 的硬件适配器并创建设备
//! 4. 创建直接命令队列
//! 5. 创建 flip-discard 交换链，并禁用 Alt+Enter
//! 6. 创建 RTV 描述符堆和每个后台缓冲区的渲染目标视图
//! 7. 创建命令分配器
//! 8. 创建命令列表（创建后立即关闭）
//! 9. 创建 Fence 和等待事件

use std::ffi::c_void;
use tracing::{debug, info, warn};
use windows::core::Interface;
use windows::Win32::Foundation::{CloseHandle, HANDLE, HWND, WAIT_OBJECT_0};
use windows::Win32::Graphics::Direct3D::D3D_FEATURE_LEVEL_11_0;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::Common::*;
use windows::Win32::Graphics::Dxgi::*;
use windows::Win32::System::Threading::{CreateEventA, WaitForSingleObject, INFINITE};
use winit::raw_window_handle::{HasWindowHandle, RawWindowHandle};
use winit::window::Window;

use super::graphics_error;
use crate::core::error::{GraphicsError, Result, TriangleError};
use crate::renderer::descriptor::DescriptorRange;
use crate::renderer::frame::{Extent, FRAME_COUNT};
use crate::renderer::sync::{FenceValue, GpuFence};

/// 后台缓冲区格式
pub const BACK_BUFFER_FORMAT: DXGI_FORMAT = DXGI_FORMAT_R8G8B8A8_UNORM;

/// DirectX 12 设备上下文
///
/// # 字段说明
///
/// - `device`：D3D12 设备，用于创建和管理 GPU 资源
/// - `command_queue`：直接命令队列
/// - `swap_chain`：交换链，管理两个后台缓冲区
/// - `rtv_descriptors`：RTV 堆中每个后台缓冲区对应的描述符位置
/// - `render_targets`：交换链的后台缓冲区资源
/// - `fence` / `fence_event`：CPU-GPU 同步
pub struct Dx12Context {
    pub device: ID3D12Device,
    pub command_queue: ID3D12CommandQueue,
    pub swap_chain: IDXGISwapChain3,
    pub rtv_heap: ID3D12DescriptorHeap,
    pub rtv_descriptors: DescriptorRange,
    pub render_targets: Vec<ID3D12Resource>,
    pub command_allocator: ID3D12CommandAllocator,
    pub command_list: ID3D12GraphicsCommandList,
    pub fence: ID3D12Fence,
    pub fence_event: HANDLE,
    pub adapter_name: String,
}

impl Dx12Context {
    /// 为窗口创建设备上下文
    ///
    /// * `width` / `height` - 交换链的初始尺寸（物理像素）
    /// * `debug_layer` - 是否尝试启用 D3D12 调试层
    pub fn new(window: &Window, width: u32, height: u32, debug_layer: bool) -> Result<Self> {
        let hwnd = window_hwnd(window)?;

        unsafe {
            // 1. 调试层：获取失败只记录警告
            let mut factory_flags = DXGI_CREATE_FACTORY_FLAGS(0);
            if debug_layer {
                let mut debug: Option<ID3D12Debug> = None;
                match D3D12GetDebugInterface(&mut debug) {
                    Ok(()) => {
                        if let Some(debug) = debug {
                            debug.EnableDebugLayer();
                            factory_flags = DXGI_CREATE_FACTORY_DEBUG;
                            debug!("DX12 Debug Layer enabled");
                        }
                    }
                    Err(e) => warn!("Failed to enable DX12 Debug Layer: {}", e),
                }
            }

            // 2. DXGI 工厂
            let factory: IDXGIFactory4 = CreateDXGIFactory2(factory_flags)
                .map_err(graphics_error(GraphicsError::DeviceCreation, "Failed to create DXGI factory"))?;

            // 3. 设备
            let (device, adapter_name) = create_device(&factory)?;
            info!(adapter = %adapter_name, "D3D12 Device created");

            // 4. 命令队列
            let queue_desc = D3D12_COMMAND_QUEUE_DESC {
                Type: D3D12_COMMAND_LIST_TYPE_DIRECT,
                Flags: D3D12_COMMAND_QUEUE_FLAG_NONE,
                ..Default::default()
            };
            let command_queue: ID3D12CommandQueue = device
                .CreateCommandQueue(&queue_desc)
                .map_err(graphics_error(GraphicsError::DeviceCreation, "Failed to create command queue"))?;

            // 5. 交换链
            let swap_chain_desc = DXGI_SWAP_CHAIN_DESC1 {
                Width: width,
                Height: height,
                Format: BACK_BUFFER_FORMAT,
                SampleDesc: DXGI_SAMPLE_DESC {
                    Count: 1,
                    ..Default::default()
                },
                BufferUsage: DXGI_USAGE_RENDER_TARGET_OUTPUT,
                BufferCount: FRAME_COUNT as u32,
                SwapEffect: DXGI_SWAP_EFFECT_FLIP_DISCARD,
                ..Default::default()
            };
            let swap_chain: IDXGISwapChain1 = factory
                .CreateSwapChainForHwnd(&command_queue, hwnd, &swap_chain_desc, None, None)
                .map_err(graphics_error(GraphicsError::SwapchainError, "Failed to create swap chain"))?;

            factory
                .MakeWindowAssociation(hwnd, DXGI_MWA_NO_ALT_ENTER)
                .map_err(graphics_error(GraphicsError::SwapchainError, "Failed to disable Alt+Enter"))?;

            let swap_chain: IDXGISwapChain3 = swap_chain
                .cast()
                .map_err(graphics_error(GraphicsError::SwapchainError, "Failed to cast swap chain to IDXGISwapChain3"))?;

            info!(width, height, buffers = FRAME_COUNT, "Swap chain created");

            // 6. RTV 描述符堆和渲染目标视图
            let rtv_heap_desc = D3D12_DESCRIPTOR_HEAP_DESC {
                NumDescriptors: FRAME_COUNT as u32,
                Type: D3D12_DESCRIPTOR_HEAP_TYPE_RTV,
                Flags: D3D12_DESCRIPTOR_HEAP_FLAG_NONE,
                NodeMask: 0,
            };
            let rtv_heap: ID3D12DescriptorHeap = device
                .CreateDescriptorHeap(&rtv_heap_desc)
                .map_err(graphics_error(GraphicsError::ResourceCreation, "Failed to create RTV heap"))?;
            let rtv_descriptors = DescriptorRange::new(
                rtv_heap.GetCPUDescriptorHandleForHeapStart().ptr,
                device.GetDescriptorHandleIncrementSize(D3D12_DESCRIPTOR_HEAP_TYPE_RTV),
                FRAME_COUNT as u32,
            );
            let render_targets = create_render_targets(&device, &swap_chain, &rtv_descriptors)?;

            // 7. 命令分配器
            let command_allocator: ID3D12CommandAllocator = device
                .CreateCommandAllocator(D3D12_COMMAND_LIST_TYPE_DIRECT)
                .map_err(graphics_error(GraphicsError::ResourceCreation, "Failed to create command allocator"))?;

            // 8. 命令列表：处于录制状态创建，关闭后等待第一帧 Reset
            let command_list: ID3D12GraphicsCommandList = device
                .CreateCommandList(0, D3D12_COMMAND_LIST_TYPE_DIRECT, &command_allocator, None::<&ID3D12PipelineState>)
                .map_err(graphics_error(GraphicsError::ResourceCreation, "Failed to create command list"))?;
            command_list
                .Close()
                .map_err(graphics_error(GraphicsError::CommandExecution, "Failed to close initial command list"))?;

            // 9. Fence 和等待事件（自动重置，初始未触发）
            let fence: ID3D12Fence = device
                .CreateFence(0, D3D12_FENCE_FLAG_NONE)
                .map_err(graphics_error(GraphicsError::Synchronization, "Failed to create fence"))?;
            let fence_event = CreateEventA(None, false, false, None)
                .map_err(graphics_error(GraphicsError::Synchronization, "Failed to create fence event"))?;

            debug!("Synchronization objects created");
            info!("DX12 Backend initialization complete");

            Ok(Self {
                device,
                command_queue,
                swap_chain,
                rtv_heap,
                rtv_descriptors,
                render_targets,
                command_allocator,
                command_list,
                fence,
                fence_event,
                adapter_name,
            })
        }
    }

    /// 交换链当前的后台缓冲区索引
    pub fn current_back_buffer_index(&self) -> usize {
        unsafe { self.swap_chain.GetCurrentBackBufferIndex() as usize }
    }

    /// 后台缓冲区 `index` 的 RTV
    ///
    /// # Panics
    ///
    /// `index` 必须小于 `FRAME_COUNT`，和切片下标一样越界时 panic。
    pub fn rtv_handle(&self, index: usize) -> D3D12_CPU_DESCRIPTOR_HANDLE {
        match self.rtv_descriptors.handle(index) {
            Some(handle) => D3D12_CPU_DESCRIPTOR_HANDLE { ptr: handle.ptr },
            None => panic!("RTV index {} out of range ({} descriptors)", index, self.rtv_descriptors.len()),
        }
    }

    /// 后台缓冲区 `index` 的尺寸
    pub fn render_target_extent(&self, index: usize) -> Result<Extent> {
        let resource = self.render_targets.get(index).ok_or_else(|| {
            TriangleError::Graphics(GraphicsError::ResourceCreation(format!(
                "Back buffer index {} out of range ({} buffers)",
                index,
                self.render_targets.len()
            )))
        })?;
        let desc = unsafe { resource.GetDesc() };
        Ok(Extent::new(desc.Width as u32, desc.Height))
    }

    /// 调整交换链缓冲区尺寸并重建 RTV
    ///
    /// 调用前 GPU 必须已经空闲，且不能再持有任何后台缓冲区的引用。
    ///
    /// ResizeBuffers 要求先释放所有后台缓冲区，所以返回 `Err` 后上下文没有可用的渲染目标，
    /// 不能再用于绘制，只能被销毁。
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.render_targets.clear();

        unsafe {
            self.swap_chain
                .ResizeBuffers(FRAME_COUNT as u32, width, height, BACK_BUFFER_FORMAT, DXGI_SWAP_CHAIN_FLAG(0))
                .map_err(graphics_error(GraphicsError::SwapchainError, "Failed to resize swap chain buffers"))?;
        }

        self.render_targets = create_render_targets(&self.device, &self.swap_chain, &self.rtv_descriptors)?;

        debug!(width, height, "Swap chain resized");
        Ok(())
    }
}

impl GpuFence for Dx12Context {
    fn signal(&mut self, value: FenceValue) -> Result<()> {
        unsafe { self.command_queue.Signal(&self.fence, value.value()) }
            .map_err(graphics_error(GraphicsError::Synchronization, "Failed to signal fence"))
    }

    fn completed_value(&self) -> FenceValue {
        FenceValue::new(unsafe { self.fence.GetCompletedValue() })
    }

    fn wait_for(&mut self, value: FenceValue) -> Result<()> {
        unsafe {
            self.fence
                .SetEventOnCompletion(value.value(), self.fence_event)
                .map_err(graphics_error(GraphicsError::Synchronization, "Failed to set fence event"))?;

            if WaitForSingleObject(self.fence_event, INFINITE) != WAIT_OBJECT_0 {
                return Err(TriangleError::Graphics(GraphicsError::Synchronization(format!(
                    "Failed to wait for fence value {}",
                    value.value()
                ))));
            }
        }
        Ok(())
    }
}

impl Drop for Dx12Context {
    fn drop(&mut self) {
        unsafe {
            if let Err(e) = CloseHandle(self.fence_event) {
                warn!("Failed to close fence event: {}", e);
            }
        }
        debug!("DX12 Context dropped");
    }
}

/// 从 winit 窗口取出 Win32 HWND
fn window_hwnd(window: &Window) -> Result<HWND> {
    let handle = window
        .window_handle()
        .map_err(|e| TriangleError::Initialization(format!("Failed to get window handle: {}", e)))?;

    match handle.as_raw() {
        RawWindowHandle::Win32(win32_handle) => Ok(HWND(win32_handle.hwnd.get() as *mut c_void)),
        _ => Err(TriangleError::Initialization(
            "Expected Win32 window handle on Windows platform".to_string(),
        )),
    }
}

/// 枚举适配器，跳过软件适配器，返回第一个能创建 Feature Level 11.0 设备的硬件适配器
unsafe fn create_device(factory: &IDXGIFactory4) -> Result<(ID3D12Device, String)> {
    for index in 0u32.. {
        let adapter = match factory.EnumAdapters1(index) {
            Ok(adapter) => adapter,
            // DXGI_ERROR_NOT_FOUND：已经枚举完
            Err(_) => break,
        };
        let desc = match adapter.GetDesc1() {
            Ok(desc) => desc,
            Err(_) => continue,
        };
        if (desc.Flags & DXGI_ADAPTER_FLAG_SOFTWARE.0 as u32) != 0 {
            continue;
        }

        let name = adapter_description(&desc.Description);
        let mut device: Option<ID3D12Device> = None;
        match D3D12CreateDevice(&adapter, D3D_FEATURE_LEVEL_11_0, &mut device) {
            Ok(()) => {
                if let Some(device) = device {
                    return Ok((device, name));
                }
            }
            Err(e) => debug!(adapter = %name, error = %e, "Adapter rejected feature level 11.0"),
        }
    }

    debug!("No hardware adapter supports Direct3D 12 at feature level 11.0");
    Err(TriangleError::Graphics(GraphicsError::DeviceCreation(
        "Failed to create D3D12 device".to_string(),
    )))
}

fn adapter_description(description: &[u16]) -> String {
    let len = description.iter().position(|&c| c == 0).unwrap_or(description.len());
    String::from_utf16_lossy(&description[..len])
}

/// 取出交换链的所有后台缓冲区，并在 RTV 堆中依次创建渲染目标视图
unsafe fn create_render_targets(
    device: &ID3D12Device,
    swap_chain: &IDXGISwapChain3,
    rtv_descriptors: &DescriptorRange,
) -> Result<Vec<ID3D12Resource>> {
    let mut render_targets = Vec::with_capacity(rtv_descriptors.len());

    for index in 0..rtv_descriptors.len() {
        let surface: ID3D12Resource = swap_chain
            .GetBuffer(index as u32)
            .map_err(graphics_error(GraphicsError::ResourceCreation, "Failed to get swap chain buffer"))?;
        if let Some(handle) = rtv_descriptors.handle(index) {
            device.CreateRenderTargetView(&surface, None, D3D12_CPU_DESCRIPTOR_HANDLE { ptr: handle.ptr });
        }
        render_targets.push(surface);
    }

    Ok(render_targets)
}
