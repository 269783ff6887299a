//! 三角形渲染管线
//!
//! 创建空根签名、编译 HLSL、组装 PSO，并把三个顶点上传到上传堆中的顶点缓冲区。

use tracing::{debug, info};
use windows::core::PCSTR;
use windows::Win32::Graphics::Direct3D::Fxc::D3DCompile;
use windows::Win32::Graphics::Direct3D::ID3DBlob;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::Common::*;

use super::context::BACK_BUFFER_FORMAT;
use super::graphics_error;
use crate::core::error::{GraphicsError, Result, TriangleError};
use crate::renderer::shaders::{ShaderSource, PIXEL_SHADER, VERTEX_SHADER};
use crate::renderer::vertex::{vertex_buffer_size, Vertex, VertexFormat, TRIANGLE_VERTICES, VERTEX_ATTRIBUTES};

/// 三角形管线持有的 GPU 对象
pub struct TrianglePipeline {
    pub root_signature: ID3D12RootSignature,
    pub pipeline_state: ID3D12PipelineState,
    /// 上传堆中的顶点缓冲区，必须比 `vertex_buffer_view` 活得久
    pub vertex_buffer: ID3D12Resource,
    pub vertex_buffer_view: D3D12_VERTEX_BUFFER_VIEW,
}

impl TrianglePipeline {
    pub fn new(device: &ID3D12Device) -> Result<Self> {
        let root_signature = create_root_signature(device)?;
        debug!("Root signature created");

        let vs_blob = compile_shader(&VERTEX_SHADER)?;
        let ps_blob = compile_shader(&PIXEL_SHADER)?;
        debug!("Shaders compiled");

        let pipeline_state = create_pipeline_state(device, &root_signature, &vs_blob, &ps_blob)?;
        let (vertex_buffer, vertex_buffer_view) = create_vertex_buffer(device, &TRIANGLE_VERTICES)?;

        info!(
            vertices = TRIANGLE_VERTICES.len(),
            stride = vertex_buffer_view.StrideInBytes,
            size = vertex_buffer_view.SizeInBytes,
            "Triangle pipeline created"
        );

        Ok(Self {
            root_signature,
            pipeline_state,
            vertex_buffer,
            vertex_buffer_view,
        })
    }
}

/// 空根签名，只允许输入装配器的输入布局
fn create_root_signature(device: &ID3D12Device) -> Result<ID3D12RootSignature> {
    let desc = D3D12_ROOT_SIGNATURE_DESC {
        NumParameters: 0,
        pParameters: std::ptr::null(),
        NumStaticSamplers: 0,
        pStaticSamplers: std::ptr::null(),
        Flags: D3D12_ROOT_SIGNATURE_FLAG_ALLOW_INPUT_ASSEMBLER_INPUT_LAYOUT,
    };

    unsafe {
        let mut signature: Option<ID3DBlob> = None;
        let mut error: Option<ID3DBlob> = None;
        if let Err(e) = D3D12SerializeRootSignature(&desc, D3D_ROOT_SIGNATURE_VERSION_1, &mut signature, Some(&mut error)) {
            let message = error.as_ref().map(blob_text).unwrap_or_else(|| e.to_string());
            return Err(TriangleError::Graphics(GraphicsError::ResourceCreation(format!(
                "Failed to serialize root signature: {}",
                message
            ))));
        }
        let signature = signature.ok_or_else(|| {
            TriangleError::Graphics(GraphicsError::ResourceCreation(
                "Root signature serialization returned no blob".to_string(),
            ))
        })?;

        let bytes = std::slice::from_raw_parts(signature.GetBufferPointer() as *const u8, signature.GetBufferSize());
        device
            .CreateRootSignature(0, bytes)
            .map_err(graphics_error(GraphicsError::ResourceCreation, "Failed to create root signature"))
    }
}

/// 用 FXC 编译一段 HLSL，失败时带上编译器的诊断信息
fn compile_shader(shader: &ShaderSource) -> Result<ID3DBlob> {
    unsafe {
        let mut blob: Option<ID3DBlob> = None;
        let mut error: Option<ID3DBlob> = None;

        let result = D3DCompile(
            shader.source.as_ptr() as _,
            shader.source.len(),
            None,
            None,
            None,
            PCSTR(shader.entry_point.as_ptr().cast()),
            PCSTR(shader.target.as_ptr().cast()),
            0,
            0,
            &mut blob,
            Some(&mut error),
        );

        if let Err(e) = result {
            let message = error.as_ref().map(blob_text).unwrap_or_else(|| e.to_string());
            return Err(TriangleError::Graphics(GraphicsError::ShaderCompilation(format!(
                "{} ({:?}): {}",
                shader.name, shader.stage, message
            ))));
        }

        blob.ok_or_else(|| {
            TriangleError::Graphics(GraphicsError::ShaderCompilation(format!(
                "{}: compiler returned no bytecode",
                shader.name
            )))
        })
    }
}

/// 编译器/序列化器错误 blob 中的文本
fn blob_text(blob: &ID3DBlob) -> String {
    let bytes = unsafe { std::slice::from_raw_parts(blob.GetBufferPointer() as *const u8, blob.GetBufferSize()) };
    String::from_utf8_lossy(bytes).trim_end_matches('\0').trim().to_string()
}

fn dxgi_format(format: VertexFormat) -> DXGI_FORMAT {
    match format {
        VertexFormat::Float32x2 => DXGI_FORMAT_R32G32_FLOAT,
        VertexFormat::Float32x3 => DXGI_FORMAT_R32G32B32_FLOAT,
    }
}

fn create_pipeline_state(
    device: &ID3D12Device,
    root_signature: &ID3D12RootSignature,
    vs_blob: &ID3DBlob,
    ps_blob: &ID3DBlob,
) -> Result<ID3D12PipelineState> {
    // 语义名指向 'static CStr，只要求在 CreateGraphicsPipelineState 期间有效
    let input_element_descs = VERTEX_ATTRIBUTES.map(|attribute| D3D12_INPUT_ELEMENT_DESC {
        SemanticName: PCSTR(attribute.semantic.as_ptr().cast()),
        SemanticIndex: 0,
        Format: dxgi_format(attribute.format),
        InputSlot: 0,
        AlignedByteOffset: attribute.offset,
        InputSlotClass: D3D12_INPUT_CLASSIFICATION_PER_VERTEX_DATA,
        InstanceDataStepRate: 0,
    });

    let mut blend_state = D3D12_BLEND_DESC {
        AlphaToCoverageEnable: false.into(),
        IndependentBlendEnable: false.into(),
        ..Default::default()
    };
    blend_state.RenderTarget[0] = D3D12_RENDER_TARGET_BLEND_DESC {
        BlendEnable: false.into(),
        LogicOpEnable: false.into(),
        SrcBlend: D3D12_BLEND_ONE,
        DestBlend: D3D12_BLEND_ZERO,
        BlendOp: D3D12_BLEND_OP_ADD,
        SrcBlendAlpha: D3D12_BLEND_ONE,
        DestBlendAlpha: D3D12_BLEND_ZERO,
        BlendOpAlpha: D3D12_BLEND_OP_ADD,
        LogicOp: D3D12_LOGIC_OP_NOOP,
        RenderTargetWriteMask: D3D12_COLOR_WRITE_ENABLE_ALL.0 as u8,
    };

    // 顶点按顺时针排列，剔除背面
    let rasterizer_state = D3D12_RASTERIZER_DESC {
        FillMode: D3D12_FILL_MODE_SOLID,
        CullMode: D3D12_CULL_MODE_BACK,
        FrontCounterClockwise: false.into(),
        DepthBias: D3D12_DEFAULT_DEPTH_BIAS as i32,
        DepthBiasClamp: D3D12_DEFAULT_DEPTH_BIAS_CLAMP,
        SlopeScaledDepthBias: D3D12_DEFAULT_SLOPE_SCALED_DEPTH_BIAS,
        DepthClipEnable: true.into(),
        MultisampleEnable: false.into(),
        AntialiasedLineEnable: false.into(),
        ForcedSampleCount: 0,
        ConservativeRaster: D3D12_CONSERVATIVE_RASTERIZATION_MODE_OFF,
    };

    let mut pso_desc = D3D12_GRAPHICS_PIPELINE_STATE_DESC {
        InputLayout: D3D12_INPUT_LAYOUT_DESC {
            pInputElementDescs: input_element_descs.as_ptr(),
            NumElements: input_element_descs.len() as u32,
        },
        pRootSignature: unsafe { std::mem::transmute_copy(root_signature) },
        VS: D3D12_SHADER_BYTECODE {
            pShaderBytecode: unsafe { vs_blob.GetBufferPointer() },
            BytecodeLength: unsafe { vs_blob.GetBufferSize() },
        },
        PS: D3D12_SHADER_BYTECODE {
            pShaderBytecode: unsafe { ps_blob.GetBufferPointer() },
            BytecodeLength: unsafe { ps_blob.GetBufferSize() },
        },
        BlendState: blend_state,
        SampleMask: u32::MAX,
        RasterizerState: rasterizer_state,
        DepthStencilState: D3D12_DEPTH_STENCIL_DESC {
            DepthEnable: false.into(),
            StencilEnable: false.into(),
            ..Default::default()
        },
        PrimitiveTopologyType: D3D12_PRIMITIVE_TOPOLOGY_TYPE_TRIANGLE,
        NumRenderTargets: 1,
        SampleDesc: DXGI_SAMPLE_DESC { Count: 1, Quality: 0 },
        ..Default::default()
    };
    pso_desc.RTVFormats[0] = BACK_BUFFER_FORMAT;

    // pRootSignature 是 ManuallyDrop，借用的根签名不会被 pso_desc 释放
    unsafe { device.CreateGraphicsPipelineState(&pso_desc) }
        .map_err(graphics_error(GraphicsError::ResourceCreation, "Failed to create pipeline state"))
}

/// 在上传堆中创建顶点缓冲区并写入顶点数据
fn create_vertex_buffer(device: &ID3D12Device, vertices: &[Vertex]) -> Result<(ID3D12Resource, D3D12_VERTEX_BUFFER_VIEW)> {
    let size = vertex_buffer_size(vertices);

    let heap_props = D3D12_HEAP_PROPERTIES {
        Type: D3D12_HEAP_TYPE_UPLOAD,
        ..Default::default()
    };
    let resource_desc = D3D12_RESOURCE_DESC {
        Dimension: D3D12_RESOURCE_DIMENSION_BUFFER,
        Width: size as u64,
        Height: 1,
        DepthOrArraySize: 1,
        MipLevels: 1,
        SampleDesc: DXGI_SAMPLE_DESC { Count: 1, Quality: 0 },
        Layout: D3D12_TEXTURE_LAYOUT_ROW_MAJOR,
        ..Default::default()
    };

    unsafe {
        let mut vertex_buffer: Option<ID3D12Resource> = None;
        device
            .CreateCommittedResource(
                &heap_props,
                D3D12_HEAP_FLAG_NONE,
                &resource_desc,
                D3D12_RESOURCE_STATE_GENERIC_READ,
                None,
                &mut vertex_buffer,
            )
            .map_err(graphics_error(GraphicsError::ResourceCreation, "Failed to create vertex buffer"))?;
        let vertex_buffer = vertex_buffer.ok_or_else(|| {
            TriangleError::Graphics(GraphicsError::ResourceCreation(
                "Vertex buffer creation returned no resource".to_string(),
            ))
        })?;

        // CPU 不读取该缓冲区
        let read_range = D3D12_RANGE { Begin: 0, End: 0 };
        let mut data = std::ptr::null_mut();
        vertex_buffer
            .Map(0, Some(&read_range), Some(&mut data))
            .map_err(graphics_error(GraphicsError::ResourceCreation, "Failed to map vertex buffer"))?;
        let bytes: &[u8] = bytemuck::cast_slice(vertices);
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), data as *mut u8, bytes.len());
        vertex_buffer.Unmap(0, None);

        let vertex_buffer_view = D3D12_VERTEX_BUFFER_VIEW {
            BufferLocation: vertex_buffer.GetGPUVirtualAddress(),
            StrideInBytes: Vertex::STRIDE,
            SizeInBytes: size,
        };

        Ok((vertex_buffer, vertex_buffer_view))
    }
}
