//! 顶点数据定义
//!
//! 本模块定义了三角形使用的顶点结构体以及与之对应的输入布局描述。
//!
//! # 设计说明
//!
//! - 使用 `#[repr(C)]` 确保内存布局与 HLSL 输入布局一致
//! - 实现 `Pod` 和 `Zeroable` trait 以支持直接拷贝到上传堆
//! - 输入布局用与 API 无关的 `VertexFormat` 描述，由 DX12 后端映射为 DXGI 格式

use bytemuck::{Pod, Zeroable};
use std::ffi::CStr;

/// 顶点结构体
///
/// # 内存布局
///
/// - `position`：前 8 字节（2 个 f32）
/// - `color`：后 12 字节（3 个 f32）
///
/// 总大小：20 字节
#[repr(C)]
#[derive(Default, Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// 顶点位置（裁剪空间 2D 坐标）
    pub position: [f32; 2],
    /// 顶点颜色（RGB，范围 0.0-1.0）
    pub color: [f32; 3],
}

impl Vertex {
    /// 创建一个新顶点
    pub const fn new(px: f32, py: f32, r: f32, g: f32, b: f32) -> Self {
        Self {
            position: [px, py],
            color: [r, g, b],
        }
    }

    /// 顶点步长（字节）
    pub const STRIDE: u32 = std::mem::size_of::<Vertex>() as u32;
}

/// 顶点属性的数据格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexFormat {
    /// 两个 32 位浮点数
    Float32x2,
    /// 三个 32 位浮点数
    Float32x3,
}

impl VertexFormat {
    /// 该格式占用的字节数
    pub const fn size(self) -> u32 {
        match self {
            VertexFormat::Float32x2 => 8,
            VertexFormat::Float32x3 => 12,
        }
    }
}

/// 单个顶点属性的描述（对应 HLSL 语义）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// HLSL 语义名
    pub semantic: &'static CStr,
    /// 数据格式
    pub format: VertexFormat,
    /// 在顶点内的字节偏移
    pub offset: u32,
}

/// 三角形管线的输入布局：位置 + 颜色，单一输入槽，逐顶点数据
pub const VERTEX_ATTRIBUTES: [VertexAttribute; 2] = [
    VertexAttribute {
        semantic: c"POSITION",
        format: VertexFormat::Float32x2,
        offset: 0,
    },
    VertexAttribute {
        semantic: c"COLOR",
        format: VertexFormat::Float32x3,
        offset: 8,
    },
];

/// 演示三角形：顶部红色、右下绿色、左下蓝色（顺时针，正面朝向观察者）
pub const TRIANGLE_VERTICES: [Vertex; 3] = [
    Vertex::new(0.0, 0.5, 1.0, 0.0, 0.0),
    Vertex::new(0.5, -0.5, 0.0, 1.0, 0.0),
    Vertex::new(-0.5, -0.5, 0.0, 0.0, 1.0),
];

/// 顶点缓冲区的总字节数
pub fn vertex_buffer_size(vertices: &[Vertex]) -> u32 {
    std::mem::size_of_val(vertices) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(mem::size_of::<Vertex>(), 20, "Vertex size should be 20 bytes");
        assert_eq!(mem::align_of::<Vertex>(), 4, "Vertex alignment should be 4 bytes");
        assert_eq!(Vertex::STRIDE, 20);

        let vertex = Vertex::default();
        let vertex_ptr = &vertex as *const Vertex as usize;
        let position_ptr = &vertex.position as *const [f32; 2] as usize;
        let color_ptr = &vertex.color as *const [f32; 3] as usize;

        assert_eq!(position_ptr - vertex_ptr, 0, "position should be at offset 0");
        assert_eq!(color_ptr - vertex_ptr, 8, "color should be at offset 8");
    }

    #[test]
    fn test_attributes_match_struct() {
        assert_eq!(VERTEX_ATTRIBUTES[0].offset, 0);
        assert_eq!(VERTEX_ATTRIBUTES[1].offset, VERTEX_ATTRIBUTES[0].format.size());

        let total: u32 = VERTEX_ATTRIBUTES.iter().map(|a| a.format.size()).sum();
        assert_eq!(total, Vertex::STRIDE);
    }

    #[test]
    fn test_triangle_data() {
        assert_eq!(TRIANGLE_VERTICES.len(), 3);
        assert_eq!(TRIANGLE_VERTICES[0].position, [0.0, 0.5]);
        assert_eq!(TRIANGLE_VERTICES[0].color, [1.0, 0.0, 0.0]);
        assert_eq!(TRIANGLE_VERTICES[1].color, [0.0, 1.0, 0.0]);
        assert_eq!(TRIANGLE_VERTICES[2].color, [0.0, 0.0, 1.0]);
        assert_eq!(vertex_buffer_size(&TRIANGLE_VERTICES), 60);
    }

    #[test]
    fn test_triangle_is_clockwise() {
        // 顺时针 = 有向面积为负（y 轴向上），光栅化状态依赖这一点做背面剔除
        let [a, b, c] = TRIANGLE_VERTICES.map(|v| v.position);
        let signed_area = (b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1]);
        assert!(signed_area < 0.0);
    }

    #[test]
    fn test_pod_bytes() {
        let bytes: &[u8] = bytemuck::cast_slice(&TRIANGLE_VERTICES);
        assert_eq!(bytes.len(), 60);

        let zero: Vertex = Zeroable::zeroed();
        assert_eq!(zero, Vertex::default());
    }
}
