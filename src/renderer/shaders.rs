//! 着色器定义
//!
//! 三角形管线使用的 HLSL 源码。源码以文本形式嵌入二进制，
//! 在运行时由 DX12 后端调用 `D3DCompile` 编译为字节码。
//!
//! # 渲染管线
//!
//! ```text
//! 顶点数据 -> 顶点着色器 -> 图元装配 -> 光栅化 -> 像素着色器 -> 渲染目标
//! ```

use std::ffi::CStr;

/// 着色器阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Pixel,
}

/// 一段待编译的着色器源码
#[derive(Debug, Clone, Copy)]
pub struct ShaderSource {
    /// 着色器阶段
    pub stage: ShaderStage,
    /// 调试用名称
    pub name: &'static str,
    /// HLSL 源码
    pub source: &'static str,
    /// 入口函数名
    pub entry_point: &'static CStr,
    /// 编译目标（shader model）
    pub target: &'static CStr,
}

/// 顶点着色器：把 2D 位置扩展为 `float4(pos, 0, 1)`，颜色原样传递
pub const VERTEX_SHADER: ShaderSource = ShaderSource {
    stage: ShaderStage::Vertex,
    name: "triangle_vs.hlsl",
    source: include_str!("shaders/triangle_vs.hlsl"),
    entry_point: c"main",
    target: c"vs_5_0",
};

/// 像素着色器：输出插值后的颜色，alpha 固定为 1
pub const PIXEL_SHADER: ShaderSource = ShaderSource {
    stage: ShaderStage::Pixel,
    name: "triangle_ps.hlsl",
    source: include_str!("shaders/triangle_ps.hlsl"),
    entry_point: c"main",
    target: c"ps_5_0",
};
