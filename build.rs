/// Build script for hello_triangle
///
/// HLSL 源码通过 include_str! 嵌入，运行时由 D3DCompile 编译。
/// 着色器文件变化时需要重新构建。
fn main() {
    println!("cargo:rerun-if-changed=src/renderer/shaders/triangle_vs.hlsl");
    println!("cargo:rerun-if-changed=src/renderer/shaders/triangle_ps.hlsl");
}
