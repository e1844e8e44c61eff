//! Shared GPU helpers for the effect pipelines.

/// Straight-alpha blending.
///
/// The dither pass emits straight alpha and the composite passes carry it
/// through, so every pipeline blends `src·a + dst·(1−a)` with additive
/// alpha accumulation.
pub(super) fn alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

/// `wgpu` minimum binding size for a uniform struct.
///
/// Uniform structs are non-empty by construction; centralising this avoids
/// an `.unwrap()` at each pipeline-creation site.
pub(super) fn ubo_min_binding_size<T>() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(std::mem::size_of::<T>() as u64)
        .expect("uniform struct has non-zero size by construction")
}

/// Primitive state for the fullscreen-triangle passes.
pub(super) fn fullscreen_primitive() -> wgpu::PrimitiveState {
    wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::TriangleList,
        strip_index_format: None,
        front_face: wgpu::FrontFace::Ccw,
        cull_mode: None,
        polygon_mode: wgpu::PolygonMode::Fill,
        unclipped_depth: false,
        conservative: false,
    }
}
