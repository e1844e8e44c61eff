use pixelgrain_engine::coords::Viewport;

/// Device-pixel-ratio ceiling for effect render targets.
///
/// Rendering a dither pattern beyond 2× density is invisible and doubles the
/// fill cost, so the effect surface is capped and upscaled at composite.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Physical pixel dimensions of an effect's render surface for a swapchain
/// `viewport` at the window's `scale_factor`.
///
/// Equals the reference ("CSS") size times the capped ratio:
/// `viewport / scale_factor * min(scale_factor, MAX_PIXEL_RATIO)`.
pub fn effect_pixels(viewport: Viewport, scale_factor: f32) -> (u32, u32) {
    let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
    let ratio = scale.min(MAX_PIXEL_RATIO);
    let w = (viewport.width / scale * ratio).round().max(1.0) as u32;
    let h = (viewport.height / scale * ratio).round().max(1.0) as u32;
    (w, h)
}

/// Owned color target with a sampleable view.
///
/// Used for the dither pass output (sampled by the composite pass) and for
/// cell-grid state textures' display path.
pub struct OffscreenTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    size: (u32, u32),
    format: wgpu::TextureFormat,
}

impl OffscreenTarget {
    pub fn new(device: &wgpu::Device, label: &str, size: (u32, u32), format: wgpu::TextureFormat) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: size.0.max(1),
                height: size.1.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            size,
            format,
        }
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Recreates the texture if `size` changed; returns true when it did
    /// (callers must rebuild bind groups referencing the old view).
    pub fn ensure_size(&mut self, device: &wgpu::Device, label: &str, size: (u32, u32)) -> bool {
        if size == self.size {
            return false;
        }
        *self = Self::new(device, label, size, self.format);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_scale_passes_through() {
        assert_eq!(effect_pixels(Viewport::new(800.0, 600.0), 1.0), (800, 600));
    }

    #[test]
    fn two_x_scale_keeps_full_density() {
        assert_eq!(effect_pixels(Viewport::new(1600.0, 1200.0), 2.0), (1600, 1200));
    }

    #[test]
    fn beyond_two_x_is_capped() {
        // A 3× display: reference size 800×600, capped to 2× density.
        assert_eq!(effect_pixels(Viewport::new(2400.0, 1800.0), 3.0), (1600, 1200));
    }

    #[test]
    fn degenerate_scale_defaults_to_identity() {
        assert_eq!(effect_pixels(Viewport::new(640.0, 480.0), 0.0), (640, 480));
    }

    #[test]
    fn never_collapses_to_zero() {
        assert_eq!(effect_pixels(Viewport::new(0.4, 0.4), 1.0), (1, 1));
    }
}
