use anyhow::{Result, bail};

/// Runs `build` under a wgpu validation error scope and surfaces any captured
/// validation error as a synchronous `Err`.
///
/// Shader module and pipeline creation in wgpu report validation failures
/// through the device error callback rather than a return value. Effects use
/// this wrapper during mount so a bad shader or layout fails the mount call
/// with the underlying diagnostic text instead of crashing later.
pub fn with_validation_scope<T>(
    device: &wgpu::Device,
    label: &str,
    build: impl FnOnce() -> T,
) -> Result<T> {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = build();
    if let Some(err) = pollster::block_on(scope.pop()) {
        bail!("{label}: GPU validation failed: {err}");
    }
    Ok(value)
}
