//! Error types for glowsphere.
//!
//! This module provides error types for GPU initialization, configuration
//! loading and running the viewer. Texture synthesis has no error type: a
//! failed drawing surface degrades to a blank sprite instead.

use thiserror::Error;

/// Errors that can occur during GPU initialization.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("Failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support.")]
    NoAdapter,
    /// Failed to create GPU device.
    #[error("Failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    /// The surface reported no usable texture format.
    #[error("Surface has no supported texture format")]
    NoSurfaceFormat,
}

/// Errors that can occur while exporting a sprite image.
#[derive(Debug, Error)]
pub enum TextureError {
    /// Failed to encode or write the image file.
    #[error("Failed to write image: {0}")]
    Image(#[from] image::ImageError),
    /// The sprite has no pixels (its surface could not be acquired).
    #[error("Sprite is empty ({width}x{height})")]
    Empty { width: u32, height: u32 },
}

/// Errors produced while parsing a CSS color string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// The string was empty after trimming.
    #[error("empty color string")]
    Empty,
    /// A `#` color with the wrong number of hex digits.
    #[error("invalid hex color '{0}' (expected #rgb or #rrggbb)")]
    HexLength(String),
    /// A character that is not a hex digit.
    #[error("invalid hex digit in color '{0}'")]
    HexDigit(String),
    /// An `rgb(...)` form that could not be parsed.
    #[error("invalid rgb() color '{0}'")]
    Functional(String),
    /// Not a recognised color name.
    #[error("unknown color name '{0}'")]
    UnknownName(String),
}

/// Errors that can occur while loading a scene configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid TOML or has the wrong shape.
    #[error("Failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
    /// The configured color could not be parsed.
    #[error("Invalid color: {0}")]
    Color(#[from] ColorError),
    /// The configured shape is not one of the known shapes.
    #[error("Unknown particle shape '{0}' (expected sphere, snowflake, petal or star)")]
    Shape(String),
    /// A numeric setting is out of its valid range.
    #[error("Invalid value for '{key}': {reason}")]
    Invalid {
        /// Config key that failed validation.
        key: &'static str,
        /// Human readable reason.
        reason: String,
    },
}

/// Errors that can occur when running the viewer.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// Failed to create event loop.
    #[error("Failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create window.
    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    /// The configuration was rejected.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}
