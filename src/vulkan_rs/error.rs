use ash::vk;
use thiserror::Error;

/// Every way the bootstrap can fail. None of these are recovered from: the
/// error unwinds to `main`, which tears down what exists and exits non-zero.
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("Could not load the Vulkan library: {0}")]
    Loading(#[from] ash::LoadingError),
    #[error("Could not create the event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("Could not create the window: {0}")]
    WindowCreation(#[from] winit::error::OsError),
    #[error("Window does not expose a usable handle: {0}")]
    WindowHandle(#[from] raw_window_handle::HandleError),
    #[error("Name {0:?} contains an interior nul byte")]
    InvalidName(String),
    #[error("Required instance extensions are not supported: {0:?}")]
    UnsupportedExtensions(Vec<String>),
    #[error("Validation layers requested, but not available: {0:?}")]
    UnsupportedLayers(Vec<String>),
    #[error("Failed to create instance: {0}")]
    InstanceCreation(vk::Result),
    #[error("Debug report callbacks are not available in this Vulkan build")]
    DebugChannelUnavailable,
    #[error("Failed to set up debug callback: {0}")]
    DebugChannelCreation(vk::Result),
    #[error("Failed to create window surface: {0}")]
    SurfaceCreation(vk::Result),
    #[error("Vulkan query failed: {0}")]
    Query(vk::Result),
    #[error("Failed to find GPUs with Vulkan support")]
    NoPhysicalDevices,
    #[error("Failed to find a suitable GPU")]
    NoSuitableDevice,
    #[error("Failed to create logical device: {0}")]
    DeviceCreation(vk::Result),
}

pub type Result<T> = std::result::Result<T, InitializationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_missing_items() {
        let err = InitializationError::UnsupportedLayers(vec!["VK_LAYER_missing".to_string()]);
        assert!(err.to_string().contains("VK_LAYER_missing"));

        let err = InitializationError::DeviceCreation(vk::Result::ERROR_DEVICE_LOST);
        assert!(err.to_string().starts_with("Failed to create logical device"));
    }
}
