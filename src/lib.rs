mod vulkan_context;
pub mod vulkan_rs;

pub use vulkan_context::VulkanContext;
pub use vulkan_rs::ApplicationConfig;
pub use vulkan_rs::InitializationError;
