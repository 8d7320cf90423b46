mod capabilities;
mod config;
pub mod debug;
mod device;
mod error;
mod instance;
pub mod physical_device;
mod teardown;
pub mod window;

pub use capabilities::Capabilities;
pub use config::ApplicationConfig;
pub use config::Version;
pub use config::KHRONOS_VALIDATION_LAYER;
pub use debug::DebugChannel;
pub use device::Device;
pub use error::InitializationError;
pub use error::Result;
pub use instance::Instance;
pub use instance::InstanceRequest;
pub use physical_device::DeviceQuery;
pub use physical_device::PhysicalDeviceSelector;
pub use physical_device::QueueFamilyIndices;
pub use physical_device::SurfaceDeviceQuery;
pub use teardown::Teardown;
pub use window::Surface;
