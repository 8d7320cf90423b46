use crate::vulkan_rs::debug::{install_debug_channel, NativeDebugReport};
use crate::vulkan_rs::physical_device::find_queue_families;
use crate::vulkan_rs::window;
use crate::vulkan_rs::ApplicationConfig;
use crate::vulkan_rs::Capabilities;
use crate::vulkan_rs::DebugChannel;
use crate::vulkan_rs::Device;
use crate::vulkan_rs::Instance;
use crate::vulkan_rs::InstanceRequest;
use crate::vulkan_rs::PhysicalDeviceSelector;
use crate::vulkan_rs::Result;
use crate::vulkan_rs::Surface;
use crate::vulkan_rs::SurfaceDeviceQuery;
use crate::vulkan_rs::Teardown;
use ash::vk;
use std::sync::Arc;
use winit::window::Window;

pub type ContextResources = Teardown<Device, DebugChannel, Surface, Instance, Arc<Window>>;

/// Everything needed before rendering can start: instance, optional debug
/// channel, surface, chosen GPU, logical device and its queues.
pub struct VulkanContext {
    resources: ContextResources,
    physical_device: vk::PhysicalDevice,
    graphics_queue: vk::Queue,
    presentation_queue: vk::Queue,
}

impl VulkanContext {
    pub fn new(config: &ApplicationConfig, window: Arc<Window>) -> Result<VulkanContext> {
        // Any early return below drops `resources`, releasing only what exists.
        let mut resources = ContextResources::new();
        resources.window = Some(window.clone());

        let entry = unsafe { ash::Entry::load()? };
        let capabilities = Capabilities::query(&entry, &config.validation_layers)?;
        let window_extensions = window::get_required_instance_extensions(&*window)?;
        log::debug!("Required extensions: {:?}", window_extensions);
        log::debug!("Required layers: {:?}", config.validation_layers);
        let request = InstanceRequest::plan(config, &window_extensions, &capabilities)?;

        let instance: &Instance = resources
            .instance
            .insert(Instance::new(entry, config, &request)?);

        resources.debug_channel = install_debug_channel(
            &NativeDebugReport::new(&instance.entry, &instance.handle),
            &request.layers,
        )?;

        let surface: &Surface = resources.surface.insert(Surface::new(instance, &*window)?);

        let query = SurfaceDeviceQuery::new(&instance.handle, surface);
        let physical_device = PhysicalDeviceSelector::select(&query)?;
        let queue_family_indices = find_queue_families(&query, physical_device)?;

        let device = Device::new(
            instance,
            physical_device,
            queue_family_indices,
            &request.layers,
        )?;
        log::info!(
            "Graphics queue family {}, presentation queue family {}",
            device.get_graphics_queue_idx(),
            device.get_presentation_queue_idx()
        );
        let graphics_queue = device.get_graphics_queue();
        let presentation_queue = device.get_presentation_queue();
        resources.device = Some(device);
        log::info!("Vulkan bootstrap complete");

        Ok(VulkanContext {
            resources,
            physical_device,
            graphics_queue,
            presentation_queue,
        })
    }

    pub fn physical_device(&self) -> vk::PhysicalDevice {
        self.physical_device
    }

    pub fn graphics_queue(&self) -> vk::Queue {
        self.graphics_queue
    }

    /// May be the same queue as [`Self::graphics_queue`].
    pub fn presentation_queue(&self) -> vk::Queue {
        self.presentation_queue
    }

    pub fn device(&self) -> Option<&Device> {
        self.resources.device.as_ref()
    }

    pub fn window(&self) -> Option<&Arc<Window>> {
        self.resources.window.as_ref()
    }

    pub fn wait_idle(&self) {
        if let Some(device) = self.device() {
            device.wait_idle();
        }
    }

    pub fn teardown(&mut self) {
        self.resources.run();
    }
}
