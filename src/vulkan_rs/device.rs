use super::error::{InitializationError, Result};
use super::instance::Instance;
use super::physical_device::QueueFamilyIndices;
use ash::vk;
use std::ffi::c_char;
use std::ffi::CString;

const QUEUE_PRIORITIES: [f32; 1] = [1.0];

/// One entry per distinct family, graphics first.
pub fn unique_queue_families(graphics_family: u32, presentation_family: u32) -> Vec<u32> {
    let mut unique_queue_families = vec![graphics_family];
    if presentation_family != graphics_family {
        unique_queue_families.push(presentation_family);
    }
    unique_queue_families
}

pub fn queue_create_infos<'a>(families: &[u32]) -> Vec<vk::DeviceQueueCreateInfo<'a>> {
    families
        .iter()
        .map(|&queue_family_index| {
            vk::DeviceQueueCreateInfo::default()
                .queue_family_index(queue_family_index)
                .queue_priorities(&QUEUE_PRIORITIES)
        })
        .collect()
}

/// Device layers mirror the instance layers; an empty list enables none.
pub fn device_layer_names(layers: &[CString]) -> Vec<*const c_char> {
    layers.iter().map(|layer| layer.as_ptr()).collect()
}

pub struct Device {
    handle: ash::Device,
    graphics_queue: vk::Queue,
    graphics_queue_family_idx: u32,
    presentation_queue: vk::Queue,
    presentation_queue_family_idx: u32,
}

impl Device {
    /// `layers` must be the instance layer list; older implementations still
    /// read device layers.
    pub fn new(
        instance: &Instance,
        physical_device: vk::PhysicalDevice,
        queue_family_indices: QueueFamilyIndices,
        layers: &[CString],
    ) -> Result<Self> {
        let (Some(graphics_q_fam_idx), Some(present_q_fam_idx)) = (
            queue_family_indices.graphics_family,
            queue_family_indices.presentation_family,
        ) else {
            return Err(InitializationError::NoSuitableDevice);
        };

        let unique_queue_families = unique_queue_families(graphics_q_fam_idx, present_q_fam_idx);
        log::debug!("Using Queue Families: {:?}", unique_queue_families);
        let queue_create_infos = queue_create_infos(&unique_queue_families);

        let layer_names_raw = device_layer_names(layers);
        let device_features = vk::PhysicalDeviceFeatures::default();

        #[allow(deprecated)]
        let device_create_info = vk::DeviceCreateInfo::default()
            .queue_create_infos(&queue_create_infos)
            .enabled_layer_names(&layer_names_raw)
            .enabled_features(&device_features);

        let handle = unsafe {
            instance
                .handle
                .create_device(physical_device, &device_create_info, None)
                .map_err(InitializationError::DeviceCreation)?
        };
        log::info!("Created logical device");

        let graphics_queue = Self::get_queue(&handle, graphics_q_fam_idx);
        let presentation_queue = Self::get_queue(&handle, present_q_fam_idx);

        Ok(Device {
            handle,
            graphics_queue,
            graphics_queue_family_idx: graphics_q_fam_idx,
            presentation_queue,
            presentation_queue_family_idx: present_q_fam_idx,
        })
    }

    // Exactly one queue was created per family.
    fn get_queue(handle: &ash::Device, family_index: u32) -> vk::Queue {
        unsafe { handle.get_device_queue(family_index, 0) }
    }

    pub fn get_graphics_queue(&self) -> vk::Queue {
        self.graphics_queue
    }

    pub fn get_graphics_queue_idx(&self) -> u32 {
        self.graphics_queue_family_idx
    }

    /// Same queue as the graphics queue when both share a family.
    pub fn get_presentation_queue(&self) -> vk::Queue {
        self.presentation_queue
    }

    pub fn get_presentation_queue_idx(&self) -> u32 {
        self.presentation_queue_family_idx
    }

    pub fn wait_idle(&self) {
        if let Err(err) = unsafe { self.handle.device_wait_idle() } {
            log::warn!("Waiting for device idle failed: {}", err);
        }
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        self.wait_idle();
        log::debug!("Destroying logical device!");
        unsafe {
            self.handle.destroy_device(None);
        }
    }
}
