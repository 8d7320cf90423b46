use super::error::{InitializationError, Result};
use super::window::Surface;
use ash::vk;

const DISCRETE_GPU_BONUS: u64 = 1000;

/// What the selector needs to know about the physical devices of an instance.
pub trait DeviceQuery {
    fn enumerate_physical_devices(&self) -> Result<Vec<vk::PhysicalDevice>>;
    fn properties(&self, device: vk::PhysicalDevice) -> vk::PhysicalDeviceProperties;
    fn features(&self, device: vk::PhysicalDevice) -> vk::PhysicalDeviceFeatures;
    fn queue_families(&self, device: vk::PhysicalDevice) -> Vec<vk::QueueFamilyProperties>;
    fn supports_present(&self, device: vk::PhysicalDevice, family_index: u32) -> Result<bool>;
}

pub struct SurfaceDeviceQuery<'a> {
    instance: &'a ash::Instance,
    surface: &'a Surface,
}

impl<'a> SurfaceDeviceQuery<'a> {
    pub fn new(instance: &'a ash::Instance, surface: &'a Surface) -> Self {
        SurfaceDeviceQuery { instance, surface }
    }
}

impl DeviceQuery for SurfaceDeviceQuery<'_> {
    fn enumerate_physical_devices(&self) -> Result<Vec<vk::PhysicalDevice>> {
        unsafe {
            self.instance
                .enumerate_physical_devices()
                .map_err(InitializationError::Query)
        }
    }

    fn properties(&self, device: vk::PhysicalDevice) -> vk::PhysicalDeviceProperties {
        unsafe { self.instance.get_physical_device_properties(device) }
    }

    fn features(&self, device: vk::PhysicalDevice) -> vk::PhysicalDeviceFeatures {
        unsafe { self.instance.get_physical_device_features(device) }
    }

    fn queue_families(&self, device: vk::PhysicalDevice) -> Vec<vk::QueueFamilyProperties> {
        unsafe {
            self.instance
                .get_physical_device_queue_family_properties(device)
        }
    }

    fn supports_present(&self, device: vk::PhysicalDevice, family_index: u32) -> Result<bool> {
        self.surface
            .get_physical_device_surface_support(device, family_index)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct QueueFamilyIndices {
    pub graphics_family: Option<u32>,
    pub presentation_family: Option<u32>,
}

impl QueueFamilyIndices {
    pub fn is_complete(&self) -> bool {
        self.graphics_family.is_some() && self.presentation_family.is_some()
    }
}

/// First graphics-capable and first present-capable family, which may be the
/// same index.
pub fn find_queue_families(
    query: &impl DeviceQuery,
    device: vk::PhysicalDevice,
) -> Result<QueueFamilyIndices> {
    let mut indices = QueueFamilyIndices::default();
    for (idx, family) in query.queue_families(device).iter().enumerate() {
        let idx = idx as u32;
        if indices.graphics_family.is_none()
            && family.queue_flags.contains(vk::QueueFlags::GRAPHICS)
        {
            indices.graphics_family = Some(idx);
        }
        if indices.presentation_family.is_none() && query.supports_present(device, idx)? {
            indices.presentation_family = Some(idx);
        }
        if indices.is_complete() {
            break;
        }
    }
    Ok(indices)
}

/// Zero means unusable. Missing the geometry shader feature or a complete set
/// of queue families disqualifies a device outright.
pub fn rank_physical_device(query: &impl DeviceQuery, device: vk::PhysicalDevice) -> Result<u64> {
    let properties = query.properties(device);
    let features = query.features(device);

    if features.geometry_shader != vk::TRUE {
        return Ok(0);
    }
    if !find_queue_families(query, device)?.is_complete() {
        return Ok(0);
    }

    let mut score = 0;
    if properties.device_type == vk::PhysicalDeviceType::DISCRETE_GPU {
        score += DISCRETE_GPU_BONUS;
    }
    score += u64::from(properties.limits.max_image_dimension2_d);
    Ok(score)
}

pub struct PhysicalDeviceSelector;

impl PhysicalDeviceSelector {
    pub fn enumerate(query: &impl DeviceQuery) -> Result<Vec<vk::PhysicalDevice>> {
        let physical_devices = query.enumerate_physical_devices()?;
        log::info!(
            "Found {} devices with Vulkan support",
            physical_devices.len()
        );
        if physical_devices.is_empty() {
            return Err(InitializationError::NoPhysicalDevices);
        }
        Ok(physical_devices)
    }

    /// Highest rank wins; on a tie the device enumerated first is kept.
    pub fn select_best(
        query: &impl DeviceQuery,
        devices: &[vk::PhysicalDevice],
    ) -> Result<vk::PhysicalDevice> {
        let mut best: Option<(vk::PhysicalDevice, u64)> = None;
        for &device in devices {
            let rank = rank_physical_device(query, device)?;
            log::debug!("Device {} has rank {}", device_name(query, device), rank);
            if best.map_or(true, |(_, best_rank)| rank > best_rank) {
                best = Some((device, rank));
            }
        }

        match best {
            Some((device, rank)) if rank > 0 => {
                log::info!(
                    "Choosing device {} ({:?}, rank {})",
                    device_name(query, device),
                    query.properties(device).device_type,
                    rank
                );
                Ok(device)
            }
            _ => Err(InitializationError::NoSuitableDevice),
        }
    }

    pub fn select(query: &impl DeviceQuery) -> Result<vk::PhysicalDevice> {
        let devices = Self::enumerate(query)?;
        Self::select_best(query, &devices)
    }
}

fn device_name(query: &impl DeviceQuery, device: vk::PhysicalDevice) -> String {
    query
        .properties(device)
        .device_name_as_c_str()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "<unnamed>".to_string())
}
