use super::error::{InitializationError, Result};
use super::instance::Instance;
use ash::vk;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use std::ffi::CStr;

/// Instance extensions the window system needs for presenting to `window`.
pub fn get_required_instance_extensions(
    window: &impl HasDisplayHandle,
) -> Result<Vec<&'static CStr>> {
    let raw_display_handle = window.display_handle()?.as_raw();
    let extensions = ash_window::enumerate_required_extensions(raw_display_handle)
        .map_err(InitializationError::Query)?;
    // SAFETY: ash-window hands out pointers to its static, nul-terminated
    // extension name constants.
    Ok(extensions
        .iter()
        .map(|ext| unsafe { CStr::from_ptr(*ext) })
        .collect())
}

pub struct Surface {
    pub handle: vk::SurfaceKHR,
    pub loader: ash::khr::surface::Instance,
}

impl Surface {
    pub fn new(
        instance: &Instance,
        window: &(impl HasDisplayHandle + HasWindowHandle),
    ) -> Result<Surface> {
        let raw_window_handle = window.window_handle()?.as_raw();
        let raw_display_handle = window.display_handle()?.as_raw();
        let handle = unsafe {
            ash_window::create_surface(
                &instance.entry,
                &instance.handle,
                raw_display_handle,
                raw_window_handle,
                None,
            )
            .map_err(InitializationError::SurfaceCreation)?
        };
        let loader = ash::khr::surface::Instance::new(&instance.entry, &instance.handle);
        log::info!("Created window surface");

        Ok(Surface { handle, loader })
    }

    pub fn get_physical_device_surface_support(
        &self,
        device: vk::PhysicalDevice,
        idx: u32,
    ) -> Result<bool> {
        unsafe {
            self.loader
                .get_physical_device_surface_support(device, idx, self.handle)
                .map_err(InitializationError::Query)
        }
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        log::debug!("Destroying surface!");
        unsafe {
            self.loader.destroy_surface(self.handle, None);
        }
    }
}
