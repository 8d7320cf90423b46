use super::error::{InitializationError, Result};
use std::ffi::{CStr, CString};

/// Snapshot of what the Vulkan runtime on this host offers at instance level.
#[derive(Debug, Default, Clone)]
pub struct Capabilities {
    extensions: Vec<CString>,
    layers: Vec<CString>,
}

pub fn query_instance_layers(entry: &ash::Entry) -> Result<Vec<CString>> {
    let layer_properties = unsafe {
        entry
            .enumerate_instance_layer_properties()
            .map_err(InitializationError::Query)?
    };
    let instance_layers: Vec<CString> = layer_properties
        .iter()
        .filter_map(|prop| prop.layer_name_as_c_str().ok())
        .map(CString::from)
        .collect();

    log::debug!("Available Instance Layers: ");
    log::debug!("==================");
    for layer in instance_layers.iter() {
        log::debug!("{:?}", layer);
    }
    log::debug!("==================");

    Ok(instance_layers)
}

/// Extensions offered by the loader and drivers, followed by the ones the
/// given layers bring along.
pub fn query_instance_extensions(entry: &ash::Entry, layers: &[CString]) -> Result<Vec<CString>> {
    let mut extension_properties = unsafe {
        entry
            .enumerate_instance_extension_properties(None)
            .map_err(InitializationError::Query)?
    };
    for layer in layers {
        let layer_extensions = unsafe {
            entry
                .enumerate_instance_extension_properties(Some(layer.as_c_str()))
                .map_err(InitializationError::Query)?
        };
        extension_properties.extend(layer_extensions);
    }

    let mut instance_extensions: Vec<CString> = Vec::with_capacity(extension_properties.len());
    for name in extension_properties
        .iter()
        .filter_map(|prop| prop.extension_name_as_c_str().ok())
    {
        if !instance_extensions.iter().any(|known| known.as_c_str() == name) {
            instance_extensions.push(name.to_owned());
        }
    }

    log::debug!("Available Instance Extensions: ");
    log::debug!("==================");
    for extension in instance_extensions.iter() {
        log::debug!("{:?}", extension);
    }
    log::debug!("==================");

    Ok(instance_extensions)
}

fn enabled_layers(installed: &[CString], requested: &[CString]) -> Vec<CString> {
    requested
        .iter()
        .filter(|layer| installed.contains(layer))
        .cloned()
        .collect()
}

impl Capabilities {
    /// Only layers that are both requested and installed contribute
    /// extensions; an installed layer that stays disabled provides nothing.
    pub fn query(entry: &ash::Entry, requested_layers: &[CString]) -> Result<Self> {
        let layers = query_instance_layers(entry)?;
        let active_layers = enabled_layers(&layers, requested_layers);
        let extensions = query_instance_extensions(entry, &active_layers)?;
        Ok(Capabilities { extensions, layers })
    }

    pub fn from_names(extensions: Vec<CString>, layers: Vec<CString>) -> Self {
        Capabilities { extensions, layers }
    }

    pub fn extensions_supported(&self, required: &[&CStr]) -> bool {
        self.missing_extensions(required).is_empty()
    }

    pub fn layers_supported(&self, required: &[&CStr]) -> bool {
        self.missing_layers(required).is_empty()
    }

    pub fn missing_extensions(&self, required: &[&CStr]) -> Vec<String> {
        Self::missing(&self.extensions, required, "extension")
    }

    pub fn missing_layers(&self, required: &[&CStr]) -> Vec<String> {
        Self::missing(&self.layers, required, "layer")
    }

    // Every name is checked (and logged) even after the first miss.
    fn missing(available: &[CString], required: &[&CStr], kind: &str) -> Vec<String> {
        let mut missing = Vec::new();
        for name in required {
            if available.iter().any(|candidate| candidate.as_c_str() == *name) {
                log::info!("Supported {}: {:?}", kind, name);
            } else {
                log::warn!("Unsupported {}: {:?}", kind, name);
                missing.push(name.to_string_lossy().into_owned());
            }
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> Capabilities {
        Capabilities::from_names(
            vec![
                c"VK_KHR_surface".to_owned(),
                c"VK_KHR_xcb_surface".to_owned(),
                c"VK_EXT_debug_report".to_owned(),
            ],
            vec![c"VK_LAYER_KHRONOS_validation".to_owned()],
        )
    }

    #[test]
    fn empty_requirements_are_always_supported() {
        assert!(host().layers_supported(&[]));
        assert!(host().extensions_supported(&[]));
        assert!(Capabilities::default().layers_supported(&[]));
    }

    #[test]
    fn every_required_name_must_be_present() {
        let caps = host();
        assert!(caps.extensions_supported(&[c"VK_KHR_surface", c"VK_KHR_xcb_surface"]));
        assert!(!caps.extensions_supported(&[c"VK_KHR_surface", c"VK_KHR_win32_surface"]));
        assert!(caps.layers_supported(&[c"VK_LAYER_KHRONOS_validation"]));
        assert!(!caps.layers_supported(&[c"VK_LAYER_LUNARG_standard_validation"]));
    }

    #[test]
    fn only_requested_installed_layers_contribute_extensions() {
        let installed = [
            c"VK_LAYER_KHRONOS_validation".to_owned(),
            c"VK_LAYER_LUNARG_api_dump".to_owned(),
        ];
        assert!(enabled_layers(&installed, &[]).is_empty());
        assert_eq!(
            enabled_layers(
                &installed,
                &[
                    c"VK_LAYER_KHRONOS_validation".to_owned(),
                    c"VK_LAYER_not_installed".to_owned(),
                ],
            ),
            vec![c"VK_LAYER_KHRONOS_validation".to_owned()]
        );
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert!(!host().extensions_supported(&[c"vk_khr_surface"]));
    }

    #[test]
    fn missing_names_are_reported_in_request_order() {
        let missing = host().missing_extensions(&[
            c"VK_KHR_wayland_surface",
            c"VK_KHR_surface",
            c"VK_KHR_win32_surface",
        ]);
        assert_eq!(missing, vec!["VK_KHR_wayland_surface", "VK_KHR_win32_surface"]);
    }
}
