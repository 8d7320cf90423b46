use super::capabilities::Capabilities;
use super::config::ApplicationConfig;
use super::error::{InitializationError, Result};
use ash::ext::debug_report;
use ash::vk;
use std::ffi::c_char;
use std::ffi::{CStr, CString};

/// Extension and layer lists that have already been checked against the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceRequest {
    pub extensions: Vec<CString>,
    pub layers: Vec<CString>,
}

impl InstanceRequest {
    /// Validates everything up front so an unsupported combination is reported
    /// by name instead of as an opaque `vkCreateInstance` failure.
    pub fn plan(
        config: &ApplicationConfig,
        window_extensions: &[&CStr],
        capabilities: &Capabilities,
    ) -> Result<Self> {
        let missing = capabilities.missing_extensions(window_extensions);
        if !missing.is_empty() {
            log::error!("Some window system extensions are not supported by Vulkan");
            return Err(InitializationError::UnsupportedExtensions(missing));
        }
        let mut extensions: Vec<CString> = window_extensions
            .iter()
            .map(|ext| (*ext).to_owned())
            .collect();

        if config.validation_enabled() {
            let required_layers: Vec<&CStr> = config
                .validation_layers
                .iter()
                .map(CString::as_c_str)
                .collect();
            let missing = capabilities.missing_layers(&required_layers);
            if !missing.is_empty() {
                return Err(InitializationError::UnsupportedLayers(missing));
            }

            let missing = capabilities.missing_extensions(&[debug_report::NAME]);
            if !missing.is_empty() {
                return Err(InitializationError::UnsupportedExtensions(missing));
            }
            extensions.push(debug_report::NAME.to_owned());
        }

        Ok(InstanceRequest {
            extensions,
            layers: config.validation_layers.clone(),
        })
    }
}

fn to_cstring(name: &str) -> Result<CString> {
    CString::new(name).map_err(|_| InitializationError::InvalidName(name.to_string()))
}

pub struct Instance {
    pub entry: ash::Entry,
    pub handle: ash::Instance,
}

impl Instance {
    pub fn new(
        entry: ash::Entry,
        config: &ApplicationConfig,
        request: &InstanceRequest,
    ) -> Result<Instance> {
        let app_name = to_cstring(&config.application_name)?;
        let engine_name = to_cstring(&config.engine_name)?;
        let app_info = vk::ApplicationInfo::default()
            .application_name(&app_name)
            .application_version(config.application_version.to_api_version())
            .engine_name(&engine_name)
            .engine_version(config.engine_version.to_api_version())
            .api_version(config.api_version.to_api_version());

        let required_extensions_raw: Vec<*const c_char> =
            request.extensions.iter().map(|ext| ext.as_ptr()).collect();
        let required_layers_raw: Vec<*const c_char> =
            request.layers.iter().map(|layer| layer.as_ptr()).collect();

        let instance_info = vk::InstanceCreateInfo::default()
            .application_info(&app_info)
            .enabled_extension_names(&required_extensions_raw)
            .enabled_layer_names(&required_layers_raw);

        log::debug!("Creating instance!");
        let handle = unsafe {
            entry
                .create_instance(&instance_info, None)
                .map_err(InitializationError::InstanceCreation)?
        };
        log::info!(
            "Created instance for {:?} with {} extensions and {} layers",
            config.application_name,
            request.extensions.len(),
            request.layers.len()
        );
        Ok(Instance { entry, handle })
    }
}

impl Drop for Instance {
    fn drop(&mut self) {
        log::debug!("Destroying instance!");
        unsafe {
            self.handle.destroy_instance(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW_EXTENSIONS: [&CStr; 2] = [c"VK_KHR_surface", c"VK_KHR_xlib_surface"];

    fn host(layers: &[&CStr]) -> Capabilities {
        Capabilities::from_names(
            vec![
                c"VK_KHR_surface".to_owned(),
                c"VK_KHR_xlib_surface".to_owned(),
                debug_report::NAME.to_owned(),
            ],
            layers.iter().map(|layer| (*layer).to_owned()).collect(),
        )
    }

    #[test]
    fn without_layers_only_window_extensions_are_requested() {
        let config = ApplicationConfig::default().without_validation_layers();
        let request = InstanceRequest::plan(&config, &WINDOW_EXTENSIONS, &host(&[])).unwrap();
        assert_eq!(
            request.extensions,
            vec![c"VK_KHR_surface".to_owned(), c"VK_KHR_xlib_surface".to_owned()]
        );
        assert!(request.layers.is_empty());
    }

    #[test]
    fn layers_add_the_debug_report_extension() {
        let config = ApplicationConfig::default()
            .with_validation_layers(vec![c"VK_LAYER_KHRONOS_validation".to_owned()]);
        let caps = host(&[c"VK_LAYER_KHRONOS_validation"]);
        let request = InstanceRequest::plan(&config, &WINDOW_EXTENSIONS, &caps).unwrap();
        assert_eq!(request.extensions.last().unwrap().as_c_str(), debug_report::NAME);
        assert_eq!(request.layers, config.validation_layers);
    }

    #[test]
    fn missing_layer_fails_before_instance_creation() {
        let config = ApplicationConfig::default()
            .with_validation_layers(vec![c"VK_LAYER_not_installed".to_owned()]);
        let err = InstanceRequest::plan(&config, &WINDOW_EXTENSIONS, &host(&[])).unwrap_err();
        match err {
            InitializationError::UnsupportedLayers(missing) => {
                assert_eq!(missing, vec!["VK_LAYER_not_installed"])
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_window_extension_fails() {
        let config = ApplicationConfig::default().without_validation_layers();
        let err = InstanceRequest::plan(
            &config,
            &[c"VK_KHR_surface", c"VK_KHR_win32_surface"],
            &host(&[]),
        )
        .unwrap_err();
        match err {
            InitializationError::UnsupportedExtensions(missing) => {
                assert_eq!(missing, vec!["VK_KHR_win32_surface"])
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_debug_report_extension_fails_when_validating() {
        let config = ApplicationConfig::default()
            .with_validation_layers(vec![c"VK_LAYER_KHRONOS_validation".to_owned()]);
        let caps = Capabilities::from_names(
            vec![c"VK_KHR_surface".to_owned(), c"VK_KHR_xlib_surface".to_owned()],
            vec![c"VK_LAYER_KHRONOS_validation".to_owned()],
        );
        let err = InstanceRequest::plan(&config, &WINDOW_EXTENSIONS, &caps).unwrap_err();
        assert!(matches!(err, InitializationError::UnsupportedExtensions(_)));
    }

    #[test]
    fn names_with_nul_bytes_are_rejected() {
        assert!(matches!(
            to_cstring("bad\0name"),
            Err(InitializationError::InvalidName(_))
        ));
    }
}
