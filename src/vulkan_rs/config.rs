use ash::vk;
use std::ffi::CString;

pub const KHRONOS_VALIDATION_LAYER: &std::ffi::CStr = c"VK_LAYER_KHRONOS_validation";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    pub fn to_api_version(self) -> u32 {
        vk::make_api_version(0, self.major, self.minor, self.patch)
    }
}

/// Everything the bootstrap needs to know up front. Built once in `main` and
/// only read afterwards.
#[derive(Debug, Clone)]
pub struct ApplicationConfig {
    pub application_name: String,
    pub application_version: Version,
    pub engine_name: String,
    pub engine_version: Version,
    pub api_version: Version,
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    /// Instance layers to enable. A non-empty list also turns on the debug
    /// channel and is mirrored into the device layers.
    pub validation_layers: Vec<CString>,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        let validation_layers = if cfg!(debug_assertions) {
            vec![KHRONOS_VALIDATION_LAYER.to_owned()]
        } else {
            vec![]
        };
        ApplicationConfig {
            application_name: "Vulkan".to_string(),
            application_version: Version::new(1, 0, 0),
            engine_name: "No Engine".to_string(),
            engine_version: Version::new(1, 0, 0),
            api_version: Version::new(1, 0, 0),
            window_title: "Vulkan".to_string(),
            window_width: 800,
            window_height: 600,
            validation_layers,
        }
    }
}

impl ApplicationConfig {
    pub fn with_title(mut self, title: &str) -> Self {
        self.window_title = title.to_string();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    pub fn with_validation_layers(mut self, layers: Vec<CString>) -> Self {
        self.validation_layers = layers;
        self
    }

    pub fn without_validation_layers(self) -> Self {
        self.with_validation_layers(vec![])
    }

    pub fn validation_enabled(&self) -> bool {
        !self.validation_layers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_matches_bootstrap_defaults() {
        let config = ApplicationConfig::default();
        assert_eq!(config.window_title, "Vulkan");
        assert_eq!(config.window_width, 800);
        assert_eq!(config.window_height, 600);
        assert_eq!(config.engine_name, "No Engine");
        assert_eq!(config.validation_enabled(), cfg!(debug_assertions));
    }

    #[test]
    fn builders_replace_fields() {
        let config = ApplicationConfig::default()
            .with_title("Triangle")
            .with_size(1024, 768)
            .without_validation_layers();
        assert_eq!(config.window_title, "Triangle");
        assert_eq!((config.window_width, config.window_height), (1024, 768));
        assert!(!config.validation_enabled());
    }

    #[test]
    fn version_packs_like_vulkan() {
        assert_eq!(Version::new(1, 0, 0).to_api_version(), vk::API_VERSION_1_0);
        assert_eq!(Version::new(1, 3, 0).to_api_version(), vk::API_VERSION_1_3);
    }
}
