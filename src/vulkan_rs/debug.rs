use super::error::{InitializationError, Result};
use ash::ext::debug_report;
use ash::vk;
use std::borrow::Cow;
use std::ffi::{c_char, c_void, CStr, CString};

const LOG_TARGET: &str = "vulkan-validation";

unsafe fn lossy<'a>(ptr: *const c_char) -> Cow<'a, str> {
    if ptr.is_null() {
        Cow::from("")
    } else {
        unsafe { CStr::from_ptr(ptr) }.to_string_lossy()
    }
}

/// Forwards validation output into the log. Never aborts the call that
/// triggered the report.
pub unsafe extern "system" fn debug_report_callback(
    flags: vk::DebugReportFlagsEXT,
    object_type: vk::DebugReportObjectTypeEXT,
    object: u64,
    _location: usize,
    message_code: i32,
    p_layer_prefix: *const c_char,
    p_message: *const c_char,
    _user_data: *mut c_void,
) -> vk::Bool32 {
    let layer = unsafe { lossy(p_layer_prefix) };
    let message = unsafe { lossy(p_message) };

    let level = if flags.contains(vk::DebugReportFlagsEXT::ERROR) {
        log::Level::Error
    } else if flags.intersects(
        vk::DebugReportFlagsEXT::WARNING | vk::DebugReportFlagsEXT::PERFORMANCE_WARNING,
    ) {
        log::Level::Warn
    } else if flags.contains(vk::DebugReportFlagsEXT::INFORMATION) {
        log::Level::Info
    } else {
        log::Level::Debug
    };
    log::log!(
        target: LOG_TARGET,
        level,
        "[{layer} ({message_code})] {object_type:?} {object:#x}: {message}"
    );

    vk::FALSE
}

pub fn fill_create_info<'a>() -> vk::DebugReportCallbackCreateInfoEXT<'a> {
    vk::DebugReportCallbackCreateInfoEXT::default()
        .flags(
            vk::DebugReportFlagsEXT::ERROR
                | vk::DebugReportFlagsEXT::WARNING
                | vk::DebugReportFlagsEXT::PERFORMANCE_WARNING,
        )
        .pfn_callback(Some(debug_report_callback))
}

/// Registers a debug report callback with an instance.
pub trait DebugReportRegistrar {
    type Channel;

    fn register(&self, create_info: &vk::DebugReportCallbackCreateInfoEXT) -> Result<Self::Channel>;
}

/// The debug channel exists exactly when validation layers are in use; an
/// empty layer list never reaches the registrar.
pub fn install_debug_channel<R: DebugReportRegistrar>(
    registrar: &R,
    layers: &[CString],
) -> Result<Option<R::Channel>> {
    if layers.is_empty() {
        log::debug!("No validation layers, skipping debug callback");
        return Ok(None);
    }
    let channel = registrar.register(&fill_create_info())?;
    log::info!("Installed debug callback for {:?}", layers);
    Ok(Some(channel))
}

pub struct DebugChannel {
    loader: debug_report::Instance,
    handle: vk::DebugReportCallbackEXT,
}

pub struct NativeDebugReport<'a> {
    entry: &'a ash::Entry,
    instance: &'a ash::Instance,
}

impl<'a> NativeDebugReport<'a> {
    pub fn new(entry: &'a ash::Entry, instance: &'a ash::Instance) -> Self {
        NativeDebugReport { entry, instance }
    }
}

impl DebugReportRegistrar for NativeDebugReport<'_> {
    type Channel = DebugChannel;

    fn register(&self, create_info: &vk::DebugReportCallbackCreateInfoEXT) -> Result<DebugChannel> {
        // ash substitutes a panicking stub for missing entry points, so look
        // the function up ourselves first.
        let create_fn = unsafe {
            self.entry.get_instance_proc_addr(
                self.instance.handle(),
                c"vkCreateDebugReportCallbackEXT".as_ptr(),
            )
        };
        if create_fn.is_none() {
            return Err(InitializationError::DebugChannelUnavailable);
        }

        let loader = debug_report::Instance::new(self.entry, self.instance);
        #[allow(deprecated)]
        let handle = unsafe {
            loader
                .create_debug_report_callback(create_info, None)
                .map_err(InitializationError::DebugChannelCreation)?
        };
        Ok(DebugChannel { loader, handle })
    }
}

impl Drop for DebugChannel {
    #[allow(deprecated)]
    fn drop(&mut self) {
        log::debug!("Destroying debug callback!");
        unsafe {
            self.loader.destroy_debug_report_callback(self.handle, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct CountingRegistrar {
        calls: Cell<usize>,
        unavailable: bool,
    }

    impl DebugReportRegistrar for CountingRegistrar {
        type Channel = u32;

        fn register(&self, create_info: &vk::DebugReportCallbackCreateInfoEXT) -> Result<u32> {
            self.calls.set(self.calls.get() + 1);
            assert!(create_info.pfn_callback.is_some());
            if self.unavailable {
                Err(InitializationError::DebugChannelUnavailable)
            } else {
                Ok(7)
            }
        }
    }

    #[test]
    fn no_layers_means_no_channel_and_no_registration() {
        let registrar = CountingRegistrar::default();
        let channel = install_debug_channel(&registrar, &[]).unwrap();
        assert!(channel.is_none());
        assert_eq!(registrar.calls.get(), 0);
    }

    #[test]
    fn layers_install_exactly_one_channel() {
        let registrar = CountingRegistrar::default();
        let layers = [c"VK_LAYER_KHRONOS_validation".to_owned()];
        let channel = install_debug_channel(&registrar, &layers).unwrap();
        assert_eq!(channel, Some(7));
        assert_eq!(registrar.calls.get(), 1);
    }

    #[test]
    fn missing_entry_point_is_an_error() {
        let registrar = CountingRegistrar {
            unavailable: true,
            ..Default::default()
        };
        let layers = [c"VK_LAYER_KHRONOS_validation".to_owned()];
        let err = install_debug_channel(&registrar, &layers).unwrap_err();
        assert!(matches!(err, InitializationError::DebugChannelUnavailable));
    }

    #[test]
    fn callback_never_aborts_the_call() {
        let result = unsafe {
            debug_report_callback(
                vk::DebugReportFlagsEXT::ERROR,
                vk::DebugReportObjectTypeEXT::DEVICE,
                0xdead,
                0,
                42,
                c"Validation".as_ptr(),
                c"vkCreateDevice: bad things".as_ptr(),
                std::ptr::null_mut(),
            )
        };
        assert_eq!(result, vk::FALSE);
    }

    #[test]
    fn callback_tolerates_null_strings() {
        let result = unsafe {
            debug_report_callback(
                vk::DebugReportFlagsEXT::INFORMATION,
                vk::DebugReportObjectTypeEXT::UNKNOWN,
                0,
                0,
                0,
                std::ptr::null(),
                std::ptr::null(),
                std::ptr::null_mut(),
            )
        };
        assert_eq!(result, vk::FALSE);
    }
}
