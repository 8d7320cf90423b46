/// Owns every bootstrap resource that currently exists and releases them in
/// reverse dependency order: device, debug channel, surface, instance, window.
///
/// Slots are filled as each step succeeds, so dropping a half-built record
/// (e.g. after an early `?`) destroys exactly what was created. Destruction
/// itself happens in each resource's `Drop`.
pub struct Teardown<D, C, S, I, W> {
    pub device: Option<D>,
    pub debug_channel: Option<C>,
    pub surface: Option<S>,
    pub instance: Option<I>,
    pub window: Option<W>,
}

impl<D, C, S, I, W> Teardown<D, C, S, I, W> {
    pub fn new() -> Self {
        Teardown {
            device: None,
            debug_channel: None,
            surface: None,
            instance: None,
            window: None,
        }
    }

    /// Safe to call repeatedly; already released slots are skipped.
    pub fn run(&mut self) {
        if let Some(device) = self.device.take() {
            log::debug!("Teardown: logical device");
            drop(device);
        }
        if let Some(debug_channel) = self.debug_channel.take() {
            log::debug!("Teardown: debug channel");
            drop(debug_channel);
        }
        if let Some(surface) = self.surface.take() {
            log::debug!("Teardown: surface");
            drop(surface);
        }
        if let Some(instance) = self.instance.take() {
            log::debug!("Teardown: instance");
            drop(instance);
        }
        if let Some(window) = self.window.take() {
            log::debug!("Teardown: window");
            drop(window);
        }
    }
}

impl<D, C, S, I, W> Default for Teardown<D, C, S, I, W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, C, S, I, W> Drop for Teardown<D, C, S, I, W> {
    fn drop(&mut self) {
        self.run();
    }
}
