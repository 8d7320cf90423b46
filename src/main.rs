use std::process::ExitCode;
use std::sync::Arc;
use vulkan_bootstrap::{ApplicationConfig, InitializationError, VulkanContext};
use winit::application::ApplicationHandler;
use winit::event::ElementState;
use winit::event::{KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::KeyCode;
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

struct VulkanApp {
    config: ApplicationConfig,
    context: Option<VulkanContext>,
    error: Option<InitializationError>,
}

impl VulkanApp {
    fn new(config: ApplicationConfig) -> VulkanApp {
        VulkanApp {
            config,
            context: None,
            error: None,
        }
    }

    fn init_window(
        &self,
        event_loop: &ActiveEventLoop,
    ) -> Result<Arc<Window>, InitializationError> {
        let window = event_loop.create_window(
            Window::default_attributes()
                .with_title(self.config.window_title.clone())
                .with_inner_size(winit::dpi::LogicalSize::new(
                    self.config.window_width,
                    self.config.window_height,
                ))
                .with_resizable(false),
        )?;
        log::info!("Created window");
        Ok(Arc::new(window))
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), InitializationError> {
        let window = self.init_window(event_loop)?;
        self.context = Some(VulkanContext::new(&self.config, window)?);
        Ok(())
    }

    fn close(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(context) = &self.context {
            context.wait_idle();
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for VulkanApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.context.is_some() || self.error.is_some() {
            return;
        }
        log::info!("Setting up window and Vulkan");
        if let Err(err) = self.init(event_loop) {
            self.error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("The close button was pressed; stopping");
                self.close(event_loop);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Released,
                        ..
                    },
                ..
            } => {
                log::info!("Escape was pressed; Closing window");
                self.close(event_loop);
            }
            _ => (),
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Release Vulkan objects and the window while the event loop is alive.
        if let Some(mut context) = self.context.take() {
            context.teardown();
        }
    }
}

fn run(config: ApplicationConfig) -> Result<(), InitializationError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = VulkanApp::new(config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn main() -> ExitCode {
    env_logger::init();

    match run(ApplicationConfig::default()) {
        Ok(()) => {
            log::info!("Exiting Program");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
