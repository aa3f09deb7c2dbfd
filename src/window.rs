// Window module - Drives a QuadBackend from a winit event loop
//
// This module wires the presentation backend to a real window:
// - the window is created on resume and handed to WgpuContext
// - RedrawRequested posts a test-pattern frame, draws and swaps
// - Resized recomputes the viewport
// - hotkeys toggle filtering and scaling locks, F9 saves a screenshot

use crate::config::VideoConfig;
use crate::pattern::TestPattern;
use crate::screenshot::save_screenshot;
use crate::video::{QuadBackend, VideoBackend, VideoError, WgpuContext};
use std::sync::Arc;
use tracing::{error, info};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

/// Logical width of the demo framebuffer
pub const LOGICAL_WIDTH: u32 = 256;

/// Logical height of the demo framebuffer
pub const LOGICAL_HEIGHT: u32 = 224;

/// Window presenting a test pattern through the quad backend
pub struct PresentWindow {
    window: Option<Arc<Window>>,
    backend: Option<QuadBackend<WgpuContext>>,
    config: VideoConfig,
    pattern: TestPattern,
    error: Option<VideoError>,
}

impl PresentWindow {
    /// Create a new presentation window (created when the event loop starts)
    pub fn new(config: VideoConfig) -> Self {
        Self {
            window: None,
            backend: None,
            pattern: TestPattern::new(LOGICAL_WIDTH, LOGICAL_HEIGHT, config.pixel_format),
            config,
            error: None,
        }
    }

    /// Current configuration, including runtime toggles
    pub fn config(&self) -> &VideoConfig {
        &self.config
    }

    /// Fatal error that stopped the event loop, if any
    pub fn take_error(&mut self) -> Option<VideoError> {
        self.error.take()
    }

    fn start(&mut self, window: Arc<Window>) -> Result<(), VideoError> {
        let context = WgpuContext::new().with_vsync(self.config.vsync);
        let mut backend = QuadBackend::new(context, self.config.pixel_format)
            .with_filter(self.config.filter)
            .with_policy(self.config.scaling_policy());

        let size = window.inner_size();
        backend.init(window.clone())?;
        backend.set_dimensions(LOGICAL_WIDTH, LOGICAL_HEIGHT)?;
        backend.resized(size.width, size.height)?;

        self.window = Some(window);
        self.backend = Some(backend);
        Ok(())
    }

    fn render(&mut self) -> Result<(), VideoError> {
        let Some(backend) = self.backend.as_mut() else {
            return Ok(());
        };

        backend.post_frame(self.pattern.next_frame())?;
        backend.draw_frame()?;
        if let Some(swapper) = backend.swapper() {
            swapper.swap()?;
        }
        Ok(())
    }

    fn resize(&mut self, size: PhysicalSize<u32>) -> Result<(), VideoError> {
        match self.backend.as_mut() {
            Some(backend) => backend.resized(size.width, size.height),
            None => Ok(()),
        }
    }

    /// Re-run the viewport math after a policy toggle
    fn refresh_viewport(&mut self) -> Result<(), VideoError> {
        match &self.window {
            Some(window) => {
                let size = window.inner_size();
                self.resize(size)
            }
            None => Ok(()),
        }
    }

    fn handle_key(&mut self, key: KeyCode, event_loop: &ActiveEventLoop) -> Result<(), VideoError> {
        match key {
            KeyCode::KeyF => {
                self.config.filter = !self.config.filter;
                if let Some(backend) = self.backend.as_mut() {
                    backend.set_filter(self.config.filter);
                }
                println!("Linear filtering: {}", self.config.filter);
            }
            KeyCode::KeyA => {
                self.config.lock_aspect_ratio = !self.config.lock_aspect_ratio;
                if let Some(backend) = self.backend.as_mut() {
                    backend.set_lock_aspect_ratio(self.config.lock_aspect_ratio);
                }
                println!("Aspect ratio lock: {}", self.config.lock_aspect_ratio);
                self.refresh_viewport()?;
            }
            KeyCode::KeyI => {
                self.config.lock_integer_scaling = !self.config.lock_integer_scaling;
                if let Some(backend) = self.backend.as_mut() {
                    backend.set_lock_integer_scaling(self.config.lock_integer_scaling);
                }
                println!("Integer scaling lock: {}", self.config.lock_integer_scaling);
                self.refresh_viewport()?;
            }
            KeyCode::F9 => self.screenshot(),
            KeyCode::Escape => self.shutdown(event_loop),
            _ => {}
        }
        Ok(())
    }

    fn screenshot(&self) {
        match save_screenshot(
            self.pattern.current_frame(),
            LOGICAL_WIDTH,
            LOGICAL_HEIGHT,
            self.config.pixel_format,
            &self.config.screenshot_directory,
        ) {
            Ok(path) => println!("Screenshot saved to: {}", path.display()),
            Err(err) => eprintln!("Screenshot failed: {}", err),
        }
    }

    fn fail(&mut self, err: VideoError, event_loop: &ActiveEventLoop) {
        error!(error = %err, "presentation stopped");
        self.error = Some(err);
        self.shutdown(event_loop);
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(mut backend) = self.backend.take() {
            if let Err(err) = backend.deinit() {
                error!(error = %err, "failed to release video backend");
            }
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for PresentWindow {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let (width, height) = self.config.window_size(LOGICAL_WIDTH, LOGICAL_HEIGHT);
        let window_attributes = Window::default_attributes()
            .with_title(format!("fb-present - {}x{}", LOGICAL_WIDTH, LOGICAL_HEIGHT))
            .with_inner_size(PhysicalSize::new(width, height))
            .with_resizable(true);

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                eprintln!("Failed to create window: {}", err);
                event_loop.exit();
                return;
            }
        };

        if let Err(err) = self.start(window) {
            self.fail(err, event_loop);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let result = match event {
            WindowEvent::CloseRequested => {
                println!("Close requested, exiting...");
                self.shutdown(event_loop);
                Ok(())
            }
            WindowEvent::Resized(size) => self.resize(size),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => self.handle_key(key, event_loop),
            WindowEvent::RedrawRequested => self.render(),
            _ => Ok(()),
        };

        if let Err(err) = result {
            self.fail(err, event_loop);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Create and run the presentation window
///
/// # Arguments
/// * `config` - Video configuration
///
/// # Returns
/// The final configuration, including runtime toggles, or the error that
/// stopped presentation
pub fn run_window(config: VideoConfig) -> Result<VideoConfig, Box<dyn std::error::Error>> {
    let event_loop = EventLoop::new()?;

    // Present paces itself when vsync is on
    if config.vsync {
        event_loop.set_control_flow(ControlFlow::Wait);
    } else {
        event_loop.set_control_flow(ControlFlow::Poll);
    }

    let mut app = PresentWindow::new(config);
    info!(
        width = LOGICAL_WIDTH,
        height = LOGICAL_HEIGHT,
        format = ?app.config().pixel_format,
        "starting presentation window"
    );
    event_loop.run_app(&mut app)?;

    match app.take_error() {
        Some(err) => Err(err.into()),
        None => Ok(app.config().clone()),
    }
}
