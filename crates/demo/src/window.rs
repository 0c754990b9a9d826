//! Window plus GL context/surface wrapper over winit and glutin.
//!
//! Owns the native window, the glutin display, the current context, and
//! the window surface, and exposes the small surface area the render loop
//! needs: size queries, resize, buffer swap, and a loader for building a
//! `glow::Context`. Created inside `resumed`, where winit makes window
//! creation available.

use std::ffi::CStr;
use std::num::NonZeroU32;

use glutin::config::ConfigTemplateBuilder;
use glutin::context::{ContextApi, ContextAttributesBuilder, PossiblyCurrentContext};
use glutin::display::{Display, GetGlDisplay, GlDisplay};
use glutin::prelude::{GlSurface, NotCurrentGlContext};
use glutin::surface::{Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use glutin_winit::{ApiPreference, DisplayBuilder};
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event_loop::ActiveEventLoop;
use winit::raw_window_handle::HasWindowHandle;
use winit::window::{Window, WindowAttributes};

use glimpse_core::DemoConfig;

/// The demo's window with its GL display, context, and surface.
pub struct GlutinWindow {
    window: Window,
    gl_context: PossiblyCurrentContext,
    gl_display: Display,
    gl_surface: Surface<WindowSurface>,
}

impl GlutinWindow {
    /// Creates a hidden window with a current GL context and a vsync'd
    /// surface. The caller makes it visible after the first frame is
    /// ready, which avoids flashing an empty window.
    ///
    /// # Errors
    ///
    /// Returns a descriptive message when any stage of display, context,
    /// window, or surface creation fails.
    #[allow(unsafe_code)]
    pub fn new(event_loop: &ActiveEventLoop, config: &DemoConfig) -> Result<Self, String> {
        let window_attributes = WindowAttributes::default()
            .with_resizable(true)
            .with_inner_size(LogicalSize {
                width: f64::from(config.width),
                height: f64::from(config.height),
            })
            .with_title(&config.title)
            .with_visible(false);

        // The demo draws a depth-tested mesh, so ask for a real depth buffer.
        let config_template = ConfigTemplateBuilder::new()
            .prefer_hardware_accelerated(None)
            .with_depth_size(24)
            .with_stencil_size(0)
            .with_transparency(false);

        let (mut window, gl_config) = DisplayBuilder::new()
            .with_preference(ApiPreference::FallbackEgl)
            .with_window_attributes(Some(window_attributes.clone()))
            .build(event_loop, config_template, |mut configs| {
                configs
                    .next()
                    .expect("no matching GL framebuffer configuration")
            })
            .map_err(|e| format!("failed to create GL display: {e}"))?;

        log::debug!("selected GL config: {gl_config:?}");

        let raw_window_handle = match &window {
            Some(w) => Some(
                w.window_handle()
                    .map_err(|e| format!("failed to get window handle: {e}"))?
                    .as_raw(),
            ),
            None => None,
        };

        let context_attributes = ContextAttributesBuilder::new().build(raw_window_handle);
        // Fall back to GLES when a core desktop context is unavailable.
        let fallback_context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::Gles(None))
            .build(raw_window_handle);

        let gl_display = gl_config.display();

        // SAFETY: the raw window handle, when present, belongs to a live
        // winit window owned by this function.
        let not_current_gl_context = unsafe {
            gl_display
                .create_context(&gl_config, &context_attributes)
                .or_else(|_| {
                    log::debug!("core GL context unavailable, retrying with GLES attributes");
                    gl_display.create_context(&gl_config, &fallback_context_attributes)
                })
                .map_err(|e| format!("failed to create GL context: {e}"))?
        };

        let window = match window.take() {
            Some(w) => w,
            None => glutin_winit::finalize_window(event_loop, window_attributes, &gl_config)
                .map_err(|e| format!("failed to create window: {e}"))?,
        };

        let (width, height): (u32, u32) = window.inner_size().into();
        let surface_attributes = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            window
                .window_handle()
                .map_err(|e| format!("failed to get window handle: {e}"))?
                .as_raw(),
            NonZeroU32::new(width).unwrap_or(NonZeroU32::MIN),
            NonZeroU32::new(height).unwrap_or(NonZeroU32::MIN),
        );

        // SAFETY: the surface attributes reference the window handle above,
        // which outlives the surface inside this struct.
        let gl_surface = unsafe {
            gl_display
                .create_window_surface(&gl_config, &surface_attributes)
                .map_err(|e| format!("failed to create window surface: {e}"))?
        };

        let gl_context = not_current_gl_context
            .make_current(&gl_surface)
            .map_err(|e| format!("failed to make GL context current: {e}"))?;

        if let Err(e) =
            gl_surface.set_swap_interval(&gl_context, SwapInterval::Wait(NonZeroU32::MIN))
        {
            log::warn!("failed to enable vsync: {e}");
        }

        Ok(Self {
            window,
            gl_context,
            gl_display,
            gl_surface,
        })
    }

    /// The underlying winit window.
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Current framebuffer size in physical pixels.
    pub fn inner_size(&self) -> PhysicalSize<u32> {
        self.window.inner_size()
    }

    /// Resizes the GL surface to match a new framebuffer size. Zero-sized
    /// updates (minimized window) are ignored.
    pub fn resize(&self, physical_size: PhysicalSize<u32>) {
        let (Some(width), Some(height)) = (
            NonZeroU32::new(physical_size.width),
            NonZeroU32::new(physical_size.height),
        ) else {
            return;
        };
        self.gl_surface.resize(&self.gl_context, width, height);
    }

    /// Presents the back buffer.
    pub fn swap_buffers(&self) -> glutin::error::Result<()> {
        self.gl_surface.swap_buffers(&self.gl_context)
    }

    /// Builds a `glow::Context` over this window's GL display.
    #[allow(unsafe_code)]
    pub fn load_glow(&self) -> glow::Context {
        // SAFETY: the loader queries proc addresses from the display that
        // owns the current context; glow requires exactly that pairing.
        unsafe {
            glow::Context::from_loader_function(|symbol| {
                let symbol = std::ffi::CString::new(symbol)
                    .expect("GL symbol name contained an interior NUL byte");
                self.get_proc_address(&symbol)
            })
        }
    }

    fn get_proc_address(&self, addr: &CStr) -> *const std::ffi::c_void {
        self.gl_display.get_proc_address(addr)
    }
}
