//! The winit application driver: per-frame rendering plus the egui overlay.
//!
//! `DemoApp` owns everything the loop touches -- window, GL context, scene,
//! overlay state -- as one explicit value instead of process-wide globals.
//! Graphics objects are created in `resumed` (the first point where winit
//! allows window creation) and torn down in `exiting` while the context is
//! still current.

use std::sync::Arc;
use std::time::Duration;

use egui_demo_lib::DemoWindows;
use egui_glow::EguiGlow;
use winit::application::ApplicationHandler;
use winit::event::{StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoopProxy};
use winit::window::WindowId;

use glimpse_core::{DemoConfig, MeshData, Scene, ShaderSource};

use crate::window::GlutinWindow;

/// Events the egui repaint callback feeds back into the loop.
#[derive(Debug)]
pub enum UserEvent {
    /// egui asked to be repainted after the given delay.
    Redraw(Duration),
}

/// State behind the overlay panels.
struct OverlayState {
    clear_color: [f32; 3],
    slider_value: f32,
    show_another_window: bool,
    show_demo_windows: bool,
    demo_windows: DemoWindows,
}

impl OverlayState {
    fn new(clear_color: [f32; 3]) -> Self {
        Self {
            clear_color,
            slider_value: 0.0,
            show_another_window: false,
            show_demo_windows: false,
            demo_windows: DemoWindows::default(),
        }
    }

    fn ui(&mut self, ctx: &egui::Context, quit: &mut bool) {
        egui::SidePanel::left("controls").show(ctx, |ui| {
            ui.heading("Hello, world!");
            ui.add(egui::Slider::new(&mut self.slider_value, 0.0..=1.0).text("float"));
            ui.color_edit_button_rgb(&mut self.clear_color);

            if ui.button("Demo Windows").clicked() {
                self.show_demo_windows = !self.show_demo_windows;
            }
            if ui.button("Another Window").clicked() {
                self.show_another_window = !self.show_another_window;
            }

            let dt = ctx.input(|i| i.stable_dt).max(1e-6);
            ui.label(format!(
                "Application average {:.3} ms/frame ({:.1} FPS)",
                f64::from(dt) * 1000.0,
                1.0 / f64::from(dt)
            ));

            if ui.button("Quit").clicked() {
                *quit = true;
            }
        });

        if self.show_another_window {
            egui::Window::new("Another Window")
                .open(&mut self.show_another_window)
                .default_size([200.0, 100.0])
                .show(ctx, |ui| {
                    ui.label("Hello");
                });
        }

        if self.show_demo_windows {
            self.demo_windows.ui(ctx);
        }
    }
}

/// The demo application: render loop state and egui integration.
pub struct DemoApp {
    config: DemoConfig,
    sources: ShaderSource,
    mesh_data: MeshData,
    proxy: EventLoopProxy<UserEvent>,
    window: Option<GlutinWindow>,
    gl: Option<Arc<glow::Context>>,
    egui_glow: Option<EguiGlow>,
    scene: Option<Scene>,
    overlay: OverlayState,
    repaint_delay: Duration,
    failure: Option<String>,
}

impl DemoApp {
    /// Creates an app that will build its graphics objects on `resumed`.
    pub fn new(
        config: DemoConfig,
        sources: ShaderSource,
        mesh_data: MeshData,
        proxy: EventLoopProxy<UserEvent>,
    ) -> Self {
        let overlay = OverlayState::new(config.clear_color);
        Self {
            config,
            sources,
            mesh_data,
            proxy,
            window: None,
            gl: None,
            egui_glow: None,
            scene: None,
            overlay,
            repaint_delay: Duration::MAX,
            failure: None,
        }
    }

    /// The startup failure that ended the loop, if any.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, message: String) {
        log::error!("{message}");
        self.failure = Some(message);
        event_loop.exit();
    }

    #[allow(unsafe_code)]
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        use glow::HasContext;

        let (Some(window), Some(gl), Some(egui_glow), Some(scene)) = (
            self.window.as_ref(),
            self.gl.as_ref(),
            self.egui_glow.as_mut(),
            self.scene.as_mut(),
        ) else {
            return;
        };

        scene.advance();

        let overlay = &mut self.overlay;
        let mut quit = false;
        egui_glow.run(window.window(), |ctx| {
            overlay.ui(ctx, &mut quit);
            // The mesh spins every frame, so the loop never goes idle.
            ctx.request_repaint();
        });

        if quit {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(if self.repaint_delay.is_zero() {
            window.window().request_redraw();
            ControlFlow::Poll
        } else if let Some(repaint_at) = std::time::Instant::now().checked_add(self.repaint_delay)
        {
            ControlFlow::WaitUntil(repaint_at)
        } else {
            ControlFlow::Wait
        });

        let [r, g, b] = self.overlay.clear_color;
        // SAFETY: clear state and mask use valid constants on a current context.
        unsafe {
            gl.clear_color(r, g, b, 1.0);
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }

        let size = window.inner_size();
        scene.draw(gl, size.width, size.height);

        egui_glow.paint(window.window());

        if let Err(e) = window.swap_buffers() {
            log::warn!("failed to swap buffers: {e}");
        }
    }
}

impl ApplicationHandler<UserEvent> for DemoApp {
    #[allow(unsafe_code)]
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match GlutinWindow::new(event_loop, &self.config) {
            Ok(window) => window,
            Err(e) => return self.fail(event_loop, format!("graphics init failed: {e}")),
        };

        let gl = Arc::new(window.load_glow());

        {
            use glow::HasContext;
            // SAFETY: VERSION is a valid string query on a current context.
            let version = unsafe { gl.get_parameter_string(glow::VERSION) };
            log::info!("OpenGL version: {version}");
        }

        let egui_glow = EguiGlow::new(event_loop, gl.clone(), None, None, true);
        let proxy = egui::mutex::Mutex::new(self.proxy.clone());
        egui_glow
            .egui_ctx
            .set_request_repaint_callback(move |info| {
                if let Err(e) = proxy.lock().send_event(UserEvent::Redraw(info.delay)) {
                    log::warn!("failed to schedule repaint: {e}");
                }
            });

        self.gl = Some(gl.clone());
        self.egui_glow = Some(egui_glow);

        match Scene::new(&gl, &self.sources, &self.mesh_data, &self.config) {
            Ok(scene) => {
                self.scene = Some(scene);
                window.window().set_visible(true);
                window.window().request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                // Keep the window so exiting() can tear egui down with a
                // current context.
                self.window = Some(window);
                self.fail(event_loop, format!("failed to build scene: {e}"));
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested | WindowEvent::Destroyed) {
            event_loop.exit();
            return;
        }

        if matches!(event, WindowEvent::RedrawRequested) {
            self.redraw(event_loop);
            return;
        }

        if let WindowEvent::Resized(physical_size) = &event {
            if let Some(window) = &self.window {
                window.resize(*physical_size);
            }
        }

        if let (Some(window), Some(egui_glow)) = (self.window.as_ref(), self.egui_glow.as_mut()) {
            let response = egui_glow.on_window_event(window.window(), &event);
            if response.repaint {
                window.window().request_redraw();
            }
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: UserEvent) {
        match event {
            UserEvent::Redraw(delay) => {
                self.repaint_delay = delay;
                if delay.is_zero() {
                    if let Some(window) = &self.window {
                        window.window().request_redraw();
                    }
                }
            }
        }
    }

    fn new_events(&mut self, _event_loop: &ActiveEventLoop, cause: StartCause) {
        if let StartCause::ResumeTimeReached { .. } = cause {
            if let Some(window) = &self.window {
                window.window().request_redraw();
            }
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(egui_glow) = self.egui_glow.as_mut() {
            egui_glow.destroy();
        }
        if let (Some(gl), Some(scene)) = (self.gl.as_ref(), self.scene.as_mut()) {
            scene.release(gl);
        }
    }
}
