//! Application window and event loop.
//!
//! One native window hosting the lookup panel: winit for the window, wgpu
//! for the surface, egui for the UI. The loop sleeps with
//! `ControlFlow::WaitUntil`, waking only for the placeholder rotation, copy
//! feedback reversion, in-flight lookups, flag animation frames, and the
//! optional `--exit-after` deadline.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tokio::runtime::Runtime;
use wgpu::SurfaceError;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

use crate::cli::RuntimeOptions;
use crate::config::Config;
use crate::lookup_ui::LookupUI;

/// How often to repaint while a lookup is in flight.
const LOADING_POLL: Duration = Duration::from_millis(100);

/// Frame interval while the flag animation is playing.
const ANIMATION_FRAME: Duration = Duration::from_millis(16);

/// Main application entry: loads config and runs the event loop.
pub struct App {
    config: Config,
    runtime: Arc<Runtime>,
    options: RuntimeOptions,
}

impl App {
    pub fn new(runtime: Arc<Runtime>, options: RuntimeOptions) -> Result<Self> {
        let mut config = Config::load()?;
        if let Some(ref endpoint) = options.endpoint {
            config.endpoint = endpoint.clone();
        }
        Ok(Self {
            config,
            runtime,
            options,
        })
    }

    pub fn run(self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut state = AppState::new(self.config, self.runtime, self.options);
        event_loop.run_app(&mut state)?;

        state.failure.map_or(Ok(()), Err)
    }
}

/// Window, GPU surface, and egui plumbing. Created once the event loop
/// resumes.
struct GpuState {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    surface_config: wgpu::SurfaceConfiguration,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl GpuState {
    async fn new(event_loop: &ActiveEventLoop, config: &Config) -> Result<Self> {
        let window_attrs = Window::default_attributes()
            .with_title("GeoLens")
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.window_width,
                config.window_height,
            ))
            .with_min_inner_size(winit::dpi::LogicalSize::new(560, 420))
            .with_resizable(true);

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let size = window.inner_size();

        // Platform-specific backend selection for better VM compatibility
        #[cfg(target_os = "windows")]
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::DX12,
            ..Default::default()
        });
        #[cfg(target_os = "macos")]
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        #[cfg(target_os = "linux")]
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::VULKAN | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("Failed to find suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await?;

        let device = Arc::new(device);
        let queue = Arc::new(queue);

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let scale_factor = window.scale_factor() as f32;
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(scale_factor),
            None,
            None,
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            &device,
            surface_format,
            egui_wgpu::RendererOptions {
                msaa_samples: 1,
                depth_stencil_format: None,
                dithering: false,
                predictable_texture_filtering: false,
            },
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            surface_config,
            egui_ctx,
            egui_state,
            egui_renderer,
        })
    }
}

/// Application state that handles events
struct AppState {
    config: Config,
    runtime: Arc<Runtime>,
    options: RuntimeOptions,
    gpu: Option<GpuState>,
    ui: LookupUI,
    next_placeholder_tick: Option<Instant>,
    exit_deadline: Option<Instant>,
    needs_redraw: bool,
    /// Whether the previous wake saw a lookup in flight; the edge to false
    /// forces the frame that paints the settled result.
    was_loading: bool,
    /// Armed copy-feedback reversion; the edge to None forces the frame
    /// that paints the reverted glyph.
    pending_copy_revert: Option<Instant>,
    failure: Option<anyhow::Error>,
}

impl AppState {
    fn new(config: Config, runtime: Arc<Runtime>, options: RuntimeOptions) -> Self {
        let ui = LookupUI::new(&config);
        Self {
            config,
            runtime,
            options,
            gpu: None,
            ui,
            next_placeholder_tick: None,
            exit_deadline: None,
            needs_redraw: false,
            was_loading: false,
            pending_copy_revert: None,
            failure: None,
        }
    }

    fn render(&mut self) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(SurfaceError::Lost | SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.surface_config);
                return;
            }
            Err(SurfaceError::Timeout) => {
                log::warn!("Surface timeout");
                return;
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let raw_input = gpu.egui_state.take_egui_input(&gpu.window);
        let ui = &mut self.ui;
        let egui_output = gpu.egui_ctx.run(raw_input, |ctx| {
            ui.show(ctx);
        });

        // Honor copy commands egui produced itself (e.g. text selected in
        // the result pane and copied with the keyboard).
        for cmd in &egui_output.platform_output.commands {
            if let egui::OutputCommand::CopyText(text) = cmd
                && let Ok(mut clipboard) = arboard::Clipboard::new()
                && let Err(e) = clipboard.set_text(text)
            {
                log::warn!("failed to copy to clipboard: {}", e);
            }
        }
        gpu.egui_state
            .handle_platform_output(&gpu.window, egui_output.platform_output.clone());

        let paint_jobs = gpu
            .egui_ctx
            .tessellate(egui_output.shapes, gpu.egui_ctx.pixels_per_point());

        for (id, delta) in &egui_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, delta);
        }

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("GeoLens Encoder"),
            });

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.surface_config.width, gpu.surface_config.height],
            pixels_per_point: gpu.window.scale_factor() as f32,
        };

        gpu.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("GeoLens Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.094,
                            g: 0.094,
                            b: 0.094,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // egui_renderer.render() requires a 'static render pass
            let mut render_pass = render_pass.forget_lifetime();
            gpu.egui_renderer
                .render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        for id in &egui_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        match self
            .runtime
            .block_on(GpuState::new(event_loop, &self.config))
        {
            Ok(gpu) => {
                log::info!("Window created");
                self.ui.mark_ready();
                if let Some(ip) = self.options.ip.take() {
                    self.ui.prefill_and_submit(&ip);
                }
                if let Some(secs) = self.options.exit_after {
                    self.exit_deadline = Some(Instant::now() + Duration::from_secs_f64(secs));
                }
                gpu.window.request_redraw();
                self.gpu = Some(gpu);
            }
            Err(e) => {
                self.failure = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        if window_id != gpu.window.id() {
            return;
        }

        let event_response = gpu.egui_state.on_window_event(&gpu.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
                return;
            }

            WindowEvent::Resized(new_size) => {
                if new_size.width > 0 && new_size.height > 0 {
                    gpu.surface_config.width = new_size.width;
                    gpu.surface_config.height = new_size.height;
                    gpu.surface.configure(&gpu.device, &gpu.surface_config);
                    gpu.window.request_redraw();
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if !event_response.consumed
                    && event.state.is_pressed()
                    && matches!(event.logical_key, Key::Named(NamedKey::Escape))
                {
                    event_loop.exit();
                    return;
                }
            }

            WindowEvent::RedrawRequested => {
                self.render();
                return;
            }

            _ => {}
        }

        if event_response.repaint
            && let Some(gpu) = &self.gpu
        {
            gpu.window.request_redraw();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();

        if let Some(deadline) = self.exit_deadline
            && now >= deadline
        {
            event_loop.exit();
            return;
        }

        // Sleep until the next component needs to update; default to a
        // quiet 1 s heartbeat.
        let mut next_wake = now + Duration::from_secs(1);

        // Placeholder rotation: tick now if due, otherwise wake for it.
        let interval = self.config.placeholder_interval();
        match self.next_placeholder_tick {
            None => {
                self.next_placeholder_tick = Some(now + interval);
            }
            Some(at) if now >= at => {
                self.ui.rotate_placeholder();
                self.next_placeholder_tick = Some(now + interval);
                self.needs_redraw = true;
            }
            Some(_) => {}
        }
        if let Some(at) = self.next_placeholder_tick
            && at < next_wake
        {
            next_wake = at;
        }

        // In-flight lookup: poll the shared phase at a short interval, and
        // paint one more frame once it settles.
        let loading = self.ui.is_loading();
        if loading {
            self.needs_redraw = true;
            let next_poll = now + LOADING_POLL;
            if next_poll < next_wake {
                next_wake = next_poll;
            }
        } else if self.was_loading {
            self.needs_redraw = true;
        }
        self.was_loading = loading;

        // Flag animation: full frame rate while playing.
        if self.ui.flag_playing() {
            self.needs_redraw = true;
            let next_frame = now + ANIMATION_FRAME;
            if next_frame < next_wake {
                next_wake = next_frame;
            }
        }

        // Copy feedback: wake exactly when a confirmation glyph reverts,
        // then paint the frame that shows the reverted glyph.
        match self.ui.next_copy_revert(now) {
            Some(revert) => {
                self.pending_copy_revert = Some(revert);
                if revert < next_wake {
                    next_wake = revert;
                }
            }
            None => {
                if self.pending_copy_revert.take().is_some() {
                    self.needs_redraw = true;
                }
            }
        }

        if let Some(deadline) = self.exit_deadline
            && deadline < next_wake
        {
            next_wake = deadline;
        }

        if self.needs_redraw
            && let Some(gpu) = &self.gpu
        {
            gpu.window.request_redraw();
            self.needs_redraw = false;
        }

        event_loop.set_control_flow(ControlFlow::WaitUntil(next_wake));
    }
}
