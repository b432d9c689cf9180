use std::ffi::CString;
use std::num::NonZeroU32;

use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, NotCurrentGlContextSurfaceAccessor, Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, WindowSurface};

use glutin_winit::DisplayBuilder;

use raw_window_handle::HasRawWindowHandle;

use thiserror::Error;

use winit::dpi::{PhysicalPosition, PhysicalSize, Size};
use winit::event::{Event, WindowEvent};
use winit::event_loop::EventLoop;
use winit::window::{Window, WindowBuilder};

use gl_wrapper::backend::NativeGl;

use crate::app::Application;
use crate::clock::{FrameClock, FrameTime};
use crate::config::WindowConfig;
use crate::context::ContextError;

///
/// Opens the window, makes an OpenGL 3.3 context current on it and drives the application
/// built by `build` until the window is closed.
///
/// Only returns when setup or `on_load` fails.
///
pub fn run<A, F>(config: &WindowConfig, build: F) -> Result<(), WindowError>
where
    A: Application + 'static,
    F: FnOnce(NativeGl) -> A,
{
    let event_loop = EventLoop::new();
    let window_builder = WindowBuilder::new()
        .with_inner_size(Size::Physical(PhysicalSize::new(
            config.width,
            config.height,
        )))
        .with_min_inner_size(Size::Physical(PhysicalSize::new(32, 32)))
        .with_title(&config.title);
    let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));
    let template = ConfigTemplateBuilder::new();

    let (window, gl_config) = display_builder
        .build(&event_loop, template, |mut configs| {
            // find_configs fails before handing over an empty iterator
            configs.next().expect("no GL config offered")
        })
        .map_err(|e| WindowError::Display(e.to_string()))?;

    let window = window.ok_or(WindowError::NoWindow)?;
    if config.centered {
        center(&window);
    }

    let handle = window.raw_window_handle();
    let gl_display = gl_config.display();

    let context_attr = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
        .build(Some(handle));

    let gl_window = GlWindow::new(window, &gl_config)?;

    let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attr)? }
        .make_current(&gl_window.surface)?;

    gl::load_with(|symbol| match CString::new(symbol) {
        Ok(symbol) => gl_display.get_proc_address(symbol.as_c_str()).cast(),
        Err(_) => std::ptr::null(),
    });

    let mut app = build(NativeGl);
    app.on_load()?;

    let (width, height): (u32, u32) = gl_window.window.inner_size().into();
    app.on_resize(width, height);

    log::info!("Opened \"{}\" at {width}x{height}", config.title);

    let mut clock = FrameClock::new();
    let mut frame = FrameTime::default();

    event_loop.run(move |event, _window_target, control_flow| {
        control_flow.set_poll();
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::Resized(size) => {
                    if let (Some(w), Some(h)) =
                        (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                    {
                        gl_window.surface.resize(&gl_context, w, h);
                        app.on_resize(size.width, size.height);
                    }
                }
                WindowEvent::CloseRequested => control_flow.set_exit(),
                _ => (),
            },
            Event::MainEventsCleared => {
                frame = clock.tick();
                app.on_update(frame);
                gl_window.window.request_redraw();
            }
            Event::RedrawRequested(_) => {
                app.on_render(frame);

                if let Err(e) = gl_window.surface.swap_buffers(&gl_context) {
                    log::error!("Could not present frame: {e}");
                }
            }
            Event::LoopDestroyed => {
                app.on_unload();
            }
            _ => (),
        }
    })
}

fn center(window: &Window) {
    if let Some(monitor) = window.current_monitor() {
        let screen = monitor.size();
        let origin = monitor.position();
        let size = window.outer_size();

        let x = origin.x + (screen.width as i32 - size.width as i32) / 2;
        let y = origin.y + (screen.height as i32 - size.height as i32) / 2;

        window.set_outer_position(PhysicalPosition::new(x, y));
    }
}

pub struct GlWindow {
    // XXX the surface must be dropped before the window.
    pub surface: Surface<WindowSurface>,
    pub window: Window,
}

impl GlWindow {
    pub fn new(window: Window, config: &Config) -> Result<Self, WindowError> {
        let (width, height): (u32, u32) = window.inner_size().into();
        let raw_window_handle = window.raw_window_handle();
        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_window_handle,
            NonZeroU32::new(width).ok_or(WindowError::ZeroSize)?,
            NonZeroU32::new(height).ok_or(WindowError::ZeroSize)?,
        );

        let surface = unsafe { config.display().create_window_surface(config, &attrs)? };

        Ok(Self { window, surface })
    }
}

#[derive(Debug, Error)]
pub enum WindowError {
    #[error("Could not create GL display: {0}")]
    Display(String),
    #[error("Display was created without a window")]
    NoWindow,
    #[error("Window has no area")]
    ZeroSize,
    #[error(transparent)]
    Gl(#[from] glutin::error::Error),
    #[error(transparent)]
    Load(#[from] ContextError),
}
