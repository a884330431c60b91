//! Window and input plumbing shared by the two demo binaries.
//!
//! `run::<S>` opens a window, builds the scene and drives the winit event
//! loop with a fly camera: WASD moves, the mouse looks around, the scroll
//! wheel zooms, Space toggles wireframe and Escape quits.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowId},
};

use sheen_math::{FlyCamera, MoveDirection, Vec3};
use sheen_viewport::{GpuContext, Scene};

/// Application state
struct App<S: Scene> {
    title: &'static str,
    window: Option<Arc<Window>>,
    ctx: Option<GpuContext>,
    scene: Option<S>,

    camera: FlyCamera,

    // Input state
    keys_pressed: HashSet<KeyCode>,
    last_mouse_pos: Option<(f64, f64)>,
    start_time: Instant,
    last_frame_time: Instant,
}

impl<S: Scene> App<S> {
    fn new(title: &'static str, camera_start: Vec3) -> Self {
        let now = Instant::now();
        Self {
            title,
            window: None,
            ctx: None,
            scene: None,
            camera: FlyCamera::new(camera_start),
            keys_pressed: HashSet::new(),
            last_mouse_pos: None,
            start_time: now,
            last_frame_time: now,
        }
    }

    fn move_camera(&mut self, delta_time: f32) {
        let bindings = [
            (KeyCode::KeyW, MoveDirection::Forward),
            (KeyCode::KeyS, MoveDirection::Backward),
            (KeyCode::KeyA, MoveDirection::Left),
            (KeyCode::KeyD, MoveDirection::Right),
        ];
        for (key, direction) in bindings {
            if self.keys_pressed.contains(&key) {
                self.camera.process_keyboard(direction, delta_time);
            }
        }
    }
}

impl<S: Scene> ApplicationHandler for App<S> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window_attrs = Window::default_attributes()
                .with_title(self.title)
                .with_inner_size(winit::dpi::PhysicalSize::new(1280, 720));

            let window = Arc::new(
                event_loop
                    .create_window(window_attrs)
                    .expect("Failed to create window"),
            );

            // Capture the cursor for mouse-look; not every platform
            // supports grabbing, so failure just leaves the cursor free
            if window
                .set_cursor_grab(CursorGrabMode::Confined)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked))
                .is_ok()
            {
                window.set_cursor_visible(false);
            }

            // Initialize GPU context and scene (async in pollster block)
            let ctx = pollster::block_on(GpuContext::new(window.clone()))
                .expect("Failed to initialize GPU context");
            let scene = S::create(&ctx).expect("Failed to create scene");

            self.window = Some(window);
            self.ctx = Some(ctx);
            self.scene = Some(scene);

            log::info!("Window and scene initialized");
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let (Some(ctx), Some(scene)) = (&mut self.ctx, &mut self.scene) {
                    ctx.resize((physical_size.width, physical_size.height));
                    scene.resize(ctx);
                    log::info!("Resized to {}x{}", physical_size.width, physical_size.height);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(last_pos) = self.last_mouse_pos {
                    let delta_x = (position.x - last_pos.0) as f32;
                    // Window y grows downward, pitch grows upward
                    let delta_y = (last_pos.1 - position.y) as f32;
                    self.camera.process_mouse(delta_x, delta_y);
                }
                self.last_mouse_pos = Some((position.x, position.y));
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll_amount = match delta {
                    winit::event::MouseScrollDelta::LineDelta(_, y) => y,
                    winit::event::MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 20.0,
                };
                self.camera.process_scroll(scroll_amount);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key,
                        state,
                        ..
                    },
                ..
            } => {
                if let PhysicalKey::Code(keycode) = physical_key {
                    match state {
                        ElementState::Pressed => {
                            if self.keys_pressed.insert(keycode) {
                                match keycode {
                                    KeyCode::Escape => event_loop.exit(),
                                    KeyCode::Space => {
                                        if let Some(scene) = &mut self.scene {
                                            scene.toggle_wireframe();
                                        }
                                    }
                                    _ => {}
                                }
                            }
                        }
                        ElementState::Released => {
                            self.keys_pressed.remove(&keycode);
                        }
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let delta_time = (now - self.last_frame_time).as_secs_f32();
                self.last_frame_time = now;

                self.move_camera(delta_time);

                if let (Some(ctx), Some(scene)) = (&mut self.ctx, &mut self.scene) {
                    let time = self.start_time.elapsed().as_secs_f32();
                    if let Err(e) = scene.render(ctx, &self.camera, time) {
                        // Surface errors are recoverable; everything else is
                        // only logged
                        if let Some(surface_err) = e.downcast_ref::<wgpu::SurfaceError>() {
                            match surface_err {
                                wgpu::SurfaceError::Lost => {
                                    let size = ctx.size;
                                    ctx.resize(size);
                                    scene.resize(ctx);
                                }
                                wgpu::SurfaceError::OutOfMemory => {
                                    log::error!("Out of memory!");
                                    event_loop.exit();
                                }
                                _ => {
                                    log::error!("Surface error: {:?}", surface_err);
                                }
                            }
                        } else {
                            log::error!("Render error: {:?}", e);
                        }
                    }
                }

                // Request next frame
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Run the event loop with the given scene until the window closes.
pub fn run<S: Scene>(title: &'static str, camera_start: Vec3) -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Starting {title}");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::<S>::new(title, camera_start);
    event_loop.run_app(&mut app)?;

    Ok(())
}
