//! Interactive Phong viewer.
//!
//! - Left drag: orbit the camera around its pivot
//! - Mouse wheel: zoom
//! - C / D: toggle backface culling / depth test
//! - 1-9: toggle the n-th light
//! - Q/Escape: exit
//!
//! The window has no panel region, so orbit input is never disabled by hover.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use phong_viewer::{
    gpu::GpuContext,
    mesh::MeshData,
    orbit::{OrbitConfig, OrbitController},
    panel::ParamPanel,
    scene::{MeshKind, SceneState},
    Renderer,
};
use winit::{
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, Event, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowBuilder},
};

/// Wheel units per line notch, so one notch moves the eye by one unit.
const LINE_SCROLL_UNITS: f32 = 100.0;

#[derive(Parser, Debug)]
#[command(name = "viewer")]
#[command(about = "Phong-lit demo scene with an orbit camera")]
struct Args {
    /// Initial window width in pixels
    #[arg(long, default_value = "1024")]
    width: u32,

    /// Initial window height in pixels
    #[arg(long, default_value = "768")]
    height: u32,

    /// Vertical field of view in degrees
    #[arg(long)]
    fovy: Option<f32>,

    /// Near clipping plane distance
    #[arg(long)]
    near: Option<f32>,

    /// Far clipping plane distance
    #[arg(long)]
    far: Option<f32>,

    /// Start with backface culling enabled
    #[arg(long)]
    backface_culling: bool,

    /// Start with depth testing disabled
    #[arg(long)]
    no_depth_test: bool,

    /// Closest zoom distance from the pivot
    #[arg(long, default_value = "1.0")]
    min_radius: f32,

    /// Farthest zoom distance from the pivot
    #[arg(long, default_value = "30.0")]
    max_radius: f32,
}

struct ApplicationState {
    scene: SceneState,
    controller: OrbitController,
    panel: ParamPanel,
    cursor: PhysicalPosition<f64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let scene = build_scene(&args)?;
    let orbit_config = OrbitConfig {
        min_radius: args.min_radius,
        max_radius: args.max_radius,
        ..OrbitConfig::default()
    };
    orbit_config.validate()?;

    let event_loop = EventLoop::new()?;
    let window = Arc::new(create_window(&event_loop, args.width, args.height)?);

    let (gpu_context, surface) = pollster::block_on(GpuContext::for_window(Arc::clone(&window)))?;
    let size = window.inner_size();
    let mut renderer = Renderer::new(&gpu_context, surface, size.width, size.height)?;
    renderer.register_mesh(&gpu_context, MeshKind::Cube, &MeshData::unit_box());

    let panel = ParamPanel::for_scene(&scene);
    let controller = OrbitController::new(orbit_config, &scene.camera);
    let mut app_state = ApplicationState {
        scene,
        controller,
        panel,
        cursor: PhysicalPosition::new(0.0, 0.0),
    };
    apply_window_size(&mut app_state, size);

    log::info!(
        "Scene ready: {} lights, eye at {:?}",
        app_state.scene.lights.len(),
        app_state.scene.camera.eye
    );

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Wait);

        match event {
            Event::AboutToWait => window.request_redraw(),
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => elwt.exit(),
                WindowEvent::Resized(physical_size) => {
                    renderer.resize(&gpu_context, physical_size.width, physical_size.height);
                    apply_window_size(&mut app_state, physical_size);
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    handle_mouse_input(&mut app_state, state, button);
                }
                WindowEvent::CursorMoved { position, .. } => {
                    handle_cursor_moved(&mut app_state, position);
                }
                WindowEvent::MouseWheel { delta, .. } => {
                    handle_mouse_wheel(&mut app_state, delta);
                }
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            physical_key: PhysicalKey::Code(code),
                            state: ElementState::Pressed,
                            repeat: false,
                            ..
                        },
                    ..
                } => handle_key(&mut app_state, code, elwt),
                WindowEvent::RedrawRequested => {
                    handle_redraw(&app_state, &mut renderer, &gpu_context, &window, elwt);
                }
                _ => {}
            },
            _ => {}
        }
    })?;

    Ok(())
}

fn build_scene(args: &Args) -> Result<SceneState> {
    let mut scene = SceneState::with_defaults();
    scene.flags.backface_culling = args.backface_culling;
    scene.flags.depth_test = !args.no_depth_test;

    let camera = &mut scene.camera;
    if let Some(fovy) = args.fovy {
        camera.fovy = fovy;
    }
    if let Some(near) = args.near {
        camera.near = near;
    }
    if let Some(far) = args.far {
        camera.far = far;
    }
    camera.validate()?;
    camera.refresh_projection();
    Ok(scene)
}

fn create_window(event_loop: &EventLoop<()>, width: u32, height: u32) -> Result<Window> {
    let window = WindowBuilder::new()
        .with_title("Phong Viewer")
        .with_inner_size(PhysicalSize::new(width, height))
        .build(event_loop)?;
    Ok(window)
}

fn apply_window_size(state: &mut ApplicationState, size: PhysicalSize<u32>) {
    if size.width == 0 || size.height == 0 {
        return;
    }
    state.controller.set_viewport(size.width, size.height);
    let camera = &mut state.scene.camera;
    camera.update_projection(size.width as f32 / size.height as f32);
    camera.update_view();
}

fn handle_mouse_input(state: &mut ApplicationState, element_state: ElementState, button: MouseButton) {
    if button != MouseButton::Left {
        return;
    }
    match element_state {
        ElementState::Pressed => {
            let (x, y) = (state.cursor.x as f32, state.cursor.y as f32);
            if let Err(e) = state.controller.begin_drag(&state.scene.camera, x, y) {
                log::warn!("Ignoring drag: {e}");
            }
        }
        ElementState::Released => state.controller.end_drag(),
    }
}

fn handle_cursor_moved(state: &mut ApplicationState, position: PhysicalPosition<f64>) {
    state.cursor = position;
    state
        .controller
        .update_drag(&mut state.scene.camera, position.x as f32, position.y as f32);
}

fn handle_mouse_wheel(state: &mut ApplicationState, delta: MouseScrollDelta) {
    // Positive wheel deltas move away from the pivot; winit reports scrolling up as positive.
    let scroll_delta = match delta {
        MouseScrollDelta::LineDelta(_, y) => -y * LINE_SCROLL_UNITS,
        MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
    };
    if let Err(e) = state.controller.zoom(&mut state.scene.camera, scroll_delta) {
        log::warn!("Ignoring zoom: {e}");
    }
}

fn handle_key(state: &mut ApplicationState, code: KeyCode, elwt: &EventLoopWindowTarget<()>) {
    let path = match code {
        KeyCode::KeyQ | KeyCode::Escape => {
            elwt.exit();
            return;
        }
        KeyCode::KeyC => "Render/backfaceCulling".to_string(),
        KeyCode::KeyD => "Render/depthTest".to_string(),
        _ => {
            let Some(index) = digit_index(code) else {
                return;
            };
            let Some(name) = state.scene.lights.names().nth(index) else {
                return;
            };
            format!("Lights/{name}/active")
        }
    };

    match state.panel.toggle(&mut state.scene, &path) {
        Ok(value) => log::info!("{path} = {value}"),
        Err(e) => log::warn!("{e}"),
    }
}

fn digit_index(code: KeyCode) -> Option<usize> {
    const DIGITS: [KeyCode; 9] = [
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
        KeyCode::Digit5,
        KeyCode::Digit6,
        KeyCode::Digit7,
        KeyCode::Digit8,
        KeyCode::Digit9,
    ];
    DIGITS.iter().position(|&digit| digit == code)
}

fn handle_redraw(
    state: &ApplicationState,
    renderer: &mut Renderer,
    gpu_context: &GpuContext,
    window: &Window,
    elwt: &EventLoopWindowTarget<()>,
) {
    match renderer.render(gpu_context, &state.scene) {
        Ok(_) => {}
        Err(wgpu::SurfaceError::Lost) => {
            let size = window.inner_size();
            renderer.resize(gpu_context, size.width, size.height);
        }
        Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
        Err(e) => log::error!("Render error: {e:?}"),
    }
}
