use std::path::Path;

use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use glium::glutin;
use glutin::event::{ElementState, Event, VirtualKeyCode, WindowEvent};
use glutin::event_loop::{ControlFlow, EventLoop};

use solar_bloom::controls::{self, OrbitControls};
use solar_bloom::solar_system::{self, SolarMotion};
use solar_bloom::{Config, DrawError, FrameDriver, FrameSize, Pipeline};

const WINDOW_SIZE: (u32, u32) = (1280, 720);
const STAR_SEED: u64 = 1;

fn main() {
    simple_logger::init_with_level(log::Level::Info).unwrap();

    // Initialize glium
    let event_loop = EventLoop::new();
    let display = {
        let window_builder = glutin::window::WindowBuilder::new()
            .with_inner_size(glutin::dpi::PhysicalSize::new(WINDOW_SIZE.0, WINDOW_SIZE.1))
            .with_title("Solar system");
        let context_builder = glutin::ContextBuilder::new()
            .with_vsync(true)
            .with_depth_buffer(24);
        glium::Display::new(window_builder, context_builder, &event_loop).unwrap()
    };

    let size: (u32, u32) = display.gl_window().window().inner_size().into();
    let size = FrameSize::from(size);

    let assets = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/assets"));
    let (scene, bodies) = solar_system::build(assets, &mut StdRng::seed_from_u64(STAR_SEED));

    let mut pipeline = Pipeline::create(&display, &Config::default(), &scene, size).unwrap();
    let mut driver = FrameDriver::new(
        scene,
        solar_system::context(size.aspect()),
        SolarMotion::new(bodies),
        size,
    );
    let mut controls = OrbitControls::new(controls::Config::default());

    info!("Entering event loop");

    event_loop.run(move |event, _, control_flow| match event {
        Event::MainEventsCleared => display.gl_window().window().request_redraw(),
        Event::RedrawRequested(_) => {
            let mut target = display.draw();
            let drawn = driver.draw_frame(&mut pipeline, &mut target);
            let finished = target.finish().map_err(DrawError::from);

            if let Err(err) = drawn.and(finished) {
                error!("Frame failed: {}", err);
                *control_flow = ControlFlow::Exit;
            }
        }
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,
            WindowEvent::KeyboardInput { input, .. } => {
                if input.state == ElementState::Pressed
                    && input.virtual_keycode == Some(VirtualKeyCode::P)
                {
                    coarse_prof::write(&mut std::io::stdout()).unwrap();
                    coarse_prof::reset();
                }
            }
            WindowEvent::Resized(new_size) => {
                display.gl_window().resize(new_size);

                if let Err(err) = driver.resize(&mut pipeline, new_size.width, new_size.height) {
                    error!("Resize failed: {}", err);
                    *control_flow = ControlFlow::Exit;
                }
            }
            event => controls.on_event(&event, &mut driver.context_mut().camera),
        },
        Event::LoopDestroyed => {
            coarse_prof::write(&mut std::io::stdout()).unwrap();
        }
        _ => (),
    });
}
