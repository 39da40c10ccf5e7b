use std::sync::mpsc::TryRecvError;

use clap::Parser;
use figure_core::{AnimationClock, Figure, FrameRenderer, ProjectionConfig, SceneState};
use winit::{
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

mod cli;
mod gpu;
mod keys;
mod texture;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = cli::Args::parse();

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    let window = WindowBuilder::new()
        .with_title("Cube figure")
        .with_inner_size(winit::dpi::LogicalSize::new(args.width, args.height))
        .build(&event_loop)?;

    // Without a working pipeline there is nothing to draw; fail before the loop.
    let mut gpu = match pollster::block_on(gpu::GpuState::new(&window)) {
        Ok(gpu) => gpu,
        Err(e) => {
            log::error!("[gpu] startup failed: {e:#}");
            return Err(e);
        }
    };

    let mut state = SceneState::default();
    let size = window.inner_size();
    state.on_resize(size.width, size.height);

    let figure = Figure::standard();
    let renderer = FrameRenderer::new(ProjectionConfig {
        fov_y_degrees: args.fov,
        ..ProjectionConfig::default()
    });
    let clock = AnimationClock::start();
    let textures = texture::spawn_loader(args.texture);
    let mut texture_pending = true;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            event: WindowEvent::Resized(size),
            ..
        } => {
            gpu.resize(size);
            state.on_resize(size.width, size.height);
        }
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => {
            log::info!("[app] close requested");
            elwt.exit();
        }
        Event::WindowEvent {
            event:
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            logical_key,
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                },
            ..
        } => {
            if let Some(name) = keys::key_name(&logical_key) {
                state.on_key(name);
            }
        }
        Event::AboutToWait => {
            if texture_pending {
                match textures.try_recv() {
                    Ok(Ok(image)) => {
                        match gpu.set_texture(&image) {
                            Ok(()) => state.on_texture_ready(true),
                            Err(e) => {
                                log::warn!("[texture] {e}; textured parts keep the solid color")
                            }
                        }
                        texture_pending = false;
                    }
                    Ok(Err(e)) => {
                        log::warn!("[texture] {e}; textured parts keep the solid color");
                        texture_pending = false;
                    }
                    Err(TryRecvError::Disconnected) => {
                        log::warn!("[texture] loader exited without a result");
                        texture_pending = false;
                    }
                    Err(TryRecvError::Empty) => {}
                }
            }

            renderer.tick(&mut state, &figure, clock.elapsed_seconds(), &mut gpu);
            match gpu.submit() {
                Ok(()) => gpu.window().request_redraw(),
                Err(wgpu::SurfaceError::Lost) => gpu.resize(gpu.window().inner_size()),
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("[gpu] out of memory");
                    elwt.exit();
                }
                Err(e) => log::warn!("[gpu] frame dropped: {e}"),
            }
        }
        _ => {}
    })?;
    Ok(())
}
