use image::RgbImage;
use pixels::{Pixels, SurfaceTexture};
use tracing::{error, info};
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::error::Result;

/// Copy an RGB image into an RGBA frame buffer of the same size.
pub fn blit(img: &RgbImage, frame: &mut [u8]) {
    for (px, out) in img.pixels().zip(frame.chunks_exact_mut(4)) {
        out[0] = px[0];
        out[1] = px[1];
        out[2] = px[2];
        out[3] = 0xff;
    }
}

/// Show `img` in a window until it is closed or Escape is pressed.
/// Does not return once the event loop starts.
pub fn show(img: RgbImage, title: &str) -> Result<()> {
    let (width, height) = img.dimensions();
    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title(title)
        .with_inner_size(LogicalSize::new(width as f64, height as f64))
        .build(&event_loop)?;

    let size = window.inner_size();
    let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
    let mut pixels = Pixels::new(width, height, surface_texture)?;
    blit(&img, pixels.frame_mut());
    info!(width, height, "figure window opened");

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            virtual_keycode: Some(VirtualKeyCode::Escape),
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                } => *control_flow = ControlFlow::Exit,
                WindowEvent::Resized(new_size) => {
                    let (w, h) = (new_size.width.max(1), new_size.height.max(1));
                    if let Err(e) = pixels.resize_surface(w, h) {
                        error!("resize surface failed: {}", e);
                    }
                    window.request_redraw();
                }
                _ => {}
            },
            Event::RedrawRequested(_) => {
                if let Err(e) = pixels.render() {
                    error!("render failed: {}", e);
                    *control_flow = ControlFlow::Exit;
                }
            }
            _ => {}
        }
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_blit_rgba() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([1, 2, 3]));
        img.put_pixel(1, 0, Rgb([4, 5, 6]));
        let mut frame = vec![0u8; 8];
        blit(&img, &mut frame);
        assert_eq!(frame, vec![1, 2, 3, 0xff, 4, 5, 6, 0xff]);
    }
}
