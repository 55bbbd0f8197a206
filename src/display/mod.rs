//! SDL2 window and texture presentation
//!
//! Frames arrive as palette indices and are expanded to RGBA8888 texels
//! on the CPU, then uploaded to a streaming texture stretched over the
//! window.

use log::warn;
use paladin::present::{expand_rgba8888, FrameView};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::EventPump;

pub struct Display {
    canvas: Canvas<Window>,
    event_pump: EventPump,
    width: u32,
    height: u32,
}

/// Streaming texture at canvas resolution plus its texel scratch buffer
pub struct RenderTarget<'a> {
    texture: Texture<'a>,
    texels: Vec<u8>,
    width: u32,
    height: u32,
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Quit,
    KeyDown(Keycode),
}

impl Display {
    /// Open a `width` x `height` window
    /// vsync=true: locked to monitor refresh (typically 60fps)
    /// vsync=false: uncapped framerate for performance testing
    pub fn with_options(
        title: &str,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<(Self, TextureCreator<WindowContext>), String> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;

        let mut canvas_builder = window.into_canvas().accelerated();
        if vsync {
            canvas_builder = canvas_builder.present_vsync();
        }
        let canvas = canvas_builder.build().map_err(|e| e.to_string())?;

        let texture_creator = canvas.texture_creator();
        let event_pump = sdl_context.event_pump()?;

        Ok((
            Self {
                canvas,
                event_pump,
                width,
                height,
            },
            texture_creator,
        ))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn set_title(&mut self, title: &str) {
        if let Err(e) = self.canvas.window_mut().set_title(title) {
            warn!("failed to set window title: {}", e);
        }
    }

    /// Expand `frame` through its palette and show it
    pub fn present(&mut self, target: &mut RenderTarget, frame: &FrameView<'_>) -> Result<(), String> {
        if frame.width() != target.width || frame.height() != target.height {
            return Err(format!(
                "frame is {}x{}, render target is {}x{}",
                frame.width(),
                frame.height(),
                target.width,
                target.height
            ));
        }

        expand_rgba8888(frame, &mut target.texels);
        target
            .texture
            .update(None, &target.texels, frame.pitch())
            .map_err(|e| e.to_string())?;

        self.canvas.copy(&target.texture, None, None)?;
        self.canvas.present();
        Ok(())
    }

    pub fn poll_events(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();

        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => events.push(InputEvent::Quit),
                Event::KeyDown {
                    keycode: Some(k), ..
                } => events.push(InputEvent::KeyDown(k)),
                _ => {},
            }
        }

        events
    }
}

impl<'a> RenderTarget<'a> {
    /// Streaming RGBA8888 texture at canvas resolution
    pub fn with_size(
        texture_creator: &'a TextureCreator<WindowContext>,
        width: u32,
        height: u32,
    ) -> Result<Self, String> {
        let texture = texture_creator
            .create_texture_streaming(PixelFormatEnum::RGBA8888, width, height)
            .map_err(|e| e.to_string())?;
        Ok(Self {
            texture,
            texels: Vec::with_capacity((width * height * 4) as usize),
            width,
            height,
        })
    }
}
