mod demos;
mod display;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{info, warn};
use paladin::config::{parse_resolution, Settings};
use paladin::util::FpsCounter;
use paladin::{Palette, RasterContext};
use sdl2::keyboard::Keycode;

use demos::{Demo, Mandelbrot, Shapes};
use display::{Display, InputEvent, RenderTarget};

const DEFAULT_SETTINGS_PATH: &str = "paladin.json";

#[derive(Parser, Debug)]
#[command(name = "paladin", version, about = "Palette-indexed software rasterizer demos")]
struct Cli {
    /// Settings file (JSON); command line flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Canvas width in pixels
    #[arg(short = 'W', long)]
    width: Option<u32>,

    /// Canvas height in pixels
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Canvas resolution as WIDTHxHEIGHT (e.g. 320x160)
    #[arg(short, long, value_parser = parse_resolution)]
    resolution: Option<(u32, u32)>,

    /// Window pixels per canvas pixel
    #[arg(short, long)]
    scale: Option<u32>,

    /// Disable VSync for uncapped framerate
    #[arg(long)]
    no_vsync: bool,

    /// Palette image whose pixels become the palette entries
    #[arg(short, long)]
    palette: Option<PathBuf>,
}

impl Cli {
    /// Layer command line values over `settings`
    fn apply(&self, settings: &mut Settings) {
        if let Some((w, h)) = self.resolution {
            settings.width = w;
            settings.height = h;
        }
        if let Some(w) = self.width {
            settings.width = w;
        }
        if let Some(h) = self.height {
            settings.height = h;
        }
        if let Some(scale) = self.scale {
            settings.scale = scale;
        }
        if self.no_vsync {
            settings.vsync = false;
        }
        if let Some(palette) = &self.palette {
            settings.palette = Some(palette.clone());
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let settings_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH));
    let mut settings = if cli.config.is_some() || settings_path.exists() {
        Settings::load(&settings_path)
            .with_context(|| format!("loading settings from {}", settings_path.display()))?
    } else {
        Settings::default()
    };
    cli.apply(&mut settings);

    let palette = match &settings.palette {
        Some(path) => Palette::load(path).context("loading palette")?,
        None => Palette::pico8(),
    };

    let mut ctx = RasterContext::new(settings.width, settings.height, palette)
        .context("creating raster context")?;

    let sprite = match &settings.sprite {
        Some(path) => match ctx.load_image(path) {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("sprite disabled: {}", e);
                None
            },
        },
        None => None,
    };

    let (window_w, window_h) = settings.window_size();
    let (mut display, texture_creator) =
        Display::with_options("paladin", window_w, window_h, settings.vsync)
            .map_err(|e| anyhow!(e))
            .context("opening window")?;
    let mut target = RenderTarget::with_size(&texture_creator, settings.width, settings.height)
        .map_err(|e| anyhow!(e))
        .context("creating render target")?;

    let mut demos: Vec<Box<dyn Demo>> = vec![
        Box::new(Shapes::new(settings.width, settings.height, sprite)), // 1
        Box::new(Mandelbrot::new()),                                    // 2
    ];
    let mut current = settings
        .demo
        .as_deref()
        .and_then(|name| demos.iter().position(|d| d.name() == name))
        .unwrap_or(0);

    // FPS counter with 60 sample rolling average
    let mut fps_counter = FpsCounter::new(60);
    let mut show_fps = false;

    println!("=== paladin ===");
    println!(
        "Canvas: {}x{} ({} colors), window {}x{}",
        settings.width,
        settings.height,
        ctx.palette().size(),
        window_w,
        window_h
    );
    if settings.vsync {
        println!("VSync: ON (60fps locked). Use --no-vsync for uncapped.");
    } else {
        println!("VSync: OFF (uncapped framerate)");
    }
    println!("Use --help for command line options.");
    println!("Controls:");
    println!("  Left/Right - Cycle through demos");
    println!("  1          - Shapes");
    println!("  2          - Mandelbrot");
    println!("  F          - Toggle FPS in title bar");
    println!("  S          - Save settings to {}", settings_path.display());
    println!("  Escape     - Quit");

    'main: loop {
        let (dt, avg_fps) = fps_counter.tick();

        for event in display.poll_events() {
            match event {
                InputEvent::Quit => break 'main,
                InputEvent::KeyDown(key) => match key {
                    Keycode::Escape => break 'main,
                    Keycode::Num1 => current = 0,
                    Keycode::Num2 => current = 1,
                    Keycode::Left => current = (current + demos.len() - 1) % demos.len(),
                    Keycode::Right => current = (current + 1) % demos.len(),
                    Keycode::F => {
                        show_fps = !show_fps;
                        if !show_fps {
                            display.set_title("paladin");
                        }
                    },
                    Keycode::S => {
                        settings.demo = Some(demos[current].name().to_string());
                        match settings.save(&settings_path) {
                            Ok(()) => println!("Settings saved to {}", settings_path.display()),
                            Err(e) => eprintln!("Failed to save: {}", e),
                        }
                    },
                    _ => {},
                },
            }
        }

        let demo = &mut demos[current];
        demo.update(dt);
        demo.render(&mut ctx).context("rendering demo")?;

        if show_fps {
            let title = format!(
                "paladin - {} - {} fps, {:.1}ms",
                demo.name(),
                avg_fps as u32,
                fps_counter.avg_frame_time_ms()
            );
            display.set_title(&title);
        }

        display
            .present(&mut target, &ctx.frame())
            .map_err(|e| anyhow!(e))
            .context("presenting frame")?;
    }

    info!("shutting down");
    ctx.shutdown();
    Ok(())
}
