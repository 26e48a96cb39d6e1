//! Marquee headless demo driver.
//!
//! Runs the presentation controller against the software renderer with a
//! scripted controller, a background worker and a fake audio player, and
//! writes PNG snapshots of selected frames.
//!
//! Usage: `marquee-app [CONFIG] [THEME]`. The config falls back to
//! `MARQUEE_CONFIG`, then `./marquee.toml`, then built-in defaults. The theme
//! falls back to `MARQUEE_THEME`. Snapshots go to `MARQUEE_SNAPSHOT_DIR`
//! (default `snapshots`).

mod demo;
mod script;
mod worker;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Result;

use marquee_backend_soft::SoftwareRenderer;
use marquee_core::Window;
use marquee_core::backend::{Color, Renderer};
use marquee_core::config::{MarqueeConfig, keys};
use marquee_core::input::{InputConfig, StandardMapping};
use marquee_core::overlay::DimScreenSaver;
use marquee_core::services::SharedAudioState;
use marquee_core::theme::ScreenTheme;

use demo::SystemList;
use script::{Device, Script};

const FRAME_MS: u32 = 16;
const FRAMES: u32 = 320;
const SNAPSHOT_FRAMES: [u32; 4] = [15, 55, 180, 300];
const DEMO_IDLE_MS: i64 = 2000;
const LOADING_STEPS: u32 = 4;

const SYSTEMS: [&str; 5] = [
    "Super Nintendo",
    "Mega Drive",
    "Game Boy Advance",
    "PlayStation",
    "Neo Geo",
];

fn resolve_config() -> Result<MarqueeConfig> {
    let explicit = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("MARQUEE_CONFIG").ok())
        .map(PathBuf::from);
    if let Some(path) = explicit {
        return Ok(MarqueeConfig::load(&path)?);
    }
    let local = Path::new("marquee.toml");
    if local.exists() {
        return Ok(MarqueeConfig::load(local)?);
    }
    let mut config = MarqueeConfig::default();
    // Short idle span so the screensaver shows up within the run.
    config.settings.set_int(keys::SCREENSAVER_TIME, DEMO_IDLE_MS);
    log::info!("No configuration file, using defaults");
    Ok(config)
}

fn resolve_theme() -> Result<Option<ScreenTheme>> {
    let path = std::env::args()
        .nth(2)
        .or_else(|| std::env::var("MARQUEE_THEME").ok());
    match path {
        Some(p) => {
            let theme = ScreenTheme::load(Path::new(&p))?;
            log::info!("Loaded theme from {p}");
            Ok(Some(theme))
        },
        None => Ok(None),
    }
}

fn save_png(path: &Path, width: u32, height: u32, rgba: &[u8]) -> Result<()> {
    let file = fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(rgba)?;
    Ok(())
}

fn snapshot(renderer: &SoftwareRenderer, dir: &Path, frame: u32) -> Result<()> {
    let (w, h) = renderer.dimensions();
    let path = dir.join(format!("frame_{frame:04}.png"));
    save_png(&path, w, h, renderer.pixels())?;
    log::info!("Snapshot written to {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = resolve_config()?;
    let theme = resolve_theme()?;
    let (width, height) = (config.window.width, config.window.height);
    log::info!("Starting {} ({width}x{height})", config.window.title);

    let audio = SharedAudioState::new(50);
    let behavior = config.settings.screensaver_behavior();
    let mut window = Window::new(config)
        .with_audio(Box::new(audio.clone()))
        .with_screensaver(Box::new(DimScreenSaver::for_behavior(behavior)));

    let mut renderer = SoftwareRenderer::new(width, height);
    window.init(&mut renderer)?;

    for step in 0..=LOADING_STEPS {
        let percent = step as f32 / LOADING_STEPS as f32;
        window.render_loading_screen(&mut renderer, "Loading systems...", Some(percent), 255)?;
    }
    window.end_render_loading_screen();

    if let Some(theme) = theme {
        window.on_theme_changed(theme);
    }
    window.push(Box::new(SystemList::new(&SYSTEMS, window.handle())));

    let snapshot_dir = PathBuf::from(
        std::env::var("MARQUEE_SNAPSHOT_DIR").unwrap_or_else(|_| "snapshots".to_string()),
    );
    fs::create_dir_all(&snapshot_dir)?;

    let worker = worker::spawn(window.handle(), audio, worker::WorkerPlan::default())?;

    let pad = StandardMapping::gamepad(0);
    let keyboard = StandardMapping::keyboard();
    let mut script = Script::new(script::demo_script());
    let frame_budget = Duration::from_millis(FRAME_MS as u64);

    for frame in 0..FRAMES {
        let started = Instant::now();

        for scripted in script.due(frame) {
            let mapping: &dyn InputConfig = match scripted.device {
                Device::Pad => &pad,
                Device::Keyboard => &keyboard,
            };
            let disposition = window.input(mapping, &scripted.event);
            log::debug!("frame {frame}: {:?} -> {disposition:?}", scripted.event);
        }

        window.update(FRAME_MS);
        renderer.clear(Color::BLACK)?;
        window.render(&mut renderer)?;
        renderer.swap_buffers()?;

        if SNAPSHOT_FRAMES.contains(&frame) {
            log::info!("frame {frame}: {:?}", window.power_state());
            snapshot(&renderer, &snapshot_dir, frame)?;
        }

        if let Some(rest) = frame_budget.checked_sub(started.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    if !script.is_finished() {
        log::warn!("Input script had events past the last frame");
    }
    if worker.join().is_err() {
        log::error!("Worker thread panicked");
    }

    window.deinit(&mut renderer)?;
    log::info!("Presented {} frames", renderer.frames_presented());
    Ok(())
}
