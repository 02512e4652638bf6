use sdl2::keyboard::Keycode;
use softraster::display::{Display, InputEvent, MouseButtonKind, RenderTarget, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use softraster::filters::{Greyscale, Invert, Noise};
use softraster::{Color, CompositeMode, ErrorReport, FpsCounter, Graphics, Rect, RenderConfig, Rng, Surface};
use tracing_subscriber::EnvFilter;

const SCENES: [&str; 6] = ["primitives", "curves", "compositing", "transforms", "quantize", "paint"];

struct Options {
    width: u32,
    height: u32,
    vsync: bool,
    config_path: String,
}

/// Parse command line arguments
fn parse_args() -> Options {
    let args: Vec<String> = std::env::args().collect();
    let mut opts = Options {
        width: DEFAULT_WIDTH,
        height: DEFAULT_HEIGHT,
        vsync: true,
        config_path: "render.json".to_string(),
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--no-vsync" => opts.vsync = false,
            "--resolution" | "-r" => {
                if i + 1 < args.len() {
                    // WxH, e.g. 800x600
                    let parts: Vec<&str> = args[i + 1].split('x').collect();
                    if parts.len() == 2 {
                        if let (Ok(w), Ok(h)) = (parts[0].parse::<u32>(), parts[1].parse::<u32>()) {
                            opts.width = w;
                            opts.height = h;
                        }
                    }
                    i += 1;
                }
            },
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    opts.config_path = args[i + 1].clone();
                    i += 1;
                }
            },
            "--help" => {
                println!("Usage: softraster-demo [OPTIONS]");
                println!();
                println!("Options:");
                println!(
                    "  --resolution WxH, -r WxH  Set resolution (default: {}x{})",
                    DEFAULT_WIDTH, DEFAULT_HEIGHT
                );
                println!("  --config FILE, -c FILE    Render config JSON (default: render.json)");
                println!("  --no-vsync                Disable VSync for uncapped framerate");
                println!("  --help                    Show this help message");
                std::process::exit(0);
            },
            _ => {},
        }
        i += 1;
    }

    opts
}

/// Sprite with a magenta background used as chroma key
fn make_sprite(graphics: &Graphics) -> softraster::Result<Surface> {
    let mut sprite = graphics.surface(64, 64)?;
    sprite.fill(Color::MAGENTA);
    sprite.circle(32, 32, 28, Color::GOLD, true);
    sprite.circle_aa(32, 32, 28, Color::ORANGE, false);
    sprite.triangle(20, 40, 32, 14, 44, 40, Color::CRIMSON, true);
    sprite.rect(0, 0, 64, 64, Color::NAVY, false);
    Ok(sprite)
}

fn draw_primitives(s: &mut Surface, t: f32) {
    let (w, h) = (s.width() as i32, s.height() as i32);
    let (cx, cy) = (w / 4, h / 2);
    for i in 0..24 {
        let a = t * 0.3 + i as f32 * std::f32::consts::TAU / 24.0;
        let (x, y) = ((a.cos() * 100.0) as i32, (a.sin() * 100.0) as i32);
        let color = Color::from_hsv(i as f32 * 15.0, 0.8, 1.0);
        if i % 2 == 0 {
            s.line(cx, cy, cx + x, cy + y, color);
        } else {
            s.line_aa(cx, cy, cx + x, cy + y, color);
        }
    }

    let ex = w * 3 / 4;
    s.rect(ex - 120, 30, 240, 140, Color::rgba(40, 60, 90, 255), true);
    s.rect(ex - 120, 30, 240, 140, Color::SKY_BLUE, false);
    s.circle(ex - 60, 100, 40, Color::rgba(255, 0, 0, 160), true);
    s.circle_aa(ex + 60, 100, 40, Color::LIME, false);
    s.ellipse(ex, 100, 100, 30, Color::YELLOW, false);
    s.ellipse_rect_aa(ex - 100, h - 170, ex + 100, h - 110, Color::CYAN, true);
    s.rotated_ellipse(ex, h - 60, 90, 30, t * 20.0, Color::HOT_PINK);
    s.triangle(40, h - 20, 120, h - 120, 200, h - 30, Color::rgba(0, 200, 100, 180), true);
    s.triangle(40, h - 20, 120, h - 120, 200, h - 30, Color::WHITE, false);
}

fn draw_curves(s: &mut Surface, t: f32) {
    let (w, h) = (s.width() as i32, s.height() as i32);
    let wobble = ((t * 1.5).sin() * 120.0) as i32;
    for (i, y) in [h / 5, h * 2 / 5, h * 3 / 5, h * 4 / 5].into_iter().enumerate() {
        let (x0, x1, x2) = (40, w / 2, w - 40);
        match i {
            0 => s.quad_bezier(x0, y, x1, y - wobble, x2, y, Color::WHITE),
            1 => s.quad_bezier_aa(x0, y, x1, y + wobble, x2, y, Color::LIME),
            2 => s.quad_rational_bezier(x0, y, x1, y - 80, x2, y, 0.5 + (t.sin() + 1.0), Color::GOLD),
            _ => {
                s.cubic_bezier(x0, y, x1 - 100, y - wobble, x1 + 100, y + wobble, x2, y, Color::CYAN);
                s.cubic_bezier_aa(x0, y + 20, x1 - 100, y + 20 + wobble, x1 + 100, y + 20 - wobble, x2, y + 20, Color::ORANGE);
            },
        }
    }
}

fn draw_compositing(s: &mut Surface, sprite: &Surface, t: f32) {
    let (w, h) = (s.width() as i32, s.height() as i32);
    let (cx, cy) = (w / 2, h / 2);
    for (i, color) in [Color::RED, Color::LIME, Color::BLUE].into_iter().enumerate() {
        let a = t + i as f32 * std::f32::consts::TAU / 3.0;
        let (x, y) = (cx + (a.cos() * 60.0) as i32, cy + (a.sin() * 60.0) as i32);
        s.circle(x, y, 90, color.with_a(110), true);
    }
    for i in 0..5 {
        let x = 40 + i * 110;
        let y = h - 100 + ((t * 2.0 + i as f32).sin() * 20.0) as i32;
        s.blit(sprite, x, y);
    }
    // top half of the sprite only
    s.blit_region(sprite, 20, 20, Rect::new(0, 0, 64, 32));
}

fn draw_transforms(graphics: &Graphics, s: &mut Surface, sprite: &Surface, t: f32) -> softraster::Result<()> {
    let (w, h) = (s.width() as i32, s.height() as i32);
    let rotated = graphics.rotate(sprite, t * 45.0)?;
    s.blit(&rotated, w / 4 - rotated.width() as i32 / 2, h / 2 - rotated.height() as i32 / 2);

    let scale = 1.0 + (t.sin() + 1.0);
    let size = (64.0 * scale) as u32;
    let scaled = graphics.resize(sprite, size, size)?;
    s.blit(&scaled, w * 3 / 4 - size as i32 / 2, h / 2 - size as i32 / 2);

    let mut strip = graphics.copy(sprite)?;
    strip.transform(Invert);
    s.blit(&strip, 20, 20);
    let mut grey = graphics.copy(sprite)?;
    grey.transform(Greyscale);
    s.blit(&grey, 100, 20);
    let mut noisy = graphics.copy(sprite)?;
    noisy.transform(Noise::new(t as u64 + 1, 48));
    s.blit(&noisy, 180, 20);
    Ok(())
}

fn draw_quantize(graphics: &Graphics, s: &mut Surface, t: f32) -> softraster::Result<()> {
    let (w, h) = (s.width(), s.height());
    let mut small = graphics.surface(w / 4, h / 4)?;
    let (sw, sh) = (small.width() as i32, small.height() as i32);
    small.transform(|x: i32, y: i32, _: Color| {
        let hue = (x as f32 / sw as f32) * 360.0 + t * 30.0;
        Color::from_hsv(hue % 360.0, 1.0, y as f32 / sh as f32)
    });
    let colors = 2 + ((t * 0.5) as i32 % 15);
    graphics.quantize(&mut small, colors)?;
    let big = graphics.resize(&small, w, h)?;
    s.blit(&big, 0, 0);
    Ok(())
}

fn scene_for_key(key: Keycode) -> Option<usize> {
    match key {
        Keycode::Num1 => Some(0),
        Keycode::Num2 => Some(1),
        Keycode::Num3 => Some(2),
        Keycode::Num4 => Some(3),
        Keycode::Num5 => Some(4),
        Keycode::Num6 => Some(5),
        _ => None,
    }
}

fn reset_paint(s: &mut Surface) {
    let (w, h) = (s.width() as i32, s.height() as i32);
    s.fill(Color::WHITE);
    for i in 0..6 {
        s.circle(w / 2, h / 2, 30 + i * 35, Color::BLACK, false);
    }
    s.line(0, 0, w - 1, h - 1, Color::BLACK);
    s.line(w - 1, 0, 0, h - 1, Color::BLACK);
}

fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let opts = parse_args();
    let (width, height) = (opts.width, opts.height);

    let config = RenderConfig::load(&opts.config_path).unwrap_or_else(|e| {
        tracing::info!(path = %opts.config_path, error = %e, "using default render config");
        RenderConfig::default()
    });
    let mut graphics = Graphics::with_config(config);
    graphics.set_error_hook(|report: &ErrorReport| eprintln!("{report}"));

    let (mut display, texture_creator) = Display::with_options("softraster", width, height, opts.vsync)?;
    let mut target = RenderTarget::with_size(&texture_creator, width, height)?;
    let mut frame = graphics.surface(width, height).map_err(|e| e.to_string())?;
    let mut paint = graphics.surface(width, height).map_err(|e| e.to_string())?;
    reset_paint(&mut paint);
    let mut sprite = make_sprite(&graphics).map_err(|e| e.to_string())?;

    let mut fps_counter = FpsCounter::new(60);
    let mut rng = Rng::new(graphics.ticks() + 1);
    let mut scene = 0usize;

    println!("=== softraster ===");
    println!("Resolution: {}x{}", width, height);
    println!("Controls:");
    println!("  Left/Right - Cycle scenes");
    println!("  1-6        - Jump to scene");
    println!("  C          - Toggle composite mode");
    println!("  K          - Toggle magenta chroma key");
    println!("  S          - Save render config");
    println!("  Click      - Flood fill (paint scene), right click resets");
    println!("  Escape     - Quit");

    'main: loop {
        let fps = fps_counter.tick();
        let t = graphics.ticks() as f32 / 1000.0;

        for event in display.poll_events() {
            match event {
                InputEvent::Quit | InputEvent::KeyDown(Keycode::Escape) => break 'main,
                InputEvent::KeyDown(Keycode::Left) => scene = (scene + SCENES.len() - 1) % SCENES.len(),
                InputEvent::KeyDown(Keycode::Right) => scene = (scene + 1) % SCENES.len(),
                InputEvent::KeyDown(Keycode::C) => {
                    let mut config = graphics.config();
                    config.composite = match config.composite {
                        CompositeMode::SourceOver => CompositeMode::Linear,
                        CompositeMode::Linear => CompositeMode::SourceOver,
                    };
                    graphics.set_config(config);
                    println!("Composite mode: {:?}", config.composite);
                },
                InputEvent::KeyDown(Keycode::K) => {
                    let config = graphics.config();
                    let key = if config.chroma_key.is_some() { None } else { Some(Color::MAGENTA) };
                    graphics.set_config(config.with_chroma_key(key));
                    println!("Chroma key: {:?}", key);
                },
                InputEvent::KeyDown(Keycode::S) => match graphics.config().save(&opts.config_path) {
                    Ok(()) => println!("Render config saved to {}", opts.config_path),
                    Err(e) => eprintln!("Failed to save: {}", e),
                },
                InputEvent::MouseDown { x, y, button } if scene == 5 => match button {
                    MouseButtonKind::Left => {
                        let color = rng.color();
                        paint.flood_fill(x, y, color);
                    },
                    _ => reset_paint(&mut paint),
                },
                InputEvent::KeyDown(key) => {
                    if let Some(n) = scene_for_key(key) {
                        scene = n;
                    }
                },
                InputEvent::MouseDown { .. } => {},
            }
        }

        frame.set_config(graphics.config());
        sprite.set_config(graphics.config());
        frame.fill(Color::rgb(16, 16, 24));
        let result = match scene {
            0 => {
                draw_primitives(&mut frame, t);
                Ok(())
            },
            1 => {
                draw_curves(&mut frame, t);
                Ok(())
            },
            2 => {
                draw_compositing(&mut frame, &sprite, t);
                Ok(())
            },
            3 => draw_transforms(&graphics, &mut frame, &sprite, t),
            4 => draw_quantize(&graphics, &mut frame, t),
            _ => {
                frame.blit(&paint, 0, 0);
                Ok(())
            },
        };
        // already reported through the hook
        if result.is_err() {
            scene = 0;
        }

        display.set_title(&format!("softraster - {} - {:.0} fps", SCENES[scene], fps))?;
        display.present(&mut target, &frame)?;
    }

    Ok(())
}
