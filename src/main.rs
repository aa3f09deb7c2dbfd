// fb-present - Main Entry Point
//
// Demonstrates the quad presentation backend with an animated test pattern.

use fb_present::config::{VideoConfig, CONFIG_FILE};
use fb_present::window::{run_window, LOGICAL_HEIGHT, LOGICAL_WIDTH};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fb_present=info")),
        )
        .init();

    println!("fb-present v{}", env!("CARGO_PKG_VERSION"));
    println!("==================");
    println!();

    // Load or create video configuration
    let config = VideoConfig::load_or_default(CONFIG_FILE);
    println!("Video configuration loaded from '{}'", CONFIG_FILE);
    println!("  Pixel format: {:?}", config.pixel_format);
    println!("  Logical size: {}x{}", LOGICAL_WIDTH, LOGICAL_HEIGHT);
    println!("  Scale: {}x", config.scale);
    println!("  VSync: {}", config.vsync);
    println!();

    println!("Controls");
    println!("--------");
    println!("  F       toggle linear filtering");
    println!("  A       toggle aspect ratio lock");
    println!("  I       toggle integer scaling");
    println!("  F9      save screenshot");
    println!("  Escape  quit");
    println!();

    let final_config = run_window(config)?;

    // Keep the toggles for the next run
    if let Err(e) = final_config.save(CONFIG_FILE) {
        eprintln!("Failed to save configuration: {}", e);
    }

    println!("Presentation window closed.");
    Ok(())
}
