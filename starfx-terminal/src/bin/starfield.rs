/// Starfield Demo - flying through a parallax star field
///
/// Controls:
///   - Left / Right: Pan
///   - Up / Down: Speed (hold to accelerate)
///   - Enter / Space: Invert colors
///   - 1-4: Pixel scale
///   - Q / ESC: Quit
use clap::Parser;
use log::info;
use starfx_core::StarfieldEffect;
use starfx_terminal::{cli::Cli, AppError, TerminalApp};

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = cli.bootstrap()?;

    let effect = StarfieldEffect::from_params(
        config.display.viewport(),
        config.starfield.clone(),
        config.debug.seed,
    );

    let mut app = TerminalApp::new(effect, &config);
    app.run()?;

    info!("starfield exited cleanly");
    Ok(())
}
