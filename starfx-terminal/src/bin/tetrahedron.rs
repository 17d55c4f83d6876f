/// Tetrahedron Demo - rotating wireframe
///
/// Controls:
///   - 1-4: Pixel scale
///   - Q / ESC: Quit
use clap::Parser;
use log::info;
use starfx_core::TetrahedronEffect;
use starfx_terminal::{cli::Cli, AppError, TerminalApp};

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = cli.bootstrap()?;

    let effect = TetrahedronEffect::new(config.display.viewport(), &config.wireframe);

    let mut app = TerminalApp::new(effect, &config);
    app.run()?;

    info!("tetrahedron exited cleanly");
    Ok(())
}
