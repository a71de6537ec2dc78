mod app;
mod paths;
mod util;

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON file holding the traversal paths to render.
    paths_file: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let paths = paths::load_paths(&args.paths_file)?;
    log::info!(
        "loaded {} path(s) from {}",
        paths.len(),
        args.paths_file.display()
    );

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1200.0, 780.0]),
        ..Default::default()
    };

    eframe::run_native(
        "pathviz",
        options,
        Box::new(move |cc| Ok(Box::new(app::PathVizApp::new(cc, &paths)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(())
}
