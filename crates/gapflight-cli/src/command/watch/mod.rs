use std::path::PathBuf;

use crate::{
    command::{ConfigArg, train},
    tui::{RenderMode, Tui},
};

use self::app::WatchApp;

mod app;

const RENDER_FPS: f64 = 30.0;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct WatchArg {
    #[clap(flatten)]
    config: ConfigArg,
    /// Resume from a saved generation directory (e.g. checkpoint/gravity/20)
    #[arg(long)]
    checkpoint: Option<PathBuf>,
}

pub(crate) fn run(arg: &WatchArg) -> anyhow::Result<()> {
    let WatchArg { config, checkpoint } = arg;

    let config = config.load()?;
    let tick_rate = f64::from(config.fps);
    let trainer = train::start(config, checkpoint.as_deref())?;

    let mut app = WatchApp::new(trainer);
    Tui::new(tick_rate, RenderMode::fixed_rate(RENDER_FPS)).run(&mut app)?;
    app.finish()
}
