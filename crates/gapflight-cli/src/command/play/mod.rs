use crate::{
    command::ConfigArg,
    tui::{RenderMode, Tui},
};

use self::app::PlayApp;

mod app;
mod input;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    config: ConfigArg,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let config = arg.config.load()?;

    let mut app = PlayApp::new(config.mode, config.course_params());
    Tui::new(f64::from(config.fps), RenderMode::AfterChange).run(&mut app)?;

    eprintln!(
        "High score: {} ({} attempts)",
        app.high_score(),
        app.attempts()
    );
    Ok(())
}
