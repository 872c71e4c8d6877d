mod app;
mod commands;
mod config;
mod effects;
mod layout;
mod logging;
mod render;

fn main() -> anyhow::Result<()> {
    app::run()
}
