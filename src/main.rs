use anyhow::Context;
use ideas_app::App;
use ideas_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load ideas settings")?;
    ideas_telemetry::init(&settings.telemetry)?;

    tracing::info!(env = ?settings.environment, "ideas-app bootstrap starting");

    let app = App::start(settings).await?;

    for idea in app.controller().ideas().await? {
        tracing::info!(id = ?idea.id, title = idea.title_str(), "idea");
    }

    tracing::info!("ideas-app bootstrap complete, waiting for ctrl-c");
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    app.shutdown().await?;
    tracing::info!("ideas-app stopped");
    Ok(())
}
