use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use docwatch_core::{config::Config, enrich::MetadataEnricher, watcher::DocumentWatcher};
use docwatch_discord::DiscordNotifier;
use docwatch_render::ChromePageSource;

#[tokio::main]
async fn main() -> Result<(), docwatch_core::Error> {
    docwatch_core::logging::init("docwatch")?;

    let cfg = Arc::new(Config::load()?);

    let notifier = Arc::new(DiscordNotifier::new(
        cfg.bot_token.clone(),
        cfg.notify_timeout,
    )?);
    // Readiness gate: an invalid credential is fatal at startup, never later.
    let bot_name = notifier.verify().await?;
    info!(bot = %bot_name, "credential verified");
    info!(
        page = %cfg.page_url,
        section = %cfg.section,
        interval_secs = cfg.check_interval.as_secs(),
        "watching for document changes"
    );
    if cfg.channel_id.is_none() || cfg.role_id.is_none() {
        info!("CHANNEL_ID or ROLE_ID unset, running without announcements");
    }

    let pages = Arc::new(ChromePageSource::new(
        cfg.chrome_path.clone(),
        cfg.fetch_timeout,
    ));
    let metadata = Arc::new(MetadataEnricher::new(cfg.head_timeout)?);

    let watcher = DocumentWatcher::new(cfg, pages, metadata, notifier);

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for shutdown signal");
            return;
        }
        info!("shutdown signal received");
        signal_cancel.cancel();
    });

    watcher.run(cancel).await;

    Ok(())
}
