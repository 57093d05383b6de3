use clap::Parser;
use orderdesk::{Cli, Dashboard, Toaster, logger, tui};
use orderdesk_client::{FeedHandle, OrdersApi};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (.env, 日志)
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logger::init_logger(&cli.log_level, cli.log_json, Some(cli.log_dir.as_path()))?;

    // 2. 加载配置
    let config = cli.client_config();
    tracing::info!(
        api_url = %config.api_url,
        ws_url = %config.ws_url,
        "OrderDesk starting"
    );

    // 3. 数据层与实时通道
    let api: Arc<dyn OrdersApi> = Arc::new(config.build_http_client()?);
    let dashboard = Dashboard::new(api, Toaster::new());
    let (feed, events) = FeedHandle::spawn(config.feed_connector(), cli.reconnect_policy());

    let pump = tokio::spawn({
        let dashboard = dashboard.clone();
        async move { dashboard.pump_feed(events).await }
    });
    tokio::spawn({
        let dashboard = dashboard.clone();
        async move { dashboard.start().await }
    });

    // 4. 控制台
    let app = tui::App::new(dashboard.clone(), cli.locale(), config.admin_url.clone());
    let result = tui::run(app).await;

    // 5. 关闭
    dashboard.shutdown();
    feed.shutdown().await;
    if let Err(e) = pump.await {
        tracing::warn!("Feed pump panicked: {e}");
    }
    tracing::info!("OrderDesk stopped");

    result
}
