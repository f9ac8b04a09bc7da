use warden::config::Config;
use warden::server::Server;

fn main() -> anyhow::Result<()> {
    let cfg = Config::load()?;

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(tracing::Level::from(cfg.log_level))
        .init();

    // Handlers run on blocking threads; cap them at the pool size.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .max_blocking_threads(cfg.workers)
        .thread_name("warden")
        .build()?;

    runtime.block_on(async move {
        let server = Server::bind(cfg).await?;
        let shutdown = server.shutdown_handle();

        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown signal received");
                shutdown.trigger();
            }
        });

        server.run().await
    })
}
