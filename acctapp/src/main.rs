use acctapp::{
    conf::Cli,
    server::router,
};
use axum::Router;
use clap::Parser;

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => log::info!("shutting down"),
        Err(e) => {
            log::error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Cli::parse();

    stderrlog::new()
        .module(module_path!())
        .module("acctac")
        .module("acctapp")
        .module("acctctrl")
        .module("acctdb_sqlite")
        .verbosity((args.verbose as usize) + 1)
        .timestamp(stderrlog::Timestamp::Second)
        .init()?;

    let cors = args.cors_layer()?;
    let platform = args.platform_builder
        .clone()
        .build()
        .await
        .map_err(anyhow::Error::from_boxed)?;

    let app = Router::new()
        .nest("/api", router(platform))
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(&args.acct_listen).await?;
    log::info!("listening on http://{}", &args.acct_listen);
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
