use std::net::SocketAddr;

use dotenvy::dotenv;
use tracing::info;

use polypost_api::infra::{
    app::create_app, reminder_worker::run_reminder_loop, setup::init_app_state,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let app_state = init_app_state().await?;

    let bind_addr = app_state.config.bind_addr;

    let app = create_app(app_state.clone());

    // Spawn the reminder/summary background task (after tracing is initialized)
    let reminders = app_state.reminder_use_cases.clone();
    let quota = app_state.quota_use_cases.clone();
    let poll = app_state.config.reminder_poll_seconds;
    let summary = app_state.config.weekly_summary_interval_seconds;
    tokio::spawn(async move {
        run_reminder_loop(reminders, quota, poll, summary).await;
    });

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!("Backend listening at {}", &listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
