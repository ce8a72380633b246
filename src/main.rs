use anyhow::{Context, Result};
use std::time::Duration;
use tokio::net::TcpListener;

use readiness_dashboard::config::Config;
use readiness_dashboard::logging::{log, obj, v_num, v_str, Domain, Level};
use readiness_dashboard::server::{serve, spawn_session_pruner, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();
    let state = AppState::from_config(&cfg).context("failed to build dashboard state")?;

    let listener = TcpListener::bind(&cfg.bind)
        .await
        .with_context(|| format!("failed to bind {}", cfg.bind))?;
    let addr = listener.local_addr()?;

    // Idle sessions are checked at a tenth of the idle limit, at least once a minute.
    let prune_every = Duration::from_secs((cfg.session_idle_secs / 10).clamp(1, 60));
    let _pruner = spawn_session_pruner(state.sessions.clone(), prune_every);

    log(
        Level::Info,
        Domain::System,
        "startup",
        obj(&[
            ("addr", v_str(&addr.to_string())),
            ("plots_dir", v_str(&cfg.plots_dir.display().to_string())),
            ("summary", serde_json::Value::Bool(state.data.is_some())),
            ("reveal_delay_ms", v_num(cfg.reveal_delay_ms as f64)),
        ]),
    );

    serve(listener, state).await.context("server error")?;
    Ok(())
}
