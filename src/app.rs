use std::sync::{Arc, Mutex};

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::AppConfig;
use crate::interfaces::http::{start_server, LogEntry};

pub fn run() -> Result<()> {
    let config = AppConfig::load()?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_filter()))
        .try_init();

    let logs: Arc<Mutex<Vec<LogEntry>>> = Arc::new(Mutex::new(Vec::new()));
    let state = crate::infrastructure::bootstrap::setup(config, &logs)?;

    let address = format!(
        "http://{}:{}",
        state.config.server.host, state.config.server.port
    );

    actix_web::rt::System::new().block_on(async move {
        let server = start_server(state, logs).map_err(|err| {
            error!(error = %err, "Failed to bind dashboard server");
            AppError::from(err)
        })?;

        info!(url = %address, "SmartPay dashboard listening");
        server.await.map_err(AppError::from)
    })
}
