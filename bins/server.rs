use configs::{AppConfig, LogFormat};
use tracing::{error, info};
use uuid::Uuid;

fn init_logging(format: LogFormat) {
    // RUST_LOG from .env must be visible before the subscriber is built
    dotenvy::dotenv().ok();
    common::utils::logging::init_logging(format == LogFormat::Json);
    info!(service = "warehouse", event = "logger_init", "tracing subscriber initialized");
}

fn main() -> std::process::ExitCode {
    let cfg = match AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            common::utils::logging::init_logging_default();
            error!(service = "warehouse", event = "config_invalid", error = %e, "failed to load configuration");
            return std::process::ExitCode::FAILURE;
        }
    };
    init_logging(cfg.logging.format);

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "warehouse",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let worker_threads = cfg.server.worker_threads;
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads {
        builder.worker_threads(w);
    }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "warehouse", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "warehouse",
        event = "start",
        %service_id,
        pid,
        version,
        threads = worker_threads.unwrap_or_default(),
        "warehouse service starting"
    );

    // server::run drains connections itself on Ctrl+C
    rt.block_on(async move {
        match server::run(cfg).await {
            Ok(()) => {
                info!(service = "warehouse", event = "stop", %service_id, pid, "server stopped normally");
                std::process::ExitCode::SUCCESS
            }
            Err(e) => {
                error!(service = "warehouse", event = "run_failed", error = %e, "server::run returned error");
                std::process::ExitCode::FAILURE
            }
        }
    })
}
