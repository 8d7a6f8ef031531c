use configs::AppConfig;
use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn main() -> std::process::ExitCode {
    // 先加载 .env，使 RUST_LOG、PORT、REGION 等生效
    dotenv().ok();

    // 配置错误在日志初始化之后再报告
    let cfg = AppConfig::load_and_validate();
    let log_format = cfg
        .as_ref()
        .map(|c| c.server.log_format.as_str())
        .unwrap_or("compact");
    common::utils::logging::init_logging(log_format);
    info!(service = "server", event = "logger_init", format = log_format, "tracing subscriber initialized");

    let cfg = match cfg {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "server", event = "config_invalid", error = %format!("{e:#}"), "failed to load configuration");
            return std::process::ExitCode::FAILURE;
        }
    };

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "server",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    // 未配置时使用 tokio 默认线程数（CPU 核数）
    let worker_threads = cfg.server.worker_threads;
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads {
        builder.worker_threads(w);
    }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "server", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "server",
        event = "start",
        %service_id,
        pid,
        version,
        threads = ?worker_threads,
        backend = %cfg.store.backend,
        region = %cfg.store.region,
        table = %cfg.store.table_name,
        "server service starting"
    );

    match rt.block_on(server::run(cfg)) {
        Ok(()) => {
            info!(service = "server", event = "stop", %service_id, pid, "server stopped normally");
            std::process::ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "server", event = "run_failed", error = %format!("{e:#}"), "server::run returned error");
            std::process::ExitCode::FAILURE
        }
    }
}
