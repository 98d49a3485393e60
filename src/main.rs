//! Trackademy 学业记录服务
//!
//! 读取配置、初始化日志、准备存储与业务服务，然后挂载 `/api/v1` 下的全部资源。

use std::time::Duration;

use actix_cors::Cors;
use actix_web::middleware::{Compress, DefaultHeaders};
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use human_panic::setup_panic;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use trackademy::config::AppConfig;
use trackademy::routes;
use trackademy::runtime::lifetime;
use trackademy::utils::{json_error_handler, query_error_handler};

/// 开发环境输出带源码位置的文本日志，其余环境输出 JSON
fn init_logging(config: &AppConfig) -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.app.log_level))
        .with_writer(writer)
        .event_format(
            tracing_subscriber::fmt::format()
                .with_level(true)
                .with_ansi(true),
        );

    if config.is_development() {
        builder.with_file(true).with_line_number(true).init();
    } else {
        builder.json().init();
    }
    guard
}

// 只记录数据库类型，连接串里可能带口令
fn database_backend(url: &str) -> &str {
    url.split(':').next().unwrap_or("unknown")
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    setup_panic!();
    let booted_at = chrono::Utc::now();

    AppConfig::init().map_err(std::io::Error::other)?;
    let config = AppConfig::get();
    let _log_guard = init_logging(config);

    warn!(
        "Trackademy academic records service v{}
        System: {} ({})
        Database: {}
        Uploads: {}",
        env!("CARGO_PKG_VERSION"),
        config.app.system_name,
        config.app.environment,
        database_backend(&config.database.url),
        config.upload.dir,
    );

    // 迁移、默认管理员、缓存与业务服务
    let startup = lifetime::startup::prepare_server_startup()
        .await
        .map_err(std::io::Error::other)?;
    let storage = startup.storage.clone();
    let cache = startup.cache.clone();
    let services = startup.services.clone();

    debug!(
        "Storage and services ready after {} ms",
        (chrono::Utc::now() - booted_at).num_milliseconds()
    );
    info!("Serving with {} worker(s)", config.server.workers);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(config.cors.max_age),
            )
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("Connection", "keep-alive"))
                    .add((
                        "Keep-Alive",
                        format!("timeout={}, max=1000", config.server.timeouts.keep_alive),
                    ))
                    // 成绩、考勤等记录不允许被中间代理缓存
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            // 提取器失败统一转成 JSON 错误
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::PayloadConfig::new(config.server.limits.max_payload_size))
            // JWT 中间件直接从 app_data 取存储与身份缓存
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(cache.clone()))
            .configure(|cfg| services.register(cfg))
            .configure(routes::configure_api_routes)
    })
    .keep_alive(Duration::from_secs(config.server.timeouts.keep_alive))
    .client_request_timeout(Duration::from_millis(config.server.timeouts.client_request))
    .client_disconnect_timeout(Duration::from_millis(
        config.server.timeouts.client_disconnect,
    ))
    .workers(config.server.workers);

    let address = config.server_bind_address();

    #[cfg(unix)]
    let server = match config.unix_socket_path() {
        Some(socket_path) => {
            // 上次异常退出可能留下旧的套接字文件
            if std::path::Path::new(socket_path).exists() {
                std::fs::remove_file(socket_path)?;
            }
            warn!("Trackademy API listening on unix:{}", socket_path);
            server.bind_uds(socket_path)?
        }
        None => {
            warn!("Trackademy API listening on http://{}/api/v1", address);
            server.bind(address.as_str())?
        }
    };

    #[cfg(not(unix))]
    let server = {
        warn!("Trackademy API listening on http://{}/api/v1", address);
        server.bind(address.as_str())?
    };

    tokio::select! {
        res = server.run() => res?,
        _ = lifetime::shutdown::listen_for_shutdown() => {
            warn!("Trackademy stopped after shutdown signal");
        }
    }

    Ok(())
}
