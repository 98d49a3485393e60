use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::{ObjectCache, create_cache};
use crate::errors::Result;
use crate::models::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::services::Services;
use crate::storage::object_store::create_object_store;
use crate::storage::{Storage, create_storage};

const DEFAULT_ADMIN_EMAIL: &str = "admin@localhost";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub services: Services,
}

/// 初始化默认管理员账号
/// 数据库中没有任何用户时创建一个 admin，令牌由外部认证服务按该账号签发
async fn seed_admin(storage: &Arc<dyn Storage>) {
    match storage.count_users().await {
        Ok(count) if count > 0 => {
            debug!(
                "Database already has {} user(s), skipping admin seed",
                count
            );
            return;
        }
        Ok(_) => {
            info!("No users found in database, creating default admin account...");
        }
        Err(e) => {
            warn!("Failed to count users: {}, skipping admin seed", e);
            return;
        }
    }

    let admin_request = CreateUserRequest {
        email: DEFAULT_ADMIN_EMAIL.to_string(),
        full_name: Some("Administrator".to_string()),
        role: UserRole::Admin,
    };

    match storage.create_user(admin_request).await {
        Ok(user) => {
            info!(
                "Default admin account created successfully (ID: {}, email: {})",
                user.id, user.email
            );
        }
        Err(e) => {
            warn!("Failed to create admin account: {}", e);
        }
    }
}

/// 准备服务器启动的上下文
/// 包括存储、缓存与各业务服务
pub async fn prepare_server_startup() -> Result<StartupContext> {
    // 已安装过提供者时忽略
    let _ = rustls::crypto::ring::default_provider().install_default();

    let storage = create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    seed_admin(&storage).await;

    let cache = create_cache();
    warn!("Cache backend initialized");

    let object_store = create_object_store();
    let services = Services::new(storage.clone(), cache.clone(), object_store);

    Ok(StartupContext {
        storage,
        cache,
        services,
    })
}
