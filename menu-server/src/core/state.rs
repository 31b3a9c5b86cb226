use std::path::PathBuf;
use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::{self, JwtService};
use crate::core::{Config, Result, ServerError};
use crate::db::DbService;
use crate::db::repository::{self, RepoError};
use shared::models::{ROLE_MANAGER, UserCreate};

/// 服务器状态 - 持有所有服务的单例引用
///
/// 使用 Arc 实现浅拷贝，克隆成本极低。
///
/// # 组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | DbService | SQLite 连接池 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 数据库服务
    pub db: DbService,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构 (database/ 与 logs/)
    /// 2. 数据库 (work_dir/database/menu.db, 自动迁移)
    /// 3. JWT 服务
    /// 4. 管理员账号引导 (配置了 MANAGER_* 时)
    pub async fn initialize(config: &Config) -> Result<Self> {
        config.ensure_work_dir_structure()?;

        let db_path = config.database_path();
        let db = DbService::new(&db_path.to_string_lossy())
            .await
            .map_err(|e| ServerError::Database(e.to_string()))?;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        let state = Self {
            config: config.clone(),
            db,
            jwt_service,
        };
        state.bootstrap_manager().await?;

        Ok(state)
    }

    /// 启动时引导管理员账号
    ///
    /// 配置了 `MANAGER_USERNAME` / `MANAGER_PASSWORD` 且该用户不存在时创建,
    /// 已存在则跳过 (不覆盖密码)。
    async fn bootstrap_manager(&self) -> Result<()> {
        let Some(username) = self.config.manager_username.as_deref() else {
            return Ok(());
        };
        let Some(password) = self.config.manager_password.as_deref() else {
            tracing::warn!("MANAGER_USERNAME set without MANAGER_PASSWORD; skipping bootstrap");
            return Ok(());
        };

        let pool = self.get_pool();
        let existing = repository::user::find_by_username(pool, username)
            .await
            .map_err(|e| ServerError::Database(e.to_string()))?;
        if existing.is_some() {
            tracing::debug!(username, "Manager account already exists, skipping bootstrap");
            return Ok(());
        }

        let hash_pass = auth::hash_password(password)
            .map_err(|e| ServerError::Database(format!("Failed to hash manager password: {e}")))?;
        let data = UserCreate {
            username: username.to_string(),
            email: self.config.manager_email.clone().unwrap_or_default(),
            password: password.to_string(),
            first_name: String::new(),
            last_name: String::new(),
        };

        match repository::user::create(pool, &data, &hash_pass, ROLE_MANAGER).await {
            Ok(user) => {
                tracing::info!(username = %user.username, "Manager account bootstrapped");
                Ok(())
            }
            // Lost a race with a concurrent boot; the account exists either way
            Err(RepoError::Duplicate(_)) => Ok(()),
            Err(e) => Err(ServerError::Database(e.to_string())),
        }
    }

    /// 获取数据库连接池
    pub fn get_pool(&self) -> &SqlitePool {
        &self.db.pool
    }

    /// 获取工作目录
    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// 新订单使用的默认配送费
    pub fn delivery_fee(&self) -> f64 {
        self.config.delivery_fee
    }
}
