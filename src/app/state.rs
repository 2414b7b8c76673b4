// ==========================================
// 律所案件管理系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{CaseFileApi, ConfigApi, RosterApi};
use crate::clock::{Clock, SystemClock};
use crate::config::config_manager::ConfigManager;
use crate::db;
use crate::repository::{ActionLogRepository, CaseFileRepository, LawyerRepository};

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 案件登记API
    pub case_file_api: Arc<CaseFileApi>,

    /// 律师名册API
    pub roster_api: Arc<RosterApi>,

    /// 配置管理API
    pub config_api: Arc<ConfigApi>,

    /// 操作日志仓储（用于审计追踪查询）
    pub action_log_repo: Arc<ActionLogRepository>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开共享数据库连接并初始化 schema
    /// 2. 初始化所有Repository
    /// 3. 创建所有API实例 (系统时钟)
    pub fn new(db_path: String) -> Result<Self, String> {
        Self::with_clock(db_path, Arc::new(SystemClock))
    }

    /// 以指定时钟创建AppState（测试注入固定时钟）
    pub fn with_clock(db_path: String, clock: Arc<dyn Clock>) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        // 创建数据库连接（共享连接,统一 PRAGMA）
        let conn = db::open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        db::init_schema(&conn).map_err(|e| format!("schema 初始化失败: {}", e))?;

        match db::read_schema_version(&conn) {
            Ok(Some(v)) if v != db::CURRENT_SCHEMA_VERSION => {
                tracing::warn!(
                    "schema_version={} 与代码期望的 {} 不一致",
                    v,
                    db::CURRENT_SCHEMA_VERSION
                );
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("schema_version 读取失败(将继续启动): {}", e),
        }

        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let lawyer_repo = Arc::new(LawyerRepository::new(conn.clone()));
        let case_file_repo = Arc::new(CaseFileRepository::new(conn.clone()));
        let action_log_repo = Arc::new(ActionLogRepository::new(conn.clone()));

        // ==========================================
        // 初始化配置层与API层
        // ==========================================
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("ConfigManager 初始化失败: {}", e))?,
        );

        let case_file_api = Arc::new(CaseFileApi::new(
            conn.clone(),
            case_file_repo.clone(),
            action_log_repo.clone(),
            clock.clone(),
        ));
        let roster_api = Arc::new(RosterApi::new(
            lawyer_repo.clone(),
            action_log_repo.clone(),
            clock.clone(),
        ));
        let config_api = Arc::new(ConfigApi::new(
            conn.clone(),
            config_manager.clone(),
            action_log_repo.clone(),
            clock,
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            case_file_api,
            roster_api,
            config_api,
            action_log_repo,
        })
    }
}

/// 获取默认数据库路径
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("LAWFIRM_CMS_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    // 使用用户数据目录,开发环境使用独立目录避免污染生产数据
    let mut path = PathBuf::from("./lawfirm_cms.db");

    if let Some(data_dir) = dirs::data_dir() {
        #[cfg(debug_assertions)]
        {
            path = data_dir.join("lawfirm-cms-dev");
        }
        #[cfg(not(debug_assertions))]
        {
            path = data_dir.join("lawfirm-cms");
        }

        if let Err(e) = std::fs::create_dir_all(&path) {
            tracing::warn!("创建数据目录失败,回退到当前目录: {}", e);
            return "./lawfirm_cms.db".to_string();
        }
        path = path.join("lawfirm_cms.db");
    }

    path.to_string_lossy().to_string()
}
