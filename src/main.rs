// ==========================================
// 律所案件管理系统 - 命令行入口
// ==========================================
// 用法:
//   lawfirm-cms roster                      查看律师名册
//   lawfirm-cms add-lawyer <姓名>           新增律师
//   lawfirm-cms assign <当事人> <案由>      登记新案件并自动分配
//   lawfirm-cms cases                       查看案件列表
//   lawfirm-cms logs                        查看最近操作日志
// ==========================================

use anyhow::anyhow;
use lawfirm_cms::app::{get_default_db_path, AppState};

fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    lawfirm_cms::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", lawfirm_cms::APP_NAME);
    tracing::info!("系统版本: {}", lawfirm_cms::VERSION);
    tracing::info!("==================================================");

    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    let app = AppState::new(db_path).map_err(|e| anyhow!(e))?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("roster") | None => {
            let lawyers = app.roster_api.list_lawyers()?;
            if lawyers.is_empty() {
                println!("名册为空,先执行 add-lawyer <姓名>");
            }
            for l in lawyers {
                println!(
                    "#{:<3} {:<12} {:<9} 案件数={:<4} {}",
                    l.roster_seq,
                    l.name,
                    l.status,
                    l.assigned_files_count,
                    l.leave_return_date
                        .map(|d| format!("返回日期={}", d))
                        .unwrap_or_default(),
                );
            }
        }
        Some("add-lawyer") => {
            let name = args
                .get(1)
                .ok_or_else(|| anyhow!("用法: add-lawyer <姓名>"))?;
            let lawyer = app.roster_api.create_lawyer(name, "cli")?;
            println!("已新增律师: {} (id={})", lawyer.name, lawyer.lawyer_id);
        }
        Some("assign") => {
            let plaintiff = args
                .get(1)
                .ok_or_else(|| anyhow!("用法: assign <当事人> <案由>"))?;
            let subject = args
                .get(2)
                .ok_or_else(|| anyhow!("用法: assign <当事人> <案由>"))?;
            let case = app.case_file_api.create_case_file(plaintiff, subject, "cli")?;
            println!(
                "已登记案件 {} -> 承办律师 {}",
                case.registration_no,
                case.assigned_lawyer_id.as_deref().unwrap_or("-"),
            );
        }
        Some("cases") => {
            for c in app.case_file_api.list_case_files()? {
                println!(
                    "{:<10} {:<8} {:<12} {} ({})",
                    c.registration_no,
                    c.status,
                    c.plaintiff,
                    c.subject,
                    c.created_at.format("%Y-%m-%d %H:%M:%S"),
                );
            }
        }
        Some("logs") => {
            for log in app.action_log_repo.list_recent(50)? {
                println!(
                    "{} {:<15} {:<8} {}",
                    log.action_ts.format("%Y-%m-%d %H:%M:%S"),
                    log.action_type,
                    log.phase.map(|p| p.to_string()).unwrap_or_default(),
                    log.detail.unwrap_or_default(),
                );
            }
        }
        Some(other) => {
            return Err(anyhow!("未知子命令: {}", other));
        }
    }

    Ok(())
}
