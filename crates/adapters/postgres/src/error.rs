//! sqlx 错误映射

use tasker_errors::AppError;

/// 唯一约束冲突的 SQLSTATE
const UNIQUE_VIOLATION: &str = "23505";

/// 将 sqlx 错误转换为 AppError
///
/// 唯一约束冲突映射为 `Conflict`，其余为 `Database`。
pub fn map_sqlx_error(context: &str, err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return AppError::conflict(format!("{}: duplicate key", context));
        }
    }
    AppError::database(format!("{}: {}", context, err))
}
