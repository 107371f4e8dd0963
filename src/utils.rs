use uuid::Uuid;

/// 为每个连接生成一个随机会话 ID，用于日志关联
pub fn session_id() -> String {
    Uuid::new_v4().to_string()
}
