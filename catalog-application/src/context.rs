use bon::Builder;

/// 应用层上下文（Application Context）
///
/// 承载一次应用层调用（命令/查询）所需的横切信息：
/// - 关联追踪 `correlation_id`：同一次用户操作产生的日志可据此串联；
/// - 操作者 `actor`：审计用途，控制台下为当前会话。
///
/// 典型用法：
/// ```rust
/// use catalog_application::context::AppContext;
///
/// let ctx = AppContext::builder()
///     .maybe_correlation_id(Some("cor-123".into()))
///     .actor("console".into())
///     .build();
/// assert_eq!(ctx.correlation_id(), "cor-123");
/// ```
#[derive(Builder, Clone, Debug, Default)]
pub struct AppContext {
    /// 关联追踪标识（可选）
    pub correlation_id: Option<String>,
    /// 操作者（可选）
    pub actor: Option<String>,
}

impl AppContext {
    /// 关联追踪标识；未设置时为 `-`
    pub fn correlation_id(&self) -> &str {
        self.correlation_id.as_deref().unwrap_or("-")
    }

    pub fn actor(&self) -> &str {
        self.actor.as_deref().unwrap_or("anonymous")
    }
}
