/// 引擎配置 - SKU 生成与预留的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | SKU_MAX_ATTEMPTS | 10 | 唯一性校验重试上限 |
/// | SKU_RESERVATION_TTL_SECS | 300 | 预留锁 TTL（秒） |
/// | SKU_COUNTER_TTL_SECS | 86400 | 缓存计数器 TTL（秒） |
/// | SKU_SEQUENCE_PAD | 3 | 序列号零填充宽度 |
/// | SKU_ANALYTICS_BUFFER | 256 | 分析事件通道容量 |
///
/// # 示例
///
/// ```ignore
/// SKU_RESERVATION_TTL_SECS=60 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct SkuConfig {
    /// 唯一性校验重试上限（耗尽后返回 SkuExhausted）
    pub max_attempts: u32,
    /// 预留锁 TTL（秒）- 唯一的死锁预防机制
    pub reservation_ttl_secs: u64,
    /// 缓存计数器 TTL（秒）- 计数器是目录库的临时镜像
    pub counter_ttl_secs: u64,
    /// 序列号零填充宽度（数值比较为准，填充仅用于展示）
    pub sequence_pad: usize,
    /// 分析事件通道容量（满时丢弃事件）
    pub analytics_buffer: usize,
}

impl SkuConfig {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            max_attempts: std::env::var("SKU_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            reservation_ttl_secs: std::env::var("SKU_RESERVATION_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            counter_ttl_secs: std::env::var("SKU_COUNTER_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(86400),
            sequence_pad: std::env::var("SKU_SEQUENCE_PAD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            analytics_buffer: std::env::var("SKU_ANALYTICS_BUFFER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(256),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(max_attempts: u32, reservation_ttl_secs: u64) -> Self {
        let mut config = Self::from_env();
        config.max_attempts = max_attempts;
        config.reservation_ttl_secs = reservation_ttl_secs;
        config
    }
}

impl Default for SkuConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
