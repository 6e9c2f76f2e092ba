use std::fmt;
use std::time::Duration;

use crate::registry::RoomDescriptor;

pub const DEFAULT_BILLING_URL: &str = "http://wxjdf.tiangong.edu.cn:9910/web/Common/Tsm.html";

#[derive(Debug, Clone)]
pub struct Config {
    pub webhook_url: String,
    pub session_id: String,
    pub billing_url: String,
    pub rooms: Vec<RoomDescriptor>,
    pub query_timeout: Duration,
    pub notify_timeout: Duration,
    pub pacing: Pacing,
}

/// Fixed pauses between outbound calls.
#[derive(Debug, Clone, PartialEq)]
pub struct Pacing {
    pub after_self_test: Duration,
    pub between_rooms: Duration,
    pub before_urgent_alert: Duration,
    pub before_broadcast: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            after_self_test: Duration::from_secs(2),
            between_rooms: Duration::from_secs(2),
            before_urgent_alert: Duration::from_secs(3),
            before_broadcast: Duration::from_secs(2),
        }
    }
}

impl Pacing {
    pub fn none() -> Self {
        Self {
            after_self_test: Duration::ZERO,
            between_rooms: Duration::ZERO,
            before_urgent_alert: Duration::ZERO,
            before_broadcast: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceUnit {
    Kwh,
    Yuan,
}

impl BalanceUnit {
    pub fn suffix(&self) -> &'static str {
        match self {
            BalanceUnit::Kwh => "度",
            BalanceUnit::Yuan => "元",
        }
    }
}

/// Remaining balance as reported by the billing endpoint, kept as the decimal
/// string the server sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Balance {
    pub amount: String,
    pub unit: BalanceUnit,
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit.suffix())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoomReading {
    pub room_name: String,
    pub balance: Balance,
    pub raw_message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Urgent,
    Low,
    Normal,
    Unknown,
}

impl Severity {
    pub const URGENT_BELOW: f64 = 3.0;
    pub const LOW_BELOW: f64 = 10.0;

    pub fn classify(value: Option<f64>) -> Self {
        match value {
            Some(v) if v < Self::URGENT_BELOW => Severity::Urgent,
            Some(v) if v < Self::LOW_BELOW => Severity::Low,
            Some(_) => Severity::Normal,
            None => Severity::Unknown,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Urgent => "🔴",
            Severity::Low => "🟡",
            Severity::Normal => "🟢",
            Severity::Unknown => "⚪",
        }
    }

    /// Status label as rendered in the WeCom markdown dialect.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Urgent => "<font color=\"warning\">严重不足</font>",
            Severity::Low => "<font color=\"warning\">电量不足</font>",
            Severity::Normal => "<font color=\"info\">电量充足</font>",
            Severity::Unknown => "未知",
        }
    }
}

/// Why a single room could not be read. The `Display` text is what lands in
/// the failure block of the chat report.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error("请求超时，请稍后重试")]
    Timeout,
    #[error("网络请求异常: {0}")]
    Transport(String),
    #[error("服务器响应格式错误: {0}...")]
    MalformedResponse(String),
    #[error("JSESSIONID可能已过期，请重新获取")]
    SessionExpired,
    #[error("查询失败，服务器消息: {0}")]
    ServerMessage(String),
}
