use regex::Regex;
use std::sync::LazyLock;

use crate::types::{Balance, BalanceUnit, QueryError, Severity};

/// One way the billing endpoint phrases a remaining balance. The first capture
/// group is the amount.
pub struct BalanceRule {
    pub pattern: &'static str,
    pub unit: BalanceUnit,
}

/// Evaluated in order; the first match wins.
pub const BALANCE_RULES: &[BalanceRule] = &[
    BalanceRule { pattern: r"剩余购电量:(\d+\.?\d*)度", unit: BalanceUnit::Kwh },
    BalanceRule { pattern: r"剩余金额:(\d+\.?\d*)元", unit: BalanceUnit::Yuan },
];

/// Lowercased substrings that mean the session cookie was rejected.
const SESSION_MARKERS: &[&str] = &["session", "登录"];

static COMPILED_RULES: LazyLock<Vec<(Regex, BalanceUnit)>> = LazyLock::new(|| {
    BALANCE_RULES
        .iter()
        .map(|r| (Regex::new(r.pattern).expect("balance rule pattern"), r.unit))
        .collect()
});

static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.?\d*)").expect("number pattern"));

pub fn match_balance(message: &str) -> Option<Balance> {
    COMPILED_RULES.iter().find_map(|(re, unit)| {
        re.captures(message).map(|caps| Balance {
            amount: caps[1].to_string(),
            unit: *unit,
        })
    })
}

/// Turn the server's free-text status message into a balance or a failure reason.
pub fn interpret_status_message(message: &str) -> Result<Balance, QueryError> {
    if let Some(balance) = match_balance(message) {
        return Ok(balance);
    }
    let lowered = message.to_lowercase();
    if SESSION_MARKERS.iter().any(|m| lowered.contains(m)) {
        return Err(QueryError::SessionExpired);
    }
    Err(QueryError::ServerMessage(message.to_string()))
}

pub fn first_number(text: &str) -> Option<f64> {
    FIRST_NUMBER
        .captures(text)
        .and_then(|caps| caps[1].parse::<f64>().ok())
}

impl Balance {
    /// Leading numeric value of the displayed balance, unit ignored.
    pub fn value(&self) -> Option<f64> {
        first_number(&self.to_string())
    }

    pub fn severity(&self) -> Severity {
        Severity::classify(self.value())
    }
}
