//! Chat message bodies in the WeCom markdown dialect.

use std::fmt::Write;

use super::{ReportSummary, RunReport};
use crate::types::RoomReading;

const FOOTER_LABEL: &str = "⚡ 自动电费查询系统";

fn footer(label: &str, timestamp: &str) -> String {
    format!("---\n<font color=\"comment\">{} | {}</font>", label, timestamp)
}

pub fn build_self_test(timestamp: &str) -> String {
    format!(
        "## 🧪 测试消息\n\n这是一个来自电费查询系统的测试消息\n\n**当前时间**: {}\n\n<font color=\"info\">✅ 机器人连接正常</font>",
        timestamp
    )
}

pub fn build_summary_report(report: &RunReport, timestamp: &str) -> String {
    let summary = report.summary();
    let mut out = String::new();
    out.push_str("## 🔋 电费查询报告\n\n");
    let _ = write!(out, "**查询时间**：{}\n\n", timestamp);

    out.push_str("### 📊 查询结果\n");
    for reading in &report.successes {
        let severity = reading.balance.severity();
        let _ = write!(
            out,
            "{} **{}**：**{}**（{}）\n\n",
            severity.icon(),
            reading.room_name,
            reading.balance,
            severity.label()
        );
    }

    out.push_str(&statistics_block(&summary));

    if !report.failures.is_empty() {
        out.push_str("\n### ⚠️ 查询失败\n");
        for failure in &report.failures {
            let _ = writeln!(out, "- {}", failure);
        }
    }

    out.push_str("\n### 💡 温馨提示\n");
    if summary.urgent > 0 {
        let _ = write!(
            out,
            "<font color=\"warning\">**🚨 紧急提醒**：有 {} 个寝室电量严重不足（<3度），请立即充电！</font>\n\n",
            summary.urgent
        );
    } else if summary.low > 0 {
        let _ = write!(
            out,
            "<font color=\"warning\">**⚠️ 提醒**：有 {} 个寝室电量不足（<10度），建议及时充电。</font>\n\n",
            summary.low
        );
    } else {
        out.push_str("所有寝室电量充足，请放心使用。\n\n");
    }

    out.push_str(&footer(FOOTER_LABEL, timestamp));
    out
}

fn statistics_block(summary: &ReportSummary) -> String {
    let mut out = String::from("### 📈 统计信息\n");
    let _ = writeln!(out, "- 查询寝室数：{} 个", summary.total);
    if summary.urgent > 0 {
        let _ = writeln!(
            out,
            "- <font color=\"warning\">严重低电量：{} 个（<3度）</font>",
            summary.urgent
        );
    }
    if summary.low > 0 {
        let _ = writeln!(
            out,
            "- <font color=\"warning\">低电量：{} 个（<10度）</font>",
            summary.low
        );
    }
    out
}

pub fn build_failure_report(failures: &[String], timestamp: &str) -> String {
    let mut out = String::from("## ❌ 电费查询失败\n\n");
    let _ = write!(out, "**时间**：{}\n\n", timestamp);
    out.push_str("所有寝室查询都失败了：\n\n");
    for failure in failures {
        let _ = writeln!(out, "- {}", failure);
    }

    out.push_str("\n### 🔧 可能原因\n");
    out.push_str("1. **JSESSIONID 已过期**（最常见）\n");
    out.push_str("2. 学校服务器维护中\n");
    out.push_str("3. 网络连接问题\n");
    out.push_str("4. 寝室参数配置错误\n");

    out.push_str("\n### 💡 解决方案\n");
    out.push_str("1. 重新获取 JSESSIONID\n");
    out.push_str("2. 稍后重试\n");
    out.push_str("3. 检查寝室配置信息\n\n");

    out.push_str(&footer(FOOTER_LABEL, timestamp));
    out
}

pub fn build_urgent_alert(urgent: &[&RoomReading], timestamp: &str) -> String {
    let mut out = String::from("## 🚨 紧急电量预警\n\n");
    out.push_str("**以下寝室电量严重不足，请立即处理：**\n\n");
    for reading in urgent {
        let _ = write!(
            out,
            "🔴 **{}**：仅剩 **{}** ！\n\n",
            reading.room_name, reading.balance
        );
    }
    out.push_str("**⚠️ 可能随时断电，请尽快充值！**\n\n");
    out.push_str(&footer("紧急提醒", timestamp));
    out
}

/// Plain-text body for the `@all` broadcast.
pub fn build_urgent_broadcast(urgent_count: usize) -> String {
    format!(
        "【紧急通知】有{}个寝室电量严重不足（<3度），可能随时断电，请相关同学立即处理！",
        urgent_count
    )
}
