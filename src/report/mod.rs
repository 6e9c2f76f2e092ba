pub mod markdown;

use crate::types::{QueryError, RoomReading, Severity};

/// Outcomes of one run, in query order. Append-only.
#[derive(Debug, Default)]
pub struct RunReport {
    pub successes: Vec<RoomReading>,
    pub failures: Vec<String>,
}

/// Which message the run ends with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportBranch {
    /// At least one room was read.
    Summary,
    /// Every room failed.
    AllFailed,
    /// Nothing was queried.
    Empty,
}

impl ReportBranch {
    pub fn select(successes: usize, failures: usize) -> Self {
        match (successes, failures) {
            (s, _) if s > 0 => ReportBranch::Summary,
            (_, f) if f > 0 => ReportBranch::AllFailed,
            _ => ReportBranch::Empty,
        }
    }
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, room_name: &str, outcome: Result<RoomReading, QueryError>) {
        match outcome {
            Ok(reading) => self.successes.push(reading),
            Err(e) => self.failures.push(format!("{}: {}", room_name, e)),
        }
    }

    pub fn branch(&self) -> ReportBranch {
        ReportBranch::select(self.successes.len(), self.failures.len())
    }

    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary {
            total: self.successes.len(),
            urgent: 0,
            low: 0,
        };
        for reading in &self.successes {
            match reading.balance.severity() {
                Severity::Urgent => summary.urgent += 1,
                Severity::Low => summary.low += 1,
                Severity::Normal | Severity::Unknown => {}
            }
        }
        summary
    }

    /// Rooms below the urgent threshold, in query order.
    pub fn urgent_rooms(&self) -> Vec<&RoomReading> {
        self.successes
            .iter()
            .filter(|r| r.balance.severity() == Severity::Urgent)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSummary {
    pub total: usize,
    pub urgent: usize,
    pub low: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Balance, BalanceUnit};

    fn reading(name: &str, amount: &str, unit: BalanceUnit) -> RoomReading {
        RoomReading {
            room_name: name.to_string(),
            balance: Balance { amount: amount.to_string(), unit },
            raw_message: String::new(),
        }
    }

    #[test]
    fn test_branch_selection() {
        assert_eq!(ReportBranch::select(1, 0), ReportBranch::Summary);
        assert_eq!(ReportBranch::select(2, 5), ReportBranch::Summary);
        assert_eq!(ReportBranch::select(0, 1), ReportBranch::AllFailed);
        assert_eq!(ReportBranch::select(0, 0), ReportBranch::Empty);
    }

    #[test]
    fn test_record_keeps_order_and_formats_failures() {
        let mut report = RunReport::new();
        report.record("A", Ok(reading("A", "12", BalanceUnit::Kwh)));
        report.record("B", Err(QueryError::Timeout));
        report.record("C", Ok(reading("C", "1", BalanceUnit::Kwh)));
        report.record("D", Err(QueryError::SessionExpired));

        let names: Vec<&str> = report.successes.iter().map(|r| r.room_name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
        assert_eq!(
            report.failures,
            vec![
                "B: 请求超时，请稍后重试".to_string(),
                "D: JSESSIONID可能已过期，请重新获取".to_string(),
            ]
        );
        assert_eq!(report.branch(), ReportBranch::Summary);
    }

    #[test]
    fn test_summary_ignores_unknown() {
        let mut report = RunReport::new();
        report.record("a", Ok(reading("a", "2.5", BalanceUnit::Kwh)));
        report.record("b", Ok(reading("b", "7", BalanceUnit::Kwh)));
        report.record("c", Ok(reading("c", "15", BalanceUnit::Yuan)));
        report.record("d", Ok(reading("d", "abc", BalanceUnit::Kwh)));

        assert_eq!(report.summary(), ReportSummary { total: 4, urgent: 1, low: 1 });
    }

    #[test]
    fn test_urgent_rooms_in_query_order() {
        let mut report = RunReport::new();
        report.record("x", Ok(reading("x", "0.5", BalanceUnit::Kwh)));
        report.record("y", Ok(reading("y", "50", BalanceUnit::Kwh)));
        report.record("z", Ok(reading("z", "2.99", BalanceUnit::Yuan)));

        let urgent: Vec<&str> = report.urgent_rooms().iter().map(|r| r.room_name.as_str()).collect();
        assert_eq!(urgent, vec!["x", "z"]);
    }
}
