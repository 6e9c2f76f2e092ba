use tokio::time::sleep;
use tracing::{info, warn};

use crate::billing::BalanceSource;
use crate::report::RunReport;
use crate::types::Config;

/// Walks the room registry one room at a time
pub struct RoomCollector<'a, S> {
    source: &'a S,
    config: &'a Config,
}

impl<'a, S: BalanceSource> RoomCollector<'a, S> {
    pub fn new(source: &'a S, config: &'a Config) -> Self {
        Self { source, config }
    }

    /// Query every room in registry order, pausing between calls.
    /// A failed room never stops the ones after it.
    pub async fn collect(&self) -> RunReport {
        let mut report = RunReport::new();
        let rooms = &self.config.rooms;
        info!("Querying {} rooms", rooms.len());

        for (i, room) in rooms.iter().enumerate() {
            info!("Room [{}/{}]: {}", i + 1, rooms.len(), room.name);
            let outcome = self.source.query(room).await;
            match &outcome {
                Ok(reading) => info!("{} ok, remaining {}", room.name, reading.balance),
                Err(e) => warn!("{} failed: {}", room.name, e),
            }
            report.record(&room.name, outcome);

            if i + 1 < rooms.len() {
                sleep(self.config.pacing.between_rooms).await;
            }
        }

        report
    }
}
