//! The randomized drought self-timer.
//!
//! When enabled, this task periodically injects a drought toggle into
//! the Command channel, the same single mutation point every other
//! writer uses. The interval is drawn uniformly from a range that
//! depends on the current mode: drought spells are shorter than the
//! fair-weather stretches between them.
//!
//! The task tracks the actual mode by watching snapshots, so toggles
//! from the dashboard or a signal do not desynchronize it.

use std::time::Duration;

use rand::Rng;
use tokio::sync::{broadcast, mpsc};
use tokio::time::sleep;
use tracing::debug;

use savanna_types::{Command, Snapshot};

use crate::config::DroughtConfig;

/// Run the self-timer until the command channel closes.
pub async fn run_drought_timer(
    config: DroughtConfig,
    commands: mpsc::UnboundedSender<Command>,
    mut snapshots: broadcast::Receiver<Snapshot>,
) {
    let mut drought = false;
    loop {
        let interval = next_interval(&config, drought);
        debug!(drought, ?interval, "drought timer armed");
        sleep(interval).await;

        // Catch up on the real mode before toggling; an operator may
        // have flipped it while we slept.
        loop {
            match snapshots.try_recv() {
                Ok(snapshot) => drought = snapshot.drought,
                Err(broadcast::error::TryRecvError::Lagged(_)) => {}
                Err(_) => break,
            }
        }

        if commands.send(Command::TriggerDrought).is_err() {
            return;
        }
        drought = !drought;
    }
}

/// Draw the next interval for the current mode.
fn next_interval(config: &DroughtConfig, drought: bool) -> Duration {
    let (min, max) = if drought {
        (config.drought_secs_min, config.drought_secs_max)
    } else {
        (config.normal_secs_min, config.normal_secs_max)
    };
    let max = max.max(min);
    let secs = {
        let mut rng = rand::rng();
        rng.random_range(min..=max)
    };
    Duration::from_secs(secs)
}
