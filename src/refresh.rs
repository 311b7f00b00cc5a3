//! Timer-driven refresh of the device gauges.
//!
//! Every tick spawns an independent cycle that fetches the device list and
//! writes all gauges for every device. Cycles are never joined: a slow fetch
//! does not delay the next tick, so cycles can overlap and the last cycle to
//! finish wins. A failed fetch leaves every gauge untouched.

use std::sync::Arc;

use tokio::{
    sync::oneshot,
    task::JoinHandle,
    time::{Duration, interval},
};
use tokio_stream::{StreamExt as _, wrappers::IntervalStream};
use tracing::{Instrument as _, debug, info, info_span, warn};

use crate::{
    metrics::{GaugeKind, LabelKey, MetricsRegistry},
    nature_remo::{Device, DeviceSource, FetchError, Reading},
};

pub const REFRESH_INTERVAL: Duration = Duration::from_secs(15);

pub struct RefreshEngine<S> {
    source: Arc<S>,
    registry: MetricsRegistry,
    interval: Duration,
}

impl<S: DeviceSource + 'static> RefreshEngine<S> {
    pub fn new(source: S, registry: MetricsRegistry) -> Self {
        Self {
            source: Arc::new(source),
            registry,
            interval: REFRESH_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Ticks until `shutdown` resolves. Dropping the sender also stops the loop.
    ///
    /// The first tick fires immediately. In-flight cycles keep running after
    /// shutdown; they are only no longer scheduled.
    pub async fn run(self, mut shutdown: oneshot::Receiver<()>) {
        let mut ticks = IntervalStream::new(interval(self.interval));

        info!(interval = ?self.interval, "refresh loop started");

        let mut cycle = 0u64;
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                Some(_) = ticks.next() => {
                    cycle += 1;
                    self.spawn_cycle(cycle);
                }
            }
        }

        info!(cycles = cycle, "refresh loop stopped");
    }

    /// Starts one detached refresh cycle.
    pub fn spawn_cycle(&self, cycle: u64) -> JoinHandle<()> {
        let source = Arc::clone(&self.source);
        let registry = self.registry.clone();

        tokio::spawn(
            async move {
                match refresh_once(source.as_ref(), &registry).await {
                    Ok(count) => debug!(devices = count, "refresh cycle finished"),
                    Err(err) => warn!("error while updating metrics: {err}"),
                }
            }
            .instrument(info_span!("refresh_cycle", cycle)),
        )
    }
}

/// One fetch-and-update pass. Returns the number of devices written.
pub async fn refresh_once<S>(source: &S, registry: &MetricsRegistry) -> Result<usize, FetchError>
where
    S: DeviceSource + ?Sized,
{
    let devices = source.fetch_devices().await?;

    record_devices(registry, &devices);

    Ok(devices.len())
}

/// Writes all five gauges for every device. A channel the device does not
/// report is written as 0.
pub fn record_devices(registry: &MetricsRegistry, devices: &[Device]) {
    for device in devices {
        let key = LabelKey::from(device);
        let events = &device.newest_events;
        let val = |reading: Option<Reading>| reading.map_or(0.0, |r| r.val);

        registry.set(GaugeKind::Temperature, &key, val(events.temperature));
        registry.set(GaugeKind::TemperatureOffset, &key, device.temperature_offset);
        registry.set(GaugeKind::Humidity, &key, val(events.humidity));
        // Reads humidity_offset, not temperature_offset as earlier Nature Remo
        // exporters did; pending product-owner confirmation.
        registry.set(GaugeKind::HumidityOffset, &key, device.humidity_offset);
        registry.set(GaugeKind::Illumination, &key, val(events.illumination));
    }
}
