//! Gauge series exported for every Nature Remo device.
//!
//! [`MetricsRegistry`] is cheap to clone and shared between the refresh engine
//! (writer) and the scrape server (reader). Each series entry is an atomic
//! float, so a scrape never observes a partially written value.

use std::sync::Arc;

use prometheus::{GaugeVec, Opts, Registry, TextEncoder};

use crate::nature_remo::Device;

const LABEL_NAMES: [&str; 3] = ["id", "name", "serial_number"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GaugeKind {
    Temperature,
    TemperatureOffset,
    Humidity,
    HumidityOffset,
    Illumination,
}

impl GaugeKind {
    pub const ALL: [GaugeKind; 5] = [
        GaugeKind::Temperature,
        GaugeKind::TemperatureOffset,
        GaugeKind::Humidity,
        GaugeKind::HumidityOffset,
        GaugeKind::Illumination,
    ];

    pub fn metric_name(&self) -> &'static str {
        match self {
            GaugeKind::Temperature => "nature_remo_temperature",
            GaugeKind::TemperatureOffset => "nature_remo_temperature_offset",
            GaugeKind::Humidity => "nature_remo_humidity",
            GaugeKind::HumidityOffset => "nature_remo_humidity_offset",
            GaugeKind::Illumination => "nature_remo_illumination",
        }
    }

    pub fn help(&self) -> &'static str {
        match self {
            GaugeKind::Temperature => "Temperature",
            GaugeKind::TemperatureOffset => "Temperature Offset",
            GaugeKind::Humidity => "Humidity",
            GaugeKind::HumidityOffset => "Humidity Offset",
            GaugeKind::Illumination => "Illumination",
        }
    }
}

/// Identifies one series instance within each gauge.
///
/// A device renamed between refreshes gets a new key; the series under the old
/// key keeps its last value and is never removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LabelKey {
    pub id: String,
    pub name: String,
    pub serial_number: String,
}

impl From<&Device> for LabelKey {
    fn from(device: &Device) -> Self {
        Self {
            id: device.id.clone(),
            name: device.name.clone(),
            serial_number: device.serial_number.clone(),
        }
    }
}

#[derive(Clone)]
pub struct MetricsRegistry {
    inner: Arc<MetricsRegistryInner>,
}

struct MetricsRegistryInner {
    registry: Registry,
    temperature: GaugeVec,
    temperature_offset: GaugeVec,
    humidity: GaugeVec,
    humidity_offset: GaugeVec,
    illumination: GaugeVec,
}

impl MetricsRegistry {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let register = |kind: GaugeKind| -> prometheus::Result<GaugeVec> {
            let gauge = GaugeVec::new(Opts::new(kind.metric_name(), kind.help()), &LABEL_NAMES)?;
            registry.register(Box::new(gauge.clone()))?;
            Ok(gauge)
        };

        let temperature = register(GaugeKind::Temperature)?;
        let temperature_offset = register(GaugeKind::TemperatureOffset)?;
        let humidity = register(GaugeKind::Humidity)?;
        let humidity_offset = register(GaugeKind::HumidityOffset)?;
        let illumination = register(GaugeKind::Illumination)?;

        Ok(Self {
            inner: Arc::new(MetricsRegistryInner {
                registry,
                temperature,
                temperature_offset,
                humidity,
                humidity_offset,
                illumination,
            }),
        })
    }

    /// Creates the series for `key` on first use, overwrites it afterwards.
    pub fn set(&self, kind: GaugeKind, key: &LabelKey, value: f64) {
        self.gauge(kind)
            .with_label_values(&[
                key.id.as_str(),
                key.name.as_str(),
                key.serial_number.as_str(),
            ])
            .set(value);
    }

    /// Renders every known series in the Prometheus text exposition format.
    pub fn render(&self) -> prometheus::Result<String> {
        TextEncoder::new().encode_to_string(&self.inner.registry.gather())
    }

    fn gauge(&self, kind: GaugeKind) -> &GaugeVec {
        match kind {
            GaugeKind::Temperature => &self.inner.temperature,
            GaugeKind::TemperatureOffset => &self.inner.temperature_offset,
            GaugeKind::Humidity => &self.inner.humidity,
            GaugeKind::HumidityOffset => &self.inner.humidity_offset,
            GaugeKind::Illumination => &self.inner.illumination,
        }
    }
}
