use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

// Ref: https://swagger.nature.global/#/default/get_1_devices
// Missing or null fields decode to their zero value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Device {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(deserialize_with = "null_as_default")]
    pub temperature_offset: f64,

    #[serde(deserialize_with = "null_as_default")]
    pub humidity_offset: f64,

    pub created_at: Option<DateTime<Utc>>,

    pub updated_at: Option<DateTime<Utc>>,

    #[serde(deserialize_with = "null_as_default")]
    pub firmware_version: String,

    #[serde(deserialize_with = "null_as_default")]
    pub mac_address: String,

    #[serde(deserialize_with = "null_as_default")]
    pub serial_number: String,

    #[serde(deserialize_with = "null_as_default")]
    pub newest_events: NewestEvents,
}

/// Latest value of each sensor channel. Models without a sensor omit the channel.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NewestEvents {
    #[serde(rename = "te")]
    pub temperature: Option<Reading>,

    #[serde(rename = "hu")]
    pub humidity: Option<Reading>,

    #[serde(rename = "il")]
    pub illumination: Option<Reading>,

    #[serde(rename = "mo")]
    pub movement: Option<Reading>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Reading {
    #[serde(deserialize_with = "null_as_default")]
    pub val: f64,

    pub created_at: Option<DateTime<Utc>>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;

    const DEVICES_RESPONSE: &str = r#"[
      {
        "name": "Living Room",
        "id": "b9b3b1a0-1d6a-4a1c-9c0e-3f1f7d0f2a11",
        "created_at": "2019-05-01T10:00:00Z",
        "updated_at": "2024-01-12T08:30:00Z",
        "mac_address": "a0:b1:c2:d3:e4:f5",
        "serial_number": "1W320110000001",
        "firmware_version": "Remo/1.14.6",
        "temperature_offset": -0.5,
        "humidity_offset": 3,
        "users": [],
        "newest_events": {
          "te": { "val": 22.4, "created_at": "2024-01-12T08:29:10Z" },
          "hu": { "val": 41, "created_at": "2024-01-12T08:25:02Z" },
          "il": { "val": 118.5, "created_at": "2024-01-12T08:28:44Z" },
          "mo": { "val": 1, "created_at": "2024-01-12T07:58:12Z" }
        }
      },
      {
        "name": "Bedroom",
        "id": "4c5d1e2f-0000-4bbb-8ccc-123456789abc",
        "serial_number": "2W420120000002",
        "temperature_offset": 0,
        "humidity_offset": 0,
        "newest_events": {
          "te": { "val": 19.1, "created_at": "2024-01-12T08:27:00Z" }
        }
      }
    ]"#;

    #[test]
    fn decode_devices() {
        let devices: Vec<Device> = serde_json::from_str(DEVICES_RESPONSE).unwrap();

        assert_eq!(devices.len(), 2);

        let living = &devices[0];
        assert_eq!(living.id, "b9b3b1a0-1d6a-4a1c-9c0e-3f1f7d0f2a11");
        assert_eq!(living.name, "Living Room");
        assert_eq!(living.serial_number, "1W320110000001");
        assert_eq!(living.mac_address, "a0:b1:c2:d3:e4:f5");
        assert_eq!(living.firmware_version, "Remo/1.14.6");
        assert_eq!(living.temperature_offset, -0.5);
        assert_eq!(living.humidity_offset, 3.0);
        assert_eq!(
            living.created_at,
            Some(Utc.with_ymd_and_hms(2019, 5, 1, 10, 0, 0).unwrap())
        );

        let te = living.newest_events.temperature.unwrap();
        assert_eq!(te.val, 22.4);
        assert_eq!(
            te.created_at,
            Some(Utc.with_ymd_and_hms(2024, 1, 12, 8, 29, 10).unwrap())
        );
        assert_eq!(living.newest_events.humidity.unwrap().val, 41.0);
        assert_eq!(living.newest_events.illumination.unwrap().val, 118.5);
        assert_eq!(living.newest_events.movement.unwrap().val, 1.0);
    }

    #[test]
    fn decode_device_without_some_sensors() {
        let devices: Vec<Device> = serde_json::from_str(DEVICES_RESPONSE).unwrap();

        let bedroom = &devices[1];
        assert_eq!(bedroom.created_at, None);
        assert_eq!(bedroom.mac_address, "");
        assert_eq!(bedroom.newest_events.temperature.unwrap().val, 19.1);
        assert!(bedroom.newest_events.humidity.is_none());
        assert!(bedroom.newest_events.illumination.is_none());
        assert!(bedroom.newest_events.movement.is_none());
    }

    #[test]
    fn decode_reading_without_timestamp() {
        let reading: Reading = serde_json::from_str(r#"{"val": 21.3}"#).unwrap();

        assert_eq!(reading.val, 21.3);
        assert_eq!(reading.created_at, None);
    }

    #[test]
    fn reject_non_array_body() {
        let result: Result<Vec<Device>, _> =
            serde_json::from_str(r#"{"code": 401001, "message": "Unauthorized"}"#);

        assert!(result.is_err());
    }

    #[test]
    fn reading_without_value_is_zero() {
        let reading: Reading =
            serde_json::from_str(r#"{"created_at": "2024-01-12T08:29:10Z"}"#).unwrap();

        assert_eq!(reading.val, 0.0);
        assert!(reading.created_at.is_some());
    }

    #[test]
    fn null_newest_events_is_empty() {
        let devices: Vec<Device> =
            serde_json::from_str(r#"[{"id": "d1", "newest_events": null}]"#).unwrap();

        assert_eq!(devices[0].id, "d1");
        assert_eq!(devices[0].newest_events, NewestEvents::default());
    }

    #[test]
    fn null_scalar_fields_are_zero_values() {
        let devices: Vec<Device> = serde_json::from_str(
            r#"[{
              "id": "d1",
              "name": null,
              "serial_number": null,
              "temperature_offset": null,
              "newest_events": { "te": { "val": null }, "hu": null }
            }]"#,
        )
        .unwrap();

        let device = &devices[0];
        assert_eq!(device.name, "");
        assert_eq!(device.serial_number, "");
        assert_eq!(device.temperature_offset, 0.0);
        assert_eq!(device.newest_events.temperature.unwrap().val, 0.0);
        assert!(device.newest_events.humidity.is_none());
    }

    #[test]
    fn sparse_device_does_not_fail_the_list() {
        let devices: Vec<Device> = serde_json::from_str(
            r#"[
              {"id": "d1", "name": "Room", "serial_number": "S1",
               "newest_events": {"te": {"val": 21.3}}},
              {"id": "d2", "name": null, "newest_events": {"mo": {"created_at": "2024-01-12T07:58:12Z"}}}
            ]"#,
        )
        .unwrap();

        assert_eq!(devices.len(), 2);
        assert_eq!(devices[1].newest_events.movement.unwrap().val, 0.0);
    }
}
