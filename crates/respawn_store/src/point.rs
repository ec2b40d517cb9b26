use std::str::FromStr;

use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

use crate::document::ConfigDocument;
use crate::errors::StoreError;

/// One of the five fields stored per world, spelled lower-case on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum PointField {
    X,
    Y,
    Z,
    Yaw,
    Pitch,
}

/// Teleport target of a world: position plus orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RespawnPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f32,
    pub pitch: f32,
}

impl RespawnPoint {
    pub fn new(x: f64, y: f64, z: f64, yaw: f32, pitch: f32) -> Self {
        Self {
            x,
            y,
            z,
            yaw,
            pitch,
        }
    }

    /// Text written to disk for `field`.
    ///
    /// Uses `Debug` formatting so whole numbers keep their decimal point (`64.0`).
    pub fn value_of(&self, field: PointField) -> String {
        match field {
            PointField::X => format!("{:?}", self.x),
            PointField::Y => format!("{:?}", self.y),
            PointField::Z => format!("{:?}", self.z),
            PointField::Yaw => format!("{:?}", self.yaw),
            PointField::Pitch => format!("{:?}", self.pitch),
        }
    }

    /// All five `(field, value)` pairs in on-disk order.
    pub fn fields(&self) -> impl Iterator<Item = (PointField, String)> + '_ {
        PointField::iter().map(move |field| (field, self.value_of(field)))
    }

    /// Assembles the point of `world` from a parsed document.
    ///
    /// Returns `Ok(None)` as soon as one field is missing; a partial record
    /// counts as "not configured".
    pub fn from_document(
        document: &ConfigDocument,
        world: &str,
    ) -> Result<Option<Self>, StoreError> {
        let Some(x) = parse_field::<f64>(document, world, PointField::X)? else {
            return Ok(None);
        };
        let Some(y) = parse_field::<f64>(document, world, PointField::Y)? else {
            return Ok(None);
        };
        let Some(z) = parse_field::<f64>(document, world, PointField::Z)? else {
            return Ok(None);
        };
        let Some(yaw) = parse_field::<f32>(document, world, PointField::Yaw)? else {
            return Ok(None);
        };
        let Some(pitch) = parse_field::<f32>(document, world, PointField::Pitch)? else {
            return Ok(None);
        };

        Ok(Some(Self::new(x, y, z, yaw, pitch)))
    }
}

fn parse_field<T: FromStr>(
    document: &ConfigDocument,
    world: &str,
    field: PointField,
) -> Result<Option<T>, StoreError> {
    let Some(raw) = document.get(world, field) else {
        return Ok(None);
    };

    raw.parse::<T>()
        .map(Some)
        .map_err(|_| StoreError::InvalidField {
            world: world.to_string(),
            field,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_are_lowercase() {
        let fields: Vec<PointField> = PointField::iter().collect();
        let names: Vec<&str> = fields.iter().map(|f| f.as_ref()).collect();
        assert_eq!(names, ["x", "y", "z", "yaw", "pitch"]);
        assert_eq!(PointField::from_str("pitch").unwrap(), PointField::Pitch);
        assert!(PointField::from_str("roll").is_err());
    }

    #[test]
    fn whole_numbers_keep_decimal_point() {
        let point = RespawnPoint::new(12.5, 64.0, -3.25, 90.0, 0.0);
        let values: Vec<String> = point.fields().map(|(_, v)| v).collect();
        assert_eq!(values, ["12.5", "64.0", "-3.25", "90.0", "0.0"]);
    }

    #[test]
    fn partial_record_is_not_configured() {
        let doc = ConfigDocument::parse("world.location.x: 1.0\nworld.location.y: 2.0\n");
        assert_eq!(RespawnPoint::from_document(&doc, "world").unwrap(), None);
    }

    #[test]
    fn non_numeric_field_is_reported() {
        let doc = ConfigDocument::parse(
            "w.location.x: 1\nw.location.y: up\nw.location.z: 3\nw.location.yaw: 0\nw.location.pitch: 0\n",
        );
        let err = RespawnPoint::from_document(&doc, "w").unwrap_err();
        match err {
            StoreError::InvalidField { world, field, value } => {
                assert_eq!(world, "w");
                assert_eq!(field, PointField::Y);
                assert_eq!(value, "up");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
