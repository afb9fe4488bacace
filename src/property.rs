//! Device property model.
//!
//! Properties are the typed configuration and telemetry values a sensor
//! exposes: bit masks, booleans, enumerations, floats, integers, free text
//! and opaque buffers. The kind tag and the per-kind metadata (limits,
//! signedness, enum text table) travel with the values so a record can be
//! decoded without consulting the device again.
//!
//! The seven kinds form a sealed enum and every serialization site matches
//! it exhaustively; adding a kind is a compile error until each site is
//! extended.

/// One entry of an enum property's text table.
///
/// The table is recorded once, in the snapshot line; frames and change
/// records then carry only the numeric value.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumEntry {
    /// Display text for the value
    pub text: String,
    /// Numeric wire value
    pub value: u64,
}

impl EnumEntry {
    pub fn new(text: impl Into<String>, value: u64) -> Self {
        EnumEntry {
            text: text.into(),
            value,
        }
    }
}

/// Value storage for a property, tagged by kind.
///
/// Cardinality is the length of the value vector: 0 means the property is
/// currently absent and is omitted from every record, 1 is serialized as a
/// scalar, and anything larger as an ordered array.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValues {
    /// Bit masks, serialized as unsigned 64-bit integers
    Bitfield(Vec<u64>),
    /// Plain booleans
    Bool(Vec<bool>),
    /// Enumerated values; serialized in numeric form, with the text table
    /// recorded once in the snapshot
    Enum {
        table: Vec<EnumEntry>,
        values: Vec<u64>,
    },
    /// Double-precision values with `[min, max]` limits recorded in the
    /// snapshot
    Float {
        min: f64,
        max: f64,
        values: Vec<f64>,
    },
    /// 64-bit integers; `signed` selects the serialized representation and
    /// is recorded in the snapshot together with the limits
    Integer {
        signed: bool,
        min: i64,
        max: i64,
        values: Vec<i64>,
    },
    /// Free-form text
    Text(Vec<String>),
    /// Opaque buffer contents, carried as strings
    Buffer(Vec<String>),
}

/// A typed device property.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Stable numeric identifier, unique per device
    pub id: u32,
    /// Kind tag, values, and kind-specific metadata
    pub values: PropertyValues,
}

impl Property {
    pub fn new(id: u32, values: PropertyValues) -> Self {
        Property { id, values }
    }

    /// Number of stored values.
    ///
    /// A count of 0 means the property is absent; it is skipped by the
    /// snapshot and never produces a change record.
    pub fn count(&self) -> usize {
        match &self.values {
            PropertyValues::Bitfield(v) => v.len(),
            PropertyValues::Bool(v) => v.len(),
            PropertyValues::Enum { values, .. } => values.len(),
            PropertyValues::Float { values, .. } => values.len(),
            PropertyValues::Integer { values, .. } => values.len(),
            PropertyValues::Text(v) => v.len(),
            PropertyValues::Buffer(v) => v.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_per_kind() {
        let cases = [
            (Property::new(1, PropertyValues::Bitfield(vec![])), 0),
            (Property::new(2, PropertyValues::Bool(vec![true])), 1),
            (
                Property::new(
                    3,
                    PropertyValues::Enum {
                        table: vec![EnumEntry::new("off", 0), EnumEntry::new("on", 1)],
                        values: vec![1, 0, 1],
                    },
                ),
                3,
            ),
            (
                Property::new(
                    4,
                    PropertyValues::Float {
                        min: 0.0,
                        max: 1.0,
                        values: vec![0.5, 0.25],
                    },
                ),
                2,
            ),
            (
                Property::new(
                    5,
                    PropertyValues::Integer {
                        signed: true,
                        min: -10,
                        max: 10,
                        values: vec![-3],
                    },
                ),
                1,
            ),
            (
                Property::new(6, PropertyValues::Text(vec!["a".into(), "b".into()])),
                2,
            ),
            (Property::new(7, PropertyValues::Buffer(vec![])), 0),
        ];

        for (prop, expected) in cases {
            assert_eq!(prop.count(), expected, "id {}", prop.id);
        }
    }
}
