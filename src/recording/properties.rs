//! Typed property serialization into the record stream.
//!
//! Dispatch is by the property's kind tag, matched exhaustively over the
//! seven kinds of [`PropertyValues`]. The snapshot form carries the
//! kind-specific metadata (limits, signedness, enum table) so that later
//! numeric-only records stay decodable; the compact form used inside frames
//! and change records carries only `id` and `val`.

use crate::error::FormatError;
use crate::property::{Property, PropertyValues};

use super::json_writer::JsonWriter;

/// Write one property as a snapshot descriptor: id, kind metadata, values.
///
/// A property with no values is skipped entirely.
pub fn write_snapshot_property(
    writer: &mut JsonWriter,
    prop: &Property,
) -> Result<(), FormatError> {
    if prop.count() == 0 {
        return Ok(());
    }

    writer.begin_object()?;
    writer.key("id")?;
    writer.uint(u64::from(prop.id))?;

    match &prop.values {
        PropertyValues::Float { min, max, .. } => {
            writer.key("limits")?;
            writer.begin_array()?;
            writer.double(*min)?;
            writer.double(*max)?;
            writer.end_array()?;
        }
        PropertyValues::Integer {
            signed, min, max, ..
        } => {
            writer.key("signed")?;
            writer.boolean(*signed)?;
            writer.key("limits")?;
            writer.begin_array()?;
            writer.int(*min)?;
            writer.int(*max)?;
            writer.end_array()?;
        }
        PropertyValues::Enum { table, .. } => {
            writer.key("enum")?;
            writer.begin_object()?;
            for entry in table {
                writer.key(&entry.text)?;
                writer.uint(entry.value)?;
            }
            writer.end_object()?;
        }
        PropertyValues::Bitfield(_)
        | PropertyValues::Bool(_)
        | PropertyValues::Text(_)
        | PropertyValues::Buffer(_) => {}
    }

    write_values(writer, prop)?;
    writer.end_object()?;
    Ok(())
}

/// Write one property in compact form: id and values only.
///
/// Used inside frame `states` lists and standalone change records. A
/// property with no values is skipped entirely.
pub fn write_property(writer: &mut JsonWriter, prop: &Property) -> Result<(), FormatError> {
    if prop.count() == 0 {
        return Ok(());
    }

    writer.begin_object()?;
    writer.key("id")?;
    writer.uint(u64::from(prop.id))?;
    write_values(writer, prop)?;
    writer.end_object()?;
    Ok(())
}

/// Write the `val` member: a scalar for cardinality 1, an ordered array
/// above that.
fn write_values(writer: &mut JsonWriter, prop: &Property) -> Result<(), FormatError> {
    if prop.count() == 0 {
        return Ok(());
    }

    writer.key("val")?;
    let many = prop.count() > 1;
    if many {
        writer.begin_array()?;
    }

    match &prop.values {
        PropertyValues::Bitfield(values) => {
            for value in values {
                writer.uint(*value)?;
            }
        }
        PropertyValues::Bool(values) => {
            for value in values {
                writer.boolean(*value)?;
            }
        }
        PropertyValues::Enum { values, .. } => {
            for value in values {
                writer.uint(*value)?;
            }
        }
        PropertyValues::Float { values, .. } => {
            for value in values {
                writer.double(*value)?;
            }
        }
        PropertyValues::Integer { signed, values, .. } => {
            for value in values {
                if *signed {
                    writer.int(*value)?;
                } else {
                    writer.uint(*value as u64)?;
                }
            }
        }
        PropertyValues::Text(values) | PropertyValues::Buffer(values) => {
            for value in values {
                writer.string(value)?;
            }
        }
    }

    if many {
        writer.end_array()?;
    }
    Ok(())
}
