//! Field-parsing helpers shared by the PDU variants.

use crate::error::ProtocolError;

/// Errors out with [`ProtocolError::TooFewFields`] unless `$fields` has at
/// least `$min` entries.
macro_rules! require_fields {
    ($fields:expr, $min:expr) => {
        if $fields.len() < $min {
            return Err(ProtocolError::TooFewFields {
                expected: $min,
                found: $fields.len(),
            });
        }
    };
}
pub(crate) use require_fields;

pub(crate) fn parse_field<T: std::str::FromStr>(
    fields: &[&str],
    index: usize,
    name: &'static str,
) -> Result<T, ProtocolError> {
    fields
        .get(index)
        .ok_or(ProtocolError::TooFewFields {
            expected: index + 1,
            found: fields.len(),
        })?
        .parse()
        .map_err(|_| ProtocolError::InvalidField {
            field: name,
            value: fields.get(index).unwrap_or(&"").to_string(),
        })
}

/// Parses an optional trailing field: `None` if the index is past the end
/// of `fields` (the PDU field-count tolerance rule, §8), `Some(Err(..))` if
/// present but malformed.
pub(crate) fn parse_optional_field<T: std::str::FromStr>(
    fields: &[&str],
    index: usize,
    name: &'static str,
) -> Result<Option<T>, ProtocolError> {
    match fields.get(index) {
        None => Ok(None),
        Some(raw) if raw.is_empty() => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ProtocolError::InvalidField {
                field: name,
                value: raw.to_string(),
            }),
    }
}

/// Strips `:` from free text bound for the wire (§6 framing rule: "a literal
/// `:` inside a text body is prohibited and must be filtered on send").
pub(crate) fn sanitize_text_body(body: &str) -> String {
    body.replace(':', ";")
}
