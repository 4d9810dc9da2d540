use serde_json::Value;

use crate::error::UpdateError;

/// Conversion applied to a remote value when it overwrites a local field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Coercion {
    Integer,
    /// Float when the value carries a decimal point, integer otherwise.
    Coordinate,
    Identity,
}

/// Fixed dispatch table keyed by target field name.
pub fn policy(field: &str) -> Coercion {
    match field {
        "lat" | "lng" => Coercion::Coordinate,
        "id" | "country_geonames_id" => Coercion::Integer,
        _ => Coercion::Identity,
    }
}

pub fn apply(field: &str, value: &str) -> Result<Value, UpdateError> {
    let invalid = || UpdateError::Coercion {
        field: field.to_string(),
        value: value.to_string(),
    };

    Ok(match policy(field) {
        Coercion::Integer => Value::from(value.parse::<i64>().map_err(|_| invalid())?),
        Coercion::Coordinate => {
            if value.contains('.') {
                Value::from(value.parse::<f64>().map_err(|_| invalid())?)
            } else {
                Value::from(value.parse::<i64>().map_err(|_| invalid())?)
            }
        }
        Coercion::Identity => Value::from(value),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn policy_table() {
        assert_eq!(policy("lat"), Coercion::Coordinate);
        assert_eq!(policy("lng"), Coercion::Coordinate);
        assert_eq!(policy("id"), Coercion::Integer);
        assert_eq!(policy("country_geonames_id"), Coercion::Integer);
        assert_eq!(policy("city"), Coercion::Identity);
        assert_eq!(policy("country_subdivision_code"), Coercion::Identity);
    }

    #[test]
    fn coordinates_follow_the_decimal_point() {
        assert_eq!(apply("lat", "34").unwrap(), json!(34));
        assert_eq!(apply("lat", "34.05").unwrap(), json!(34.05));
        assert_eq!(apply("lng", "-118.24").unwrap(), json!(-118.24));
    }

    #[test]
    fn identifiers_are_always_integers() {
        assert_eq!(apply("id", "5368361").unwrap(), json!(5368361));
        assert_eq!(apply("country_geonames_id", "6252001").unwrap(), json!(6252001));
    }

    #[test]
    fn everything_else_stays_a_string() {
        assert_eq!(apply("city", "Los Angeles").unwrap(), json!("Los Angeles"));
        // even when it happens to look numeric
        assert_eq!(apply("code", "90001").unwrap(), json!("90001"));
    }

    #[test]
    fn non_numeric_input_is_an_error() {
        let err = apply("lat", "abc").unwrap_err();
        assert!(matches!(
            err,
            UpdateError::Coercion { ref field, ref value } if field == "lat" && value == "abc"
        ));
        assert!(apply("id", "12a").is_err());
    }
}
