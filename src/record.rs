use serde_json::Value;

use crate::{
    continent,
    error::UpdateError,
    geonames::{Client, ResponseCache},
    merge, schema,
};

/// Accepts both storage forms of a geonames id, `123` and `"123"`.
fn geoname_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Reconciles the primary address of a legacy-shape record in place, plus the
/// country sub-record when the response carries country data. The record is
/// only touched once the whole merge has succeeded.
pub fn update_address(
    record: &mut Value,
    client: &Client,
    cache: &mut ResponseCache,
    alt_id: Option<u64>,
) -> Result<(), UpdateError> {
    let address = record
        .pointer("/addresses/0")
        .and_then(Value::as_object)
        .ok_or_else(|| UpdateError::SchemaMismatch("missing addresses[0]".to_string()))?;

    let id = match alt_id {
        Some(id) => id,
        None => address
            .get("geonames_city")
            .and_then(|city| city.get("id"))
            .and_then(geoname_id)
            .ok_or_else(|| {
                UpdateError::SchemaMismatch("missing addresses[0].geonames_city.id".to_string())
            })?,
    };

    let response = cache.fetch(client, id)?;
    let merged = merge::reconcile(&schema::address_mapping(), address, response, address)?;

    let country = match record.pointer("/country").and_then(Value::as_object) {
        Some(country) => {
            let mut country = country.clone();
            continent::update_country(&mut country, response);
            Some(country)
        }
        None => None,
    };

    if let Some(slot) = record.pointer_mut("/addresses/0") {
        *slot = Value::Object(merged);
    }
    if let (Some(country), Some(slot)) = (country, record.pointer_mut("/country")) {
        *slot = Value::Object(country);
    }

    Ok(())
}

/// Reconciles every location of a v2-shape record in place, enriching each
/// location's continent fields. A failure on any location leaves the whole
/// record untouched.
pub fn update_locations(
    record: &mut Value,
    client: &Client,
    cache: &mut ResponseCache,
) -> Result<(), UpdateError> {
    let locations = record
        .get("locations")
        .and_then(Value::as_array)
        .ok_or_else(|| UpdateError::SchemaMismatch("missing locations".to_string()))?;

    let mut merged = Vec::with_capacity(locations.len());
    for (i, location) in locations.iter().enumerate() {
        let location = location
            .as_object()
            .ok_or_else(|| UpdateError::SchemaMismatch(format!("locations[{i}] is not an object")))?;
        let id = location
            .get("geonames_id")
            .and_then(geoname_id)
            .ok_or_else(|| UpdateError::SchemaMismatch(format!("missing locations[{i}].geonames_id")))?;
        let details = location
            .get("geonames_details")
            .and_then(Value::as_object)
            .ok_or_else(|| {
                UpdateError::SchemaMismatch(format!("missing locations[{i}].geonames_details"))
            })?;

        let response = cache.fetch(client, id)?;
        let mut details = merge::reconcile(&schema::location_mapping(), details, response, details)?;
        continent::update_continent(&mut details, response)?;

        let mut location = location.clone();
        location.insert("geonames_details".to_string(), Value::Object(details));
        merged.push(Value::Object(location));
    }

    if let Some(slot) = record.get_mut("locations") {
        *slot = Value::Array(merged);
    }

    Ok(())
}
