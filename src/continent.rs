use serde_json::{Map, Value};

use crate::error::UpdateError;

/// The seven continent codes geonames uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Continent {
    Africa,
    Antarctica,
    Asia,
    Europe,
    NorthAmerica,
    Oceania,
    SouthAmerica,
}

impl Continent {
    pub fn from_code(code: &str) -> Result<Self, UpdateError> {
        Ok(match code {
            "AF" => Self::Africa,
            "AN" => Self::Antarctica,
            "AS" => Self::Asia,
            "EU" => Self::Europe,
            "NA" => Self::NorthAmerica,
            "OC" => Self::Oceania,
            "SA" => Self::SouthAmerica,
            _ => return Err(UpdateError::UnknownContinentCode(code.to_string())),
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Africa => "Africa",
            Self::Antarctica => "Antarctica",
            Self::Asia => "Asia",
            Self::Europe => "Europe",
            Self::NorthAmerica => "North America",
            Self::Oceania => "Oceania",
            Self::SouthAmerica => "South America",
        }
    }
}

fn text<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    match map.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
        _ => None,
    }
}

/// Legacy country sub-record: follow the response's country code, and correct
/// name-only drift when the code already matches.
pub fn update_country(country: &mut Map<String, Value>, response: &Map<String, Value>) {
    let (Some(code), Some(name)) = (text(response, "countryCode"), text(response, "countryName"))
    else {
        return;
    };

    if country.get("country_code").and_then(Value::as_str) != Some(code) {
        country.insert("country_code".to_string(), Value::from(code));
        country.insert("country_name".to_string(), Value::from(name));
    } else if country.get("country_name").and_then(Value::as_str) != Some(name) {
        country.insert("country_name".to_string(), Value::from(name));
    }
}

/// v2 details: derive the continent name from the response's continent code.
/// An unrecognized code is an error, never a silent default.
pub fn update_continent(
    details: &mut Map<String, Value>,
    response: &Map<String, Value>,
) -> Result<(), UpdateError> {
    let Some(code) = text(response, "continentCode") else {
        details.insert("continent_code".to_string(), Value::Null);
        details.insert("continent_name".to_string(), Value::Null);
        return Ok(());
    };

    let continent = Continent::from_code(code)?;
    details.insert("continent_code".to_string(), Value::from(code));
    details.insert("continent_name".to_string(), Value::from(continent.name()));
    Ok(())
}
