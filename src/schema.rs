use Mapping::*;

/// How one field of the local record corresponds to the geonames response.
/// The shape is fixed at definition time; traversal only ever reads it.
#[derive(Debug)]
pub enum Mapping {
    /// Copy `response[key]` when present and non-empty.
    Direct(&'static str),
    /// Join `response[key]` for every key with `.`; undefined if any is absent.
    Composite(&'static [&'static str]),
    /// Two-level lookup `response[outer][inner]`.
    Indexed(&'static str, &'static str),
    /// Locally authoritative; the response never carries this field.
    NoSource,
    /// A nested object mirrored by a sub-schema.
    Nested(Vec<(&'static str, Mapping)>),
}

/// Legacy shape: the primary address of `record.addresses[0]`.
pub fn address_mapping() -> Mapping {
    Nested(vec![
        ("lat", Direct("lat")),
        ("lng", Direct("lng")),
        ("state", NoSource),
        ("state_code", NoSource),
        ("country_geonames_id", Direct("countryId")),
        ("city", Direct("name")),
        (
            "geonames_city",
            Nested(vec![
                ("id", Direct("geonameId")),
                ("city", Direct("name")),
                (
                    "geonames_admin1",
                    Nested(vec![
                        ("name", Direct("adminName1")),
                        ("ascii_name", Direct("adminName1")),
                        ("id", Direct("adminId1")),
                        ("code", Composite(&["countryCode", "adminCode1"])),
                    ]),
                ),
                (
                    "geonames_admin2",
                    Nested(vec![
                        ("name", Direct("adminName2")),
                        ("id", Direct("adminId2")),
                        ("ascii_name", Direct("adminName2")),
                        (
                            "code",
                            Composite(&["countryCode", "adminCode1", "adminCode2"]),
                        ),
                    ]),
                ),
                // NUTS levels are maintained by curators, not geonames
                (
                    "nuts_level1",
                    Nested(vec![("name", NoSource), ("code", NoSource)]),
                ),
                (
                    "nuts_level2",
                    Nested(vec![("name", NoSource), ("code", NoSource)]),
                ),
                (
                    "nuts_level3",
                    Nested(vec![("name", NoSource), ("code", NoSource)]),
                ),
            ]),
        ),
    ])
}

/// v2 shape: the `geonames_details` object of one location. The continent
/// name is derived from the code afterwards, not taken from the response.
pub fn location_mapping() -> Mapping {
    Nested(vec![
        ("continent_code", Direct("continentCode")),
        ("continent_name", NoSource),
        ("country_code", Direct("countryCode")),
        ("country_name", Direct("countryName")),
        (
            "country_subdivision_code",
            Indexed("adminCodes1", "ISO3166_2"),
        ),
        ("country_subdivision_name", Direct("adminName1")),
        ("lat", Direct("lat")),
        ("lng", Direct("lng")),
        ("name", Direct("name")),
    ])
}
