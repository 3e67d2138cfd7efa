use crate::domain::Country;

/// Countries assumed to have data until the backend reports its own list,
/// as (alpha-2, alpha-3, name).
pub const DEFAULT_AVAILABLE: [(&str, &str, &str); 40] = [
    ("US", "USA", "United States"),
    ("GB", "GBR", "United Kingdom"),
    ("DE", "DEU", "Germany"),
    ("FR", "FRA", "France"),
    ("IT", "ITA", "Italy"),
    ("ES", "ESP", "Spain"),
    ("CA", "CAN", "Canada"),
    ("AU", "AUS", "Australia"),
    ("JP", "JPN", "Japan"),
    ("KR", "KOR", "South Korea"),
    ("IN", "IND", "India"),
    ("BR", "BRA", "Brazil"),
    ("MX", "MEX", "Mexico"),
    ("RU", "RUS", "Russia"),
    ("CN", "CHN", "China"),
    ("NL", "NLD", "Netherlands"),
    ("SE", "SWE", "Sweden"),
    ("NO", "NOR", "Norway"),
    ("DK", "DNK", "Denmark"),
    ("FI", "FIN", "Finland"),
    ("BE", "BEL", "Belgium"),
    ("CH", "CHE", "Switzerland"),
    ("AT", "AUT", "Austria"),
    ("IE", "IRL", "Ireland"),
    ("PT", "PRT", "Portugal"),
    ("GR", "GRC", "Greece"),
    ("PL", "POL", "Poland"),
    ("CZ", "CZE", "Czech Republic"),
    ("HU", "HUN", "Hungary"),
    ("SK", "SVK", "Slovakia"),
    ("SI", "SVN", "Slovenia"),
    ("HR", "HRV", "Croatia"),
    ("BG", "BGR", "Bulgaria"),
    ("RO", "ROU", "Romania"),
    ("LT", "LTU", "Lithuania"),
    ("LV", "LVA", "Latvia"),
    ("EE", "EST", "Estonia"),
    ("MT", "MLT", "Malta"),
    ("CY", "CYP", "Cyprus"),
    ("LU", "LUX", "Luxembourg"),
];

/// Officially assigned ISO 3166-1 alpha-2 codes.
const ISO_ALPHA2: [&str; 249] = [
    "AD", "AE", "AF", "AG", "AI", "AL", "AM", "AO", "AQ", "AR", "AS", "AT", "AU", "AW", "AX", "AZ",
    "BA", "BB", "BD", "BE", "BF", "BG", "BH", "BI", "BJ", "BL", "BM", "BN", "BO", "BQ", "BR", "BS", "BT", "BV", "BW", "BY", "BZ",
    "CA", "CC", "CD", "CF", "CG", "CH", "CI", "CK", "CL", "CM", "CN", "CO", "CR", "CU", "CV", "CW", "CX", "CY", "CZ",
    "DE", "DJ", "DK", "DM", "DO", "DZ", "EC", "EE", "EG", "EH", "ER", "ES", "ET", "FI", "FJ", "FK", "FM", "FO", "FR",
    "GA", "GB", "GD", "GE", "GF", "GG", "GH", "GI", "GL", "GM", "GN", "GP", "GQ", "GR", "GS", "GT", "GU", "GW", "GY",
    "HK", "HM", "HN", "HR", "HT", "HU", "ID", "IE", "IL", "IM", "IN", "IO", "IQ", "IR", "IS", "IT", "JE", "JM", "JO", "JP",
    "KE", "KG", "KH", "KI", "KM", "KN", "KP", "KR", "KW", "KY", "KZ", "LA", "LB", "LC", "LI", "LK", "LR", "LS", "LT", "LU", "LV", "LY",
    "MA", "MC", "MD", "ME", "MF", "MG", "MH", "MK", "ML", "MM", "MN", "MO", "MP", "MQ", "MR", "MS", "MT", "MU", "MV", "MW", "MX", "MY", "MZ",
    "NA", "NC", "NE", "NF", "NG", "NI", "NL", "NO", "NP", "NR", "NU", "NZ", "OM",
    "PA", "PE", "PF", "PG", "PH", "PK", "PL", "PM", "PN", "PR", "PS", "PT", "PW", "PY", "QA", "RE", "RO", "RS", "RU", "RW",
    "SA", "SB", "SC", "SD", "SE", "SG", "SH", "SI", "SJ", "SK", "SL", "SM", "SN", "SO", "SR", "SS", "ST", "SV", "SX", "SY", "SZ",
    "TC", "TD", "TF", "TG", "TH", "TJ", "TK", "TL", "TM", "TN", "TO", "TR", "TT", "TV", "TW", "TZ", "UA", "UG", "UM", "US", "UY", "UZ",
    "VA", "VC", "VE", "VG", "VI", "VN", "VU", "WF", "WS", "YE", "YT", "ZA", "ZM", "ZW",
];

pub fn default_countries() -> Vec<Country> {
    DEFAULT_AVAILABLE
        .iter()
        .map(|(code, _, name)| Country {
            code: (*code).to_string(),
            name: (*name).to_string(),
        })
        .collect()
}

pub fn default_name(code: &str) -> Option<&'static str> {
    DEFAULT_AVAILABLE
        .iter()
        .find(|(candidate, _, _)| *candidate == code)
        .map(|(_, _, name)| *name)
}

/// Topology files sometimes only carry alpha-3 codes.
pub fn alpha2_from_alpha3(code: &str) -> Option<&'static str> {
    DEFAULT_AVAILABLE
        .iter()
        .find(|(_, alpha3, _)| *alpha3 == code)
        .map(|(alpha2, _, _)| *alpha2)
}

pub fn is_valid_code(code: &str) -> bool {
    code.len() == 2 && code.chars().all(|c| c.is_ascii_uppercase())
}

/// An assigned ISO alpha-2 code, uppercase.
pub fn is_recognized_code(code: &str) -> bool {
    is_valid_code(code) && ISO_ALPHA2.binary_search(&code).is_ok()
}

/// Flag emoji built from regional indicator symbols.
pub fn flag(code: &str) -> String {
    if !is_valid_code(code) {
        return "🌍".to_string();
    }

    code.chars()
        .filter_map(|c| char::from_u32(0x1F1E6 + (c as u32 - 'A' as u32)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_from_codes() {
        assert_eq!(flag("US"), "🇺🇸");
        assert_eq!(flag("GB"), "🇬🇧");
        assert_eq!(flag(""), "🌍");
        assert_eq!(flag("usa"), "🌍");
    }

    #[test]
    fn default_set_has_unique_codes() {
        let mut codes = DEFAULT_AVAILABLE.iter().map(|(c, _, _)| *c).collect::<Vec<_>>();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), DEFAULT_AVAILABLE.len());
        assert_eq!(default_name("JP"), Some("Japan"));
        assert_eq!(default_name("ZZ"), None);
        assert_eq!(alpha2_from_alpha3("FRA"), Some("FR"));
        assert_eq!(alpha2_from_alpha3("ATA"), None);
    }

    #[test]
    fn recognized_codes_are_assigned_iso_codes() {
        assert!(ISO_ALPHA2.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(DEFAULT_AVAILABLE
            .iter()
            .all(|(code, _, _)| is_recognized_code(code)));
        assert!(is_recognized_code("AQ"));
        assert!(!is_recognized_code("ZZ"));
        assert!(!is_recognized_code("XX"));
        assert!(!is_recognized_code("us"));
    }
}
