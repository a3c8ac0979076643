//! Country Catalog
//!
//! Static ISO 3166-1 registry: short English name and alpha-3 code for every
//! assigned country. Names follow the ISO short-name style, so e.g. Bolivia
//! is listed as "Bolivia, Plurinational State of".

/// One catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryEntry {
    pub name: &'static str,
    pub alpha3: &'static str,
}

const fn entry(alpha3: &'static str, name: &'static str) -> CountryEntry {
    CountryEntry { name, alpha3 }
}

/// Every ISO 3166-1 country, ordered by alpha-3 code.
pub static COUNTRIES: &[CountryEntry] = &[
    entry("ABW", "Aruba"),
    entry("AFG", "Afghanistan"),
    entry("AGO", "Angola"),
    entry("AIA", "Anguilla"),
    entry("ALA", "Åland Islands"),
    entry("ALB", "Albania"),
    entry("AND", "Andorra"),
    entry("ARE", "United Arab Emirates"),
    entry("ARG", "Argentina"),
    entry("ARM", "Armenia"),
    entry("ASM", "American Samoa"),
    entry("ATA", "Antarctica"),
    entry("ATF", "French Southern Territories"),
    entry("ATG", "Antigua and Barbuda"),
    entry("AUS", "Australia"),
    entry("AUT", "Austria"),
    entry("AZE", "Azerbaijan"),
    entry("BDI", "Burundi"),
    entry("BEL", "Belgium"),
    entry("BEN", "Benin"),
    entry("BES", "Bonaire, Sint Eustatius and Saba"),
    entry("BFA", "Burkina Faso"),
    entry("BGD", "Bangladesh"),
    entry("BGR", "Bulgaria"),
    entry("BHR", "Bahrain"),
    entry("BHS", "Bahamas"),
    entry("BIH", "Bosnia and Herzegovina"),
    entry("BLM", "Saint Barthélemy"),
    entry("BLR", "Belarus"),
    entry("BLZ", "Belize"),
    entry("BMU", "Bermuda"),
    entry("BOL", "Bolivia, Plurinational State of"),
    entry("BRA", "Brazil"),
    entry("BRB", "Barbados"),
    entry("BRN", "Brunei Darussalam"),
    entry("BTN", "Bhutan"),
    entry("BVT", "Bouvet Island"),
    entry("BWA", "Botswana"),
    entry("CAF", "Central African Republic"),
    entry("CAN", "Canada"),
    entry("CCK", "Cocos (Keeling) Islands"),
    entry("CHE", "Switzerland"),
    entry("CHL", "Chile"),
    entry("CHN", "China"),
    entry("CIV", "Côte d'Ivoire"),
    entry("CMR", "Cameroon"),
    entry("COD", "Congo, The Democratic Republic of the"),
    entry("COG", "Congo"),
    entry("COK", "Cook Islands"),
    entry("COL", "Colombia"),
    entry("COM", "Comoros"),
    entry("CPV", "Cabo Verde"),
    entry("CRI", "Costa Rica"),
    entry("CUB", "Cuba"),
    entry("CUW", "Curaçao"),
    entry("CXR", "Christmas Island"),
    entry("CYM", "Cayman Islands"),
    entry("CYP", "Cyprus"),
    entry("CZE", "Czechia"),
    entry("DEU", "Germany"),
    entry("DJI", "Djibouti"),
    entry("DMA", "Dominica"),
    entry("DNK", "Denmark"),
    entry("DOM", "Dominican Republic"),
    entry("DZA", "Algeria"),
    entry("ECU", "Ecuador"),
    entry("EGY", "Egypt"),
    entry("ERI", "Eritrea"),
    entry("ESH", "Western Sahara"),
    entry("ESP", "Spain"),
    entry("EST", "Estonia"),
    entry("ETH", "Ethiopia"),
    entry("FIN", "Finland"),
    entry("FJI", "Fiji"),
    entry("FLK", "Falkland Islands (Malvinas)"),
    entry("FRA", "France"),
    entry("FRO", "Faroe Islands"),
    entry("FSM", "Micronesia, Federated States of"),
    entry("GAB", "Gabon"),
    entry("GBR", "United Kingdom"),
    entry("GEO", "Georgia"),
    entry("GGY", "Guernsey"),
    entry("GHA", "Ghana"),
    entry("GIB", "Gibraltar"),
    entry("GIN", "Guinea"),
    entry("GLP", "Guadeloupe"),
    entry("GMB", "Gambia"),
    entry("GNB", "Guinea-Bissau"),
    entry("GNQ", "Equatorial Guinea"),
    entry("GRC", "Greece"),
    entry("GRD", "Grenada"),
    entry("GRL", "Greenland"),
    entry("GTM", "Guatemala"),
    entry("GUF", "French Guiana"),
    entry("GUM", "Guam"),
    entry("GUY", "Guyana"),
    entry("HKG", "Hong Kong"),
    entry("HMD", "Heard Island and McDonald Islands"),
    entry("HND", "Honduras"),
    entry("HRV", "Croatia"),
    entry("HTI", "Haiti"),
    entry("HUN", "Hungary"),
    entry("IDN", "Indonesia"),
    entry("IMN", "Isle of Man"),
    entry("IND", "India"),
    entry("IOT", "British Indian Ocean Territory"),
    entry("IRL", "Ireland"),
    entry("IRN", "Iran, Islamic Republic of"),
    entry("IRQ", "Iraq"),
    entry("ISL", "Iceland"),
    entry("ISR", "Israel"),
    entry("ITA", "Italy"),
    entry("JAM", "Jamaica"),
    entry("JEY", "Jersey"),
    entry("JOR", "Jordan"),
    entry("JPN", "Japan"),
    entry("KAZ", "Kazakhstan"),
    entry("KEN", "Kenya"),
    entry("KGZ", "Kyrgyzstan"),
    entry("KHM", "Cambodia"),
    entry("KIR", "Kiribati"),
    entry("KNA", "Saint Kitts and Nevis"),
    entry("KOR", "Korea, Republic of"),
    entry("KWT", "Kuwait"),
    entry("LAO", "Lao People's Democratic Republic"),
    entry("LBN", "Lebanon"),
    entry("LBR", "Liberia"),
    entry("LBY", "Libya"),
    entry("LCA", "Saint Lucia"),
    entry("LIE", "Liechtenstein"),
    entry("LKA", "Sri Lanka"),
    entry("LSO", "Lesotho"),
    entry("LTU", "Lithuania"),
    entry("LUX", "Luxembourg"),
    entry("LVA", "Latvia"),
    entry("MAC", "Macao"),
    entry("MAF", "Saint Martin (French part)"),
    entry("MAR", "Morocco"),
    entry("MCO", "Monaco"),
    entry("MDA", "Moldova, Republic of"),
    entry("MDG", "Madagascar"),
    entry("MDV", "Maldives"),
    entry("MEX", "Mexico"),
    entry("MHL", "Marshall Islands"),
    entry("MKD", "North Macedonia"),
    entry("MLI", "Mali"),
    entry("MLT", "Malta"),
    entry("MMR", "Myanmar"),
    entry("MNE", "Montenegro"),
    entry("MNG", "Mongolia"),
    entry("MNP", "Northern Mariana Islands"),
    entry("MOZ", "Mozambique"),
    entry("MRT", "Mauritania"),
    entry("MSR", "Montserrat"),
    entry("MTQ", "Martinique"),
    entry("MUS", "Mauritius"),
    entry("MWI", "Malawi"),
    entry("MYS", "Malaysia"),
    entry("MYT", "Mayotte"),
    entry("NAM", "Namibia"),
    entry("NCL", "New Caledonia"),
    entry("NER", "Niger"),
    entry("NFK", "Norfolk Island"),
    entry("NGA", "Nigeria"),
    entry("NIC", "Nicaragua"),
    entry("NIU", "Niue"),
    entry("NLD", "Netherlands"),
    entry("NOR", "Norway"),
    entry("NPL", "Nepal"),
    entry("NRU", "Nauru"),
    entry("NZL", "New Zealand"),
    entry("OMN", "Oman"),
    entry("PAK", "Pakistan"),
    entry("PAN", "Panama"),
    entry("PCN", "Pitcairn"),
    entry("PER", "Peru"),
    entry("PHL", "Philippines"),
    entry("PLW", "Palau"),
    entry("PNG", "Papua New Guinea"),
    entry("POL", "Poland"),
    entry("PRI", "Puerto Rico"),
    entry("PRK", "Korea, Democratic People's Republic of"),
    entry("PRT", "Portugal"),
    entry("PRY", "Paraguay"),
    entry("PSE", "Palestine, State of"),
    entry("PYF", "French Polynesia"),
    entry("QAT", "Qatar"),
    entry("REU", "Réunion"),
    entry("ROU", "Romania"),
    entry("RUS", "Russian Federation"),
    entry("RWA", "Rwanda"),
    entry("SAU", "Saudi Arabia"),
    entry("SDN", "Sudan"),
    entry("SEN", "Senegal"),
    entry("SGP", "Singapore"),
    entry("SGS", "South Georgia and the South Sandwich Islands"),
    entry("SHN", "Saint Helena, Ascension and Tristan da Cunha"),
    entry("SJM", "Svalbard and Jan Mayen"),
    entry("SLB", "Solomon Islands"),
    entry("SLE", "Sierra Leone"),
    entry("SLV", "El Salvador"),
    entry("SMR", "San Marino"),
    entry("SOM", "Somalia"),
    entry("SPM", "Saint Pierre and Miquelon"),
    entry("SRB", "Serbia"),
    entry("SSD", "South Sudan"),
    entry("STP", "Sao Tome and Principe"),
    entry("SUR", "Suriname"),
    entry("SVK", "Slovakia"),
    entry("SVN", "Slovenia"),
    entry("SWE", "Sweden"),
    entry("SWZ", "Eswatini"),
    entry("SXM", "Sint Maarten (Dutch part)"),
    entry("SYC", "Seychelles"),
    entry("SYR", "Syrian Arab Republic"),
    entry("TCA", "Turks and Caicos Islands"),
    entry("TCD", "Chad"),
    entry("TGO", "Togo"),
    entry("THA", "Thailand"),
    entry("TJK", "Tajikistan"),
    entry("TKL", "Tokelau"),
    entry("TKM", "Turkmenistan"),
    entry("TLS", "Timor-Leste"),
    entry("TON", "Tonga"),
    entry("TTO", "Trinidad and Tobago"),
    entry("TUN", "Tunisia"),
    entry("TUR", "Türkiye"),
    entry("TUV", "Tuvalu"),
    entry("TWN", "Taiwan, Province of China"),
    entry("TZA", "Tanzania, United Republic of"),
    entry("UGA", "Uganda"),
    entry("UKR", "Ukraine"),
    entry("UMI", "United States Minor Outlying Islands"),
    entry("URY", "Uruguay"),
    entry("USA", "United States"),
    entry("UZB", "Uzbekistan"),
    entry("VAT", "Holy See (Vatican City State)"),
    entry("VCT", "Saint Vincent and the Grenadines"),
    entry("VEN", "Venezuela, Bolivarian Republic of"),
    entry("VGB", "Virgin Islands, British"),
    entry("VIR", "Virgin Islands, U.S."),
    entry("VNM", "Viet Nam"),
    entry("VUT", "Vanuatu"),
    entry("WLF", "Wallis and Futuna"),
    entry("WSM", "Samoa"),
    entry("YEM", "Yemen"),
    entry("ZAF", "South Africa"),
    entry("ZMB", "Zambia"),
    entry("ZWE", "Zimbabwe"),
];

/// Look up a catalog entry by alpha-3 code, case-insensitively.
pub fn by_alpha3(code: &str) -> Option<&'static CountryEntry> {
    COUNTRIES
        .iter()
        .find(|c| c.alpha3.eq_ignore_ascii_case(code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_size() {
        assert_eq!(COUNTRIES.len(), 249);
    }

    #[test]
    fn test_alpha3_codes_unique_and_well_formed() {
        let mut seen = HashSet::new();
        for c in COUNTRIES {
            assert_eq!(c.alpha3.len(), 3, "{}", c.alpha3);
            assert!(c.alpha3.chars().all(|ch| ch.is_ascii_uppercase()));
            assert!(seen.insert(c.alpha3), "duplicate {}", c.alpha3);
        }
    }

    #[test]
    fn test_by_alpha3() {
        assert_eq!(by_alpha3("FRA").map(|c| c.name), Some("France"));
        assert_eq!(by_alpha3("deu").map(|c| c.name), Some("Germany"));
        assert!(by_alpha3("XXX").is_none());
    }
}
