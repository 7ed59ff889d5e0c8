/// English display name for an ISO 3166 country code, or the code itself
/// when it is not in the table.
pub fn country_name(code: &str) -> &str {
    match code {
        "US" => "United States",
        "CA" => "Canada",
        "MX" => "Mexico",
        "PA" => "Panama",
        "GB" => "United Kingdom",
        "FR" => "France",
        "NL" => "Netherlands",
        "DE" => "Germany",
        "IE" => "Ireland",
        "BE" => "Belgium",
        "LU" => "Luxembourg",
        "CH" => "Switzerland",
        "ES" => "Spain",
        "PT" => "Portugal",
        "IT" => "Italy",
        "GR" => "Greece",
        "HR" => "Croatia",
        "SE" => "Sweden",
        "DK" => "Denmark",
        "FI" => "Finland",
        "NO" => "Norway",
        "AT" => "Austria",
        "CZ" => "Czech Republic",
        "HU" => "Hungary",
        "PL" => "Poland",
        "RO" => "Romania",
        "EE" => "Estonia",
        "LV" => "Latvia",
        "TR" => "Turkey",
        "JP" => "Japan",
        "KR" => "South Korea",
        "HK" => "Hong Kong",
        "TW" => "Taiwan",
        "CN" => "China",
        "SG" => "Singapore",
        "TH" => "Thailand",
        "MY" => "Malaysia",
        "VN" => "Vietnam",
        "PH" => "Philippines",
        "ID" => "Indonesia",
        "KH" => "Cambodia",
        "IN" => "India",
        "AU" => "Australia",
        "NZ" => "New Zealand",
        "AE" => "UAE",
        "QA" => "Qatar",
        "SA" => "Saudi Arabia",
        "IL" => "Israel",
        "ZA" => "South Africa",
        "KE" => "Kenya",
        "NG" => "Nigeria",
        "EG" => "Egypt",
        "MA" => "Morocco",
        "BR" => "Brazil",
        "AR" => "Argentina",
        "CO" => "Colombia",
        "PE" => "Peru",
        "CL" => "Chile",
        "UY" => "Uruguay",
        "CR" => "Costa Rica",
        other => other,
    }
}
