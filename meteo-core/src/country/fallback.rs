//! Local country-name table, used when the country service is unreachable
//! or returns no name. Covers the codes the weather provider commonly
//! reports; an unknown code or language simply yields `None` and the
//! station keeps its bare code.

/// Look up a display name for `(code, lang)`. The language hint defaults to
/// French, like the rest of the pipeline; region subtags ("fr-CH") are
/// reduced to their primary subtag.
pub fn display_name(alpha2: &str, lang: Option<&str>) -> Option<&'static str> {
    let code = alpha2.trim().to_uppercase();
    let lang = lang
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or("fr")
        .to_lowercase();
    let primary = lang.split(['-', '_']).next().unwrap_or("");

    match primary {
        "fr" => french(&code),
        "en" => english(&code),
        _ => None,
    }
}

fn french(code: &str) -> Option<&'static str> {
    let name = match code {
        "AR" => "Argentine",
        "AT" => "Autriche",
        "AU" => "Australie",
        "BE" => "Belgique",
        "BR" => "Brésil",
        "CA" => "Canada",
        "CH" => "Suisse",
        "CN" => "Chine",
        "CZ" => "Tchéquie",
        "DE" => "Allemagne",
        "DK" => "Danemark",
        "DZ" => "Algérie",
        "EG" => "Égypte",
        "ES" => "Espagne",
        "FI" => "Finlande",
        "FR" => "France",
        "GB" => "Royaume-Uni",
        "GR" => "Grèce",
        "IE" => "Irlande",
        "IN" => "Inde",
        "IT" => "Italie",
        "JP" => "Japon",
        "LU" => "Luxembourg",
        "MA" => "Maroc",
        "MX" => "Mexique",
        "NL" => "Pays-Bas",
        "NO" => "Norvège",
        "NZ" => "Nouvelle-Zélande",
        "PL" => "Pologne",
        "PT" => "Portugal",
        "SE" => "Suède",
        "SN" => "Sénégal",
        "TN" => "Tunisie",
        "TR" => "Turquie",
        "US" => "États-Unis",
        "ZA" => "Afrique du Sud",
        _ => return None,
    };
    Some(name)
}

fn english(code: &str) -> Option<&'static str> {
    let name = match code {
        "AR" => "Argentina",
        "AT" => "Austria",
        "AU" => "Australia",
        "BE" => "Belgium",
        "BR" => "Brazil",
        "CA" => "Canada",
        "CH" => "Switzerland",
        "CN" => "China",
        "CZ" => "Czechia",
        "DE" => "Germany",
        "DK" => "Denmark",
        "DZ" => "Algeria",
        "EG" => "Egypt",
        "ES" => "Spain",
        "FI" => "Finland",
        "FR" => "France",
        "GB" => "United Kingdom",
        "GR" => "Greece",
        "IE" => "Ireland",
        "IN" => "India",
        "IT" => "Italy",
        "JP" => "Japan",
        "LU" => "Luxembourg",
        "MA" => "Morocco",
        "MX" => "Mexico",
        "NL" => "Netherlands",
        "NO" => "Norway",
        "NZ" => "New Zealand",
        "PL" => "Poland",
        "PT" => "Portugal",
        "SE" => "Sweden",
        "SN" => "Senegal",
        "TN" => "Tunisia",
        "TR" => "Turkey",
        "US" => "United States",
        "ZA" => "South Africa",
        _ => return None,
    };
    Some(name)
}
