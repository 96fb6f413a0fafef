//! Cultural-context inference from language and phone country prefix.
//!
//! Language reflects actual cultural background and is the primary signal;
//! the phone prefix is secondary and only fills origin/region fields the
//! language left unset.

use leadflow_types::client::CulturalContext;

/// Country prefixes consulted as the secondary signal, longest first so
/// `+972` wins over `+9`.
const PHONE_PREFIXES: &[(&str, &str, &str)] = &[
    ("+972", "Israel", "Middle East"),
    ("+971", "United Arab Emirates", "Middle East"),
    ("+966", "Saudi Arabia", "Middle East"),
    ("+49", "Germany", "Western Europe"),
    ("+44", "United Kingdom", "Western Europe"),
    ("+34", "Spain", "Southern Europe"),
    ("+33", "France", "Western Europe"),
    ("+55", "Brazil", "South America"),
    ("+52", "Mexico", "North America"),
    ("+7", "Russia / Kazakhstan", "Eastern Europe / Central Asia"),
    ("+1", "United States / Canada", "North America"),
];

/// Infer cultural context for a client.
///
/// The language-derived fields are never overridden by the phone prefix;
/// the prefix only fills `likely_origin`/`region` when language left them
/// empty (e.g. English speakers).
pub fn detect_cultural_context(language: &str, phone: Option<&str>) -> CulturalContext {
    let mut ctx = context_from_language(language);

    if let Some(phone) = phone {
        if ctx.likely_origin.is_none() || ctx.region.is_none() {
            if let Some((origin, region)) = origin_from_prefix(phone) {
                if ctx.likely_origin.is_none() {
                    ctx.likely_origin = Some(origin.to_string());
                }
                if ctx.region.is_none() {
                    ctx.region = Some(region.to_string());
                }
            }
        }
    }

    ctx
}

fn context_from_language(language: &str) -> CulturalContext {
    match language {
        "ru" => CulturalContext {
            likely_origin: Some("Russian-speaking".to_string()),
            region: Some("Eastern Europe / Central Asia".to_string()),
            communication_style: Some("direct, detail-oriented".to_string()),
            dietary_restrictions: Vec::new(),
            cultural_notes: vec!["Russian-speaking community".to_string()],
            confidence: Some(0.7),
        },
        "he" => CulturalContext {
            likely_origin: Some("Israel".to_string()),
            region: Some("Middle East".to_string()),
            communication_style: Some("informal, fast-paced".to_string()),
            dietary_restrictions: vec!["kosher".to_string()],
            cultural_notes: vec!["Hebrew-speaking, likely Israeli".to_string()],
            confidence: Some(0.8),
        },
        "ar" => CulturalContext {
            likely_origin: Some("Arabic-speaking".to_string()),
            region: Some("Middle East / North Africa".to_string()),
            communication_style: Some("relationship-first, values hospitality".to_string()),
            dietary_restrictions: vec!["halal".to_string()],
            cultural_notes: vec!["Arabic-speaking community".to_string()],
            confidence: Some(0.7),
        },
        "es" => CulturalContext {
            likely_origin: Some("Spanish-speaking".to_string()),
            region: Some("Spain / Latin America".to_string()),
            communication_style: Some("warm, relationship-oriented".to_string()),
            dietary_restrictions: Vec::new(),
            cultural_notes: vec!["Spanish-speaking community".to_string()],
            confidence: Some(0.6),
        },
        "fr" => CulturalContext {
            likely_origin: Some("French-speaking".to_string()),
            region: Some("France / Francophone".to_string()),
            communication_style: Some("formal politeness expected".to_string()),
            dietary_restrictions: Vec::new(),
            cultural_notes: vec!["French-speaking community".to_string()],
            confidence: Some(0.6),
        },
        // English carries almost no cultural signal on its own.
        _ => CulturalContext {
            confidence: Some(0.3),
            ..Default::default()
        },
    }
}

fn origin_from_prefix(phone: &str) -> Option<(&'static str, &'static str)> {
    PHONE_PREFIXES
        .iter()
        .find(|(prefix, _, _)| phone.starts_with(prefix))
        .map(|(_, origin, region)| (*origin, *region))
}
