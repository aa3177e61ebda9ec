use collab_types::models::{Profile, Trust, TrustLevel};

use crate::validators::is_valid_inn;

/// Number of profile fields that count towards the trust score.
pub const TRUST_FIELDS: usize = 12;

fn filled(v: &Option<String>) -> bool {
    v.as_deref().is_some_and(|s| !s.is_empty())
}

/// Score a profile by how many recognized fields are filled in.
///
/// A missing profile scores 0 with every field reported missing.
pub fn compute_trust(profile: Option<&Profile>) -> Trust {
    let mut missing = Vec::new();

    let Some(p) = profile else {
        missing.extend([
            "display_name",
            "brand_name",
            "region",
            "about",
            "marketplaces",
            "categories",
            "biz_type",
            "sales_monthly_rub",
            "legal_name",
            "inn",
            "phone",
            "logo",
        ]);
        return summarize(missing);
    };

    // public
    if !filled(&p.display_name) {
        missing.push("display_name");
    }
    if !filled(&p.brand_name) {
        missing.push("brand_name");
    }
    if !filled(&p.region) {
        missing.push("region");
    }
    if !filled(&p.about) {
        missing.push("about");
    }
    if p.marketplaces.is_empty() {
        missing.push("marketplaces");
    }
    if p.categories.is_empty() {
        missing.push("categories");
    }
    if !filled(&p.biz_type) {
        missing.push("biz_type");
    }
    if !p.sales_monthly_rub.is_some_and(f64::is_finite) {
        missing.push("sales_monthly_rub");
    }

    // private
    if !filled(&p.legal_name) {
        missing.push("legal_name");
    }
    if !p.inn.as_deref().is_some_and(is_valid_inn) {
        missing.push("inn");
    }
    if !filled(&p.phone) {
        missing.push("phone");
    }

    if !filled(&p.logo_path) {
        missing.push("logo");
    }

    summarize(missing)
}

fn summarize(missing: Vec<&'static str>) -> Trust {
    let present = TRUST_FIELDS.saturating_sub(missing.len());
    let score = (100.0 * present as f64 / TRUST_FIELDS as f64).round() as u8;
    let level = match score {
        80.. => TrustLevel::High,
        50.. => TrustLevel::Mid,
        _ => TrustLevel::Low,
    };

    Trust {
        trust_score: score,
        trust_level: level,
        trust_missing: missing,
    }
}
