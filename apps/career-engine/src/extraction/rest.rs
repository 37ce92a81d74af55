//! REST extraction — Results, Efficiency, Scope, Time.
//!
//! Each facet needs a quantity and its own vocabulary in the same sentence.
//! Facets are independent: a sentence can fill more than one.

use crate::models::Rest;
use crate::scoring::quantity::{self, QuantityKind};
use crate::text;

struct FacetRule {
    vocabulary: &'static [&'static str],
    kinds: &'static [QuantityKind],
}

const RESULTS_FACET: FacetRule = FacetRule {
    vocabulary: &[
        "revenue",
        "profit",
        "profits",
        "growth",
        "sales",
        "conversion",
        "margin",
        "arr",
        "mrr",
        "income",
        "bookings",
        "retention",
        "market share",
        "roi",
        "nps",
        "satisfaction",
        "engagement",
        "signups",
        "deals",
    ],
    kinds: &[
        QuantityKind::Percentage,
        QuantityKind::Currency,
        QuantityKind::Multiplier,
        QuantityKind::ChangeBy,
    ],
};

const EFFICIENCY_FACET: FacetRule = FacetRule {
    vocabulary: &[
        "faster",
        "reduced",
        "saved",
        "automated",
        "latency",
        "cost",
        "costs",
        "efficiency",
        "productivity",
        "throughput",
        "manual",
        "streamlined",
        "cut",
        "errors",
        "downtime",
    ],
    kinds: &[
        QuantityKind::Percentage,
        QuantityKind::Multiplier,
        QuantityKind::TimeSpan,
        QuantityKind::Currency,
        QuantityKind::ChangeBy,
    ],
};

const SCOPE_FACET: FacetRule = FacetRule {
    vocabulary: &[
        "team",
        "teams",
        "people",
        "users",
        "customers",
        "clients",
        "countries",
        "regions",
        "markets",
        "engineers",
        "employees",
        "departments",
        "offices",
        "stakeholders",
        "organization",
        "budget",
        "portfolio",
        "global",
    ],
    kinds: &[QuantityKind::HeadCount, QuantityKind::Currency],
};

const TIME_FACET: FacetRule = FacetRule {
    vocabulary: &[
        "within", "weeks", "week", "months", "month", "days", "years", "deadline", "ahead",
        "schedule", "quarter", "sprint", "timeline", "in",
    ],
    kinds: &[QuantityKind::TimeSpan],
};

fn facet_sentence(sentences: &[String], rule: &FacetRule) -> Option<String> {
    sentences
        .iter()
        .find(|s| {
            let normalized = text::normalized(s);
            rule.vocabulary
                .iter()
                .any(|w| text::contains_phrase(&normalized, w))
                && quantity::has_any(s, rule.kinds)
        })
        .map(|s| s.trim_end_matches(|c: char| matches!(c, '.' | '!' | '?')).trim().to_string())
}

pub fn extract_rest(turn: &str) -> Rest {
    let sentences = text::sentences(turn);
    Rest {
        results: facet_sentence(&sentences, &RESULTS_FACET),
        efficiency: facet_sentence(&sentences, &EFFICIENCY_FACET),
        scope: facet_sentence(&sentences, &SCOPE_FACET),
        time: facet_sentence(&sentences, &TIME_FACET),
    }
}
