use crate::models::{ScoringMode, Topic, TopicPattern};

/// Hourly rates with a dedicated detection pattern in the price topic
pub const DEFAULT_RATES: [u32; 8] = [150, 165, 175, 185, 199, 200, 225, 250];

pub const PRICE_TOPIC_ID: &str = "price";

/// Pattern for one quoted hourly rate, e.g. `$185` or `185`
pub fn rate_pattern(rate: u32) -> TopicPattern {
    TopicPattern::new(format!(r"\$?\b{}\b", rate), format!("${}/hr", rate)).with_parameter(rate)
}

/// Built-in topic catalog for moving-company sales calls
pub fn default_topics() -> Vec<Topic> {
    let mut price = Topic::new(PRICE_TOPIC_ID, "Price / Hourly Rate", ScoringMode::Standard)
        .with_keywords([
            "price",
            "pricing",
            "hourly rate",
            "per hour",
            "an hour",
            "estimate",
            "quote",
            "cost",
        ]);
    for rate in DEFAULT_RATES {
        price = price.with_pattern(rate_pattern(rate));
    }
    price = price.with_pattern(TopicPattern::new(
        r"\$\d{2,3}(?:\.\d{2})?\s*(?:an|a|per|/)\s*(?:hour|hr)\b",
        "Hourly rate quoted",
    ));

    let minimum_hours = Topic::new("minimumhours", "Minimum Hours", ScoringMode::Standard)
        .with_keywords(["minimum charge", "minimum hours", "hour minimum"])
        .with_pattern(TopicPattern::new(
            r"\b(?:two|three|four|2|3|4)[\s-]*hours?\s+minimum\b",
            "Hour minimum stated",
        ))
        .with_pattern(TopicPattern::new(
            r"\bminimum\s+(?:of\s+)?(?:two|three|four|2|3|4)\s+hours?\b",
            "Minimum of N hours",
        ));

    let crew_size = Topic::new("crewsize", "Crew Size", ScoringMode::Standard)
        .with_keywords(["crew size"])
        .with_pattern(TopicPattern::new(
            r"\b(?:two|three|four|five|2|3|4|5)[\s-]*(?:man|men|mover|movers|person|guys)\b",
            "Crew size stated",
        ))
        .with_pattern(TopicPattern::new(
            r"\bcrew\s+of\s+(?:two|three|four|five|2|3|4|5)\b",
            "Crew of N",
        ));

    let flat_rate = Topic::new("flatrate", "Flat Rate / Binding Estimate", ScoringMode::Neutral)
        .with_keywords([
            "flat rate",
            "flat fee",
            "binding estimate",
            "not to exceed",
            "fixed price",
        ])
        .with_miss_label("N/A");

    let insurance = Topic::new("insurance", "Insurance / Valuation", ScoringMode::Standard)
        .with_keywords([
            "insurance",
            "insured",
            "coverage",
            "covered",
            "valuation",
            "released value",
            "full value protection",
            "deductible",
            "liability",
            "claim",
            "damage",
            "protection",
        ]);

    let payment = Topic::new("payment", "Deposit / Payment Collected", ScoringMode::Standard)
        .with_keywords([
            "deposit",
            "down payment",
            "credit card",
            "debit card",
            "ran the card",
            "paid",
            "collected",
            "charged",
            "receipt",
            "invoice",
            "authorized",
            "processed",
        ])
        .with_pattern(TopicPattern::new(
            r"\$\d[\d,]*(?:\.\d{2})?\s+deposit\b",
            "Deposit amount stated",
        ));

    let multiple_stops = Topic::new("multiplestops", "Multiple Stops", ScoringMode::Neutral)
        .with_keywords([
            "second stop",
            "additional stop",
            "extra stop",
            "another stop",
            "multiple stops",
        ])
        .with_pattern(TopicPattern::new(
            r"\b(?:two|three|2|3)\s+(?:stops|pickups|pick-ups|drop-offs|locations)\b",
            "Multiple stops",
        ))
        .with_miss_label("N/A");

    let red_flag = Topic::new("redflag", "Unusual Promises", ScoringMode::Inverted)
        .with_pattern(TopicPattern::new(r"\bguarantee[ds]?\b", "Guarantee"))
        .with_pattern(TopicPattern::new(
            r"\bno\s+(?:extra|hidden|additional)\s+(?:charges?|fees?|costs?)\b",
            "No extra charges promised",
        ))
        .with_pattern(TopicPattern::new(
            r"\bwon'?t\s+(?:cost|charge)\s+(?:you\s+)?(?:anything|a\s+(?:dime|thing|penny))\b",
            "Free work promised",
        ))
        .with_pattern(TopicPattern::new(
            r"\bprice\s+(?:will\s+)?never\s+(?:change|go\s+up)\b",
            "Locked price promised",
        ))
        .with_pattern(TopicPattern::new(r"\bfree\s+of\s+charge\b", "Free of charge"));

    vec![
        price,
        minimum_hours,
        crew_size,
        flat_rate,
        insurance,
        payment,
        multiple_stops,
        red_flag,
    ]
}
