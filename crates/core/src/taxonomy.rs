//! Static concept tables. Plain data: name to keyword phrases for the bulk
//! scan, and name to natural-language query for the query exporter.

/// Concept name and the lowercase phrases that mark a chunk as mentioning it.
pub type ConceptKeywords = (&'static str, &'static [&'static str]);

/// Concept name and the query text embedded for it.
pub type ConceptQuery = (&'static str, &'static str);

pub const CONCEPT_KEYWORDS: &[ConceptKeywords] = &[
    ("power_of_three", &["power of three", "po3", "accumulation manipulation distribution"]),
    ("order_blocks", &["order block", "bullish order block", "bearish order block"]),
    ("fair_value_gaps", &["fair value gap", "fvg", "imbalance"]),
    (
        "liquidity",
        &[
            "liquidity",
            "buy side liquidity",
            "sell side liquidity",
            "bsl",
            "ssl",
            "equal highs",
            "equal lows",
        ],
    ),
    (
        "market_structure",
        &["market structure", "bos", "break of structure", "choch", "change of character"],
    ),
    ("optimal_trade_entry", &["optimal trade entry", "ote", ".62", ".705", ".79"]),
    ("silver_bullet", &["silver bullet"]),
    ("judas_swing", &["judas swing", "judas"]),
    ("turtle_soup", &["turtle soup"]),
    ("breaker_blocks", &["breaker block", "breaker"]),
    ("mitigation_blocks", &["mitigation block", "mitigation"]),
    ("killzones", &["killzone", "kill zone"]),
    ("asian_session", &["asian session", "asian range"]),
    ("london_session", &["london session", "london open", "london close"]),
    ("new_york_session", &["new york session", "ny session", "new york open"]),
    ("midnight_open", &["midnight open", "midnight"]),
    ("true_day", &["true day"]),
    ("weekly_profiles", &["weekly profile", "weekly range"]),
    ("monthly_profiles", &["monthly profile", "monthly range"]),
    ("quarterly_shifts", &["quarterly shift"]),
    ("institutional_order_flow", &["institutional order flow", "institutional"]),
    ("smart_money", &["smart money"]),
    ("displacement", &["displacement"]),
    ("imbalance", &["imbalance"]),
    ("inefficiency", &["inefficiency"]),
    ("premium_discount", &["premium", "discount"]),
    ("equilibrium", &["equilibrium"]),
    ("swing_points", &["swing high", "swing low"]),
    ("pivot_points", &["pivot"]),
    ("time_and_price", &["time and price"]),
    ("fibonacci", &["fibonacci", "fib"]),
    ("pd_arrays", &["pd array"]),
    ("draw_on_liquidity", &["draw on liquidity", "dol"]),
    ("raid", &["raid", "liquidity raid"]),
    ("stop_hunt", &["stop hunt", "stop run"]),
    ("manipulation", &["manipulation"]),
    ("accumulation", &["accumulation"]),
    ("distribution", &["distribution"]),
    ("expansion", &["expansion"]),
    ("retracement", &["retracement"]),
    ("consolidation", &["consolidation", "range"]),
    ("propulsion_block", &["propulsion block"]),
    ("rejection_block", &["rejection block"]),
    ("volume_imbalance", &["volume imbalance"]),
    ("opening_range_gap", &["opening range gap"]),
    ("new_week_opening_gap", &["new week opening gap", "nwog"]),
    ("new_day_opening_gap", &["new day opening gap", "ndog"]),
    ("consequent_encroachment", &["consequent encroachment"]),
    ("model_2022", &["2022 model", "model 2022"]),
    ("unicorn_model", &["unicorn"]),
    ("ict_mentorship", &["mentorship"]),
    ("amd", &["amd"]),
    ("cbdr", &["cbdr", "central bank dealer range"]),
    ("nwog", &["nwog"]),
    ("ndog", &["ndog"]),
    ("macro_time", &["macro", ":50", ":10"]),
    ("algorithmically_delivered", &["algorithm", "algorithmically"]),
    ("seek_and_destroy", &["seek and destroy"]),
    ("standard_deviation", &["standard deviation"]),
];

pub const CONCEPT_QUERIES: &[ConceptQuery] = &[
    ("power_of_three", "power of three accumulation manipulation distribution daily candle"),
    ("order_blocks", "order block identification bullish and bearish order blocks"),
    ("fair_value_gaps", "fair value gap entries and how price rebalances the gap"),
    ("liquidity", "liquidity pools buy side and sell side liquidity above highs and below lows"),
    ("market_structure", "market structure shift and break of structure confirmation"),
    ("optimal_trade_entry", "optimal trade entry fibonacci retracement 62 to 79 percent"),
    ("silver_bullet", "silver bullet setup one hour window fair value gap entry"),
    ("judas_swing", "judas swing false move at the open before the real direction"),
    ("turtle_soup", "turtle soup false breakout of old highs and lows"),
    ("breaker_blocks", "breaker block failed order block after a liquidity sweep"),
    ("mitigation_blocks", "mitigation block returning to an unsuccessful swing"),
    ("killzones", "killzones the time windows when to trade during the day"),
    ("asian_session", "asian session range and how it sets up london"),
    ("london_session", "london open killzone and the london session high or low"),
    ("new_york_session", "new york session open and the AM killzone"),
    ("midnight_open", "midnight open price as the daily reference level"),
    ("true_day", "true day starting at midnight new york time"),
    ("weekly_profiles", "weekly profile classic tuesday low of the week"),
    ("monthly_profiles", "monthly range and monthly profile expectations"),
    ("quarterly_shifts", "quarterly shift in institutional order flow"),
    ("institutional_order_flow", "institutional order flow and following the smart money footprint"),
    ("smart_money", "smart money concepts versus retail traders"),
    ("displacement", "displacement energetic price move that creates imbalance"),
    ("imbalance", "imbalance in price delivery one sided candles"),
    ("inefficiency", "inefficiency in the market that price seeks to fill"),
    ("premium_discount", "premium and discount arrays buying below equilibrium selling above"),
    ("equilibrium", "equilibrium the fifty percent level of a dealing range"),
    ("swing_points", "swing high and swing low definition three candle pattern"),
    ("pivot_points", "pivot points short term and intermediate term highs and lows"),
    ("time_and_price", "time and price theory when price moves matter as much as where"),
    ("fibonacci", "fibonacci levels used for entries and targets"),
    ("pd_arrays", "pd array matrix premium and discount arrays ranked"),
    ("draw_on_liquidity", "draw on liquidity where price is likely headed next"),
    ("raid", "raid on liquidity taking out stops before reversal"),
    ("stop_hunt", "stop hunt running stops above old highs"),
    ("manipulation", "manipulation phase of the daily range"),
    ("accumulation", "accumulation phase before expansion"),
    ("distribution", "distribution phase at the end of the move"),
    ("expansion", "expansion away from a fair value after consolidation"),
    ("retracement", "retracement back into a discount or premium before continuation"),
    ("consolidation", "consolidation ranges and how they resolve"),
    ("propulsion_block", "propulsion block candle trading into an order block"),
    ("rejection_block", "rejection block long wicks at highs and lows"),
    ("volume_imbalance", "volume imbalance between candle bodies"),
    ("opening_range_gap", "opening range gap between close and next open"),
    ("new_week_opening_gap", "new week opening gap friday close to sunday open"),
    ("new_day_opening_gap", "new day opening gap between daily close and open"),
    ("consequent_encroachment", "consequent encroachment midpoint of a fair value gap"),
    ("model_2022", "2022 mentorship model entry after a liquidity sweep and displacement"),
    ("unicorn_model", "unicorn model breaker block overlapping a fair value gap"),
    ("ict_mentorship", "mentorship lessons and how to study the material"),
    ("amd", "amd accumulation manipulation distribution cycle"),
    ("cbdr", "cbdr central bank dealers range projections"),
    ("nwog", "nwog new week opening gap as support and resistance"),
    ("ndog", "ndog new day opening gap reaction"),
    ("macro_time", "macro times algorithmic price delivery windows at ten and fifty minutes"),
    ("algorithmically_delivered", "algorithm delivering price interbank price delivery algorithm"),
    ("seek_and_destroy", "seek and destroy choppy profile days to avoid"),
    ("standard_deviation", "standard deviation projections for price targets"),
    ("higher_timeframe_bias", "bias from the higher timeframe daily and weekly direction"),
    ("entry_criteria", "entry checklist criteria before taking a trade"),
    ("stop_loss_placement", "stop loss placement where to put protective stops"),
    ("profit_targets", "targets and taking partial profits at liquidity"),
    ("risk_management", "risk management position sizing and percent risk per trade"),
    ("trading_psychology", "psychology discipline and emotional control while trading"),
    ("fomo", "fomo fear of missing out chasing trades"),
    ("patience", "patience waiting for the setup to come to you"),
    ("overtrading", "overtrading and revenge trading after losses"),
    ("journaling", "journal keeping a trading journal and reviewing trades"),
    ("backtesting", "backtesting and studying price action on historical charts"),
];

pub fn concept_names() -> impl Iterator<Item = &'static str> {
    CONCEPT_KEYWORDS.iter().map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keyword_table_is_complete_and_unique() {
        assert_eq!(CONCEPT_KEYWORDS.len(), 59);
        let names: HashSet<_> = concept_names().collect();
        assert_eq!(names.len(), CONCEPT_KEYWORDS.len());
        for (name, kws) in CONCEPT_KEYWORDS {
            assert!(!kws.is_empty(), "{} has no keywords", name);
            for kw in *kws {
                assert_eq!(*kw, kw.to_lowercase(), "{} keyword not lowercase", name);
            }
        }
    }

    #[test]
    fn query_table_has_unique_names() {
        assert_eq!(CONCEPT_QUERIES.len(), 70);
        let names: HashSet<_> = CONCEPT_QUERIES.iter().map(|(n, _)| *n).collect();
        assert_eq!(names.len(), CONCEPT_QUERIES.len());
        assert!(CONCEPT_QUERIES.iter().all(|(_, q)| !q.trim().is_empty()));
    }
}
