//! Consensus engine — devigging, weighted aggregation, side selection,
//! admission, and ranking.

pub mod consensus;
pub mod odds;
pub mod ranker;
pub mod selector;

use std::fmt;
use tracing::{debug, info};

use crate::sports::SportProfile;
use crate::types::{ConsensusError, ConsensusResult, ContributingQuote, PropGroup, Side};
use selector::{RejectionReason, SideChoice};

// ---------------------------------------------------------------------------
// Decision log
// ---------------------------------------------------------------------------

/// Why a proposition produced no result.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// No weighted bookmaker quoted both sides.
    NoConsensus,
    /// Both consensus prices were identical.
    EvenPrices,
    /// Failed the sport's admission policy.
    Admission(RejectionReason),
    /// A quote or consensus price could not be converted.
    InvalidPrice { price: f64 },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoConsensus => write!(f, "no weighted consensus"),
            SkipReason::EvenPrices => write!(f, "over and under priced evenly"),
            SkipReason::Admission(reason) => write!(f, "admission: {reason}"),
            SkipReason::InvalidPrice { price } => write!(f, "invalid decimal price {price}"),
        }
    }
}

impl From<ConsensusError> for SkipReason {
    fn from(err: ConsensusError) -> Self {
        match err {
            ConsensusError::InvalidPrice { price } => SkipReason::InvalidPrice { price },
            _ => SkipReason::NoConsensus,
        }
    }
}

/// Record of every proposition the engine looked at.
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionRecord {
    Selected {
        player_name: String,
        market_code: String,
        line: f64,
        side: Side,
        implied_probability: f64,
    },
    Skipped {
        player_name: String,
        market_code: String,
        line: f64,
        reason: SkipReason,
    },
}

impl DecisionRecord {
    pub fn is_selected(&self) -> bool {
        matches!(self, DecisionRecord::Selected { .. })
    }
}

/// Ranked results plus the full decision log for one engine run.
#[derive(Debug, Clone, Default)]
pub struct ConsensusOutcome {
    pub results: Vec<ConsensusResult>,
    pub decisions: Vec<DecisionRecord>,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// One engine, parameterized by a sport profile.
///
/// Holds no mutable state: every call builds its own transient maps, so a
/// single engine can serve concurrent requests.
pub struct ConsensusEngine<'a> {
    profile: &'a SportProfile,
}

impl<'a> ConsensusEngine<'a> {
    pub fn new(profile: &'a SportProfile) -> Self {
        Self { profile }
    }

    /// Evaluate a single proposition.
    pub fn evaluate_group(&self, group: &PropGroup) -> Result<ConsensusResult, SkipReason> {
        selector::admit(group, &self.profile.admission).map_err(SkipReason::Admission)?;

        let pair = consensus::aggregate(group, &self.profile.weights)?.ok_or(SkipReason::NoConsensus)?;

        let (side, fair_decimal) = match selector::select_side(pair.avg_fair_over, pair.avg_fair_under) {
            SideChoice::Chosen { side, fair_decimal } => (side, fair_decimal),
            SideChoice::Even => return Err(SkipReason::EvenPrices),
            SideChoice::Missing => return Err(SkipReason::NoConsensus),
        };

        let market_label = self.profile.market_labels.label_for(&group.market_code);

        // One contributor per bookmaker, at the price the consensus kept.
        let contributing_quotes = consensus::bookmaker_pairs(group)
            .into_iter()
            .filter_map(|(bookmaker, pair)| {
                let price = match side {
                    Side::Over => pair.over_price,
                    Side::Under => pair.under_price,
                }?;
                Some((bookmaker, price))
            })
            .map(|(bookmaker, price)| {
                Ok(ContributingQuote {
                    bookmaker,
                    side,
                    american_price: odds::decimal_to_american(price)?,
                    market_label: market_label.clone(),
                    line: group.line,
                })
            })
            .collect::<Result<Vec<_>, ConsensusError>>()?;

        selector::admit_selected_side(contributing_quotes.len(), &self.profile.admission)
            .map_err(SkipReason::Admission)?;

        let fair_price_american = odds::decimal_to_american(fair_decimal)?;

        Ok(ConsensusResult {
            player_name: group.player_name.clone(),
            market_label,
            line: group.line,
            selected_side: side,
            fair_price_american,
            implied_probability: odds::implied_probability(fair_price_american),
            contributing_quotes,
        })
    }

    /// Evaluate every group, then rank once and truncate once.
    ///
    /// Group-level failures never abort the batch; they land in the
    /// decision log and the group is left out of the results.
    pub fn run(&self, groups: &[PropGroup]) -> ConsensusOutcome {
        let mut accepted = Vec::new();
        let mut decisions = Vec::with_capacity(groups.len());

        for group in groups {
            match self.evaluate_group(group) {
                Ok(result) => {
                    debug!(
                        sport = %self.profile.sport,
                        player = %result.player_name,
                        market = %result.market_label,
                        line = result.line,
                        side = %result.selected_side,
                        fair = result.fair_price_american,
                        prob = result.implied_probability,
                        "Consensus selected"
                    );
                    decisions.push(DecisionRecord::Selected {
                        player_name: group.player_name.clone(),
                        market_code: group.market_code.clone(),
                        line: group.line,
                        side: result.selected_side,
                        implied_probability: result.implied_probability,
                    });
                    accepted.push(result);
                }
                Err(reason) => {
                    debug!(
                        sport = %self.profile.sport,
                        player = %group.player_name,
                        market = %group.market_code,
                        line = group.line,
                        reason = %reason,
                        "Proposition skipped"
                    );
                    decisions.push(DecisionRecord::Skipped {
                        player_name: group.player_name.clone(),
                        market_code: group.market_code.clone(),
                        line: group.line,
                        reason,
                    });
                }
            }
        }

        let accepted_count = accepted.len();
        let results = ranker::rank_and_truncate(accepted, self.profile.admission.max_results);

        info!(
            sport = %self.profile.sport,
            groups = groups.len(),
            accepted = accepted_count,
            published = results.len(),
            "Consensus run complete"
        );

        ConsensusOutcome { results, decisions }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sports::weights::WeightingTable;
    use crate::sports::{AdmissionPolicy, Sport};

    fn open_profile(weights: &[(&str, f64)], max_results: usize) -> SportProfile {
        let mut profile = SportProfile::defaults(Sport::Nfl);
        profile.weights = WeightingTable::from_pairs(weights);
        profile.admission = AdmissionPolicy {
            min_bookmakers: 0,
            count_selected_side: false,
            required_sharp_books: Vec::new(),
            max_results,
        };
        profile
    }

    fn two_book_group() -> PropGroup {
        PropGroup::new("James Cook", "player_rush_yds", 55.5)
            .with_quote("BookA", Side::Over, 1.90)
            .with_quote("BookA", Side::Under, 2.00)
            .with_quote("BookB", Side::Over, 2.10)
            .with_quote("BookB", Side::Under, 1.85)
    }

    /// A group whose single weighted book favours the over at `over`.
    fn favoured_over(player: &str, over: f64, under: f64) -> PropGroup {
        PropGroup::new(player, "player_rush_yds", 40.5)
            .with_quote("BookA", Side::Over, over)
            .with_quote("BookA", Side::Under, under)
    }

    #[test]
    fn test_two_book_regression() {
        let profile = open_profile(&[("BookA", 0.6), ("BookB", 0.4)], 15);
        let engine = ConsensusEngine::new(&profile);

        let outcome = engine.run(&[two_book_group()]);
        assert_eq!(outcome.results.len(), 1);

        let result = &outcome.results[0];
        assert_eq!(result.player_name, "James Cook");
        assert_eq!(result.market_label, "Rushing Yards");
        assert_eq!(result.selected_side, Side::Under);
        assert_eq!(result.fair_price_american, -102);
        assert_eq!(result.implied_probability, 50.5);

        let books: Vec<(&str, i64)> = result
            .contributing_quotes
            .iter()
            .map(|q| (q.bookmaker.as_str(), q.american_price))
            .collect();
        assert_eq!(books, vec![("BookA", 100), ("BookB", -118)]);
        assert!(result.contributing_quotes.iter().all(|q| q.side == Side::Under));
        assert!(result.contributing_quotes.iter().all(|q| q.line == 55.5));
    }

    #[test]
    fn test_zero_weight_group_is_skipped() {
        let profile = open_profile(&[("Pinnacle", 0.5)], 15);
        let outcome = ConsensusEngine::new(&profile).run(&[two_book_group()]);
        assert!(outcome.results.is_empty());
        assert_eq!(
            outcome.decisions[0],
            DecisionRecord::Skipped {
                player_name: "James Cook".into(),
                market_code: "player_rush_yds".into(),
                line: 55.5,
                reason: SkipReason::NoConsensus,
            }
        );
    }

    #[test]
    fn test_even_prices_are_skipped() {
        let profile = open_profile(&[("BookA", 1.0)], 15);
        let group = favoured_over("Even Steven", 1.91, 1.91);
        let result = ConsensusEngine::new(&profile).evaluate_group(&group);
        assert_eq!(result, Err(SkipReason::EvenPrices));
    }

    #[test]
    fn test_invalid_price_skips_group_without_aborting_batch() {
        let profile = open_profile(&[("BookA", 1.0)], 15);
        let bad = favoured_over("Bad Price", 1.0, 2.5);
        let good = favoured_over("Good Price", 1.70, 2.25);

        let outcome = ConsensusEngine::new(&profile).run(&[bad, good]);
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].player_name, "Good Price");
        assert!(matches!(
            &outcome.decisions[0],
            DecisionRecord::Skipped { reason: SkipReason::InvalidPrice { .. }, .. }
        ));
        assert!(outcome.decisions[1].is_selected());
    }

    #[test]
    fn test_unweighted_quotes_still_listed_as_contributors() {
        let profile = open_profile(&[("BookA", 1.0)], 15);
        let group = favoured_over("A", 1.70, 2.25)
            .with_quote("Bovada", Side::Over, 1.75)
            .with_quote("Bovada", Side::Under, 2.10);
        let result = ConsensusEngine::new(&profile).evaluate_group(&group).unwrap();
        assert_eq!(result.selected_side, Side::Over);
        assert_eq!(result.contributing_quotes.len(), 2);
        assert_eq!(result.contributing_quotes[1].bookmaker, "Bovada");
        assert_eq!(result.contributing_quotes[1].american_price, -133);
    }

    #[test]
    fn test_admission_policy_applies() {
        let profile = SportProfile::defaults(Sport::Nfl);
        let group = PropGroup::new("A", "player_pass_yds", 245.5)
            .with_quote("DraftKings", Side::Over, 1.80)
            .with_quote("DraftKings", Side::Under, 2.05)
            .with_quote("FanDuel", Side::Over, 1.83)
            .with_quote("FanDuel", Side::Under, 2.00);
        assert_eq!(
            ConsensusEngine::new(&profile).evaluate_group(&group),
            Err(SkipReason::Admission(RejectionReason::NoSharpBook))
        );
    }

    #[test]
    fn test_unknown_market_label() {
        let profile = open_profile(&[("BookA", 1.0)], 15);
        let mut group = favoured_over("A", 1.70, 2.25);
        group.market_code = "player_fumbles".into();
        let result = ConsensusEngine::new(&profile).evaluate_group(&group).unwrap();
        assert_eq!(result.market_label, "unknown");
        assert_eq!(result.contributing_quotes[0].market_label, "unknown");
    }

    #[test]
    fn test_run_ranks_after_all_groups_and_truncates() {
        let profile = open_profile(&[("BookA", 1.0)], 2);
        // Fair over prices 2.00-ish, 1.40-ish, 1.65-ish
        let groups = vec![
            favoured_over("Low", 1.85, 1.95),
            favoured_over("High", 1.35, 3.20),
            favoured_over("Mid", 1.60, 2.40),
        ];
        let outcome = ConsensusEngine::new(&profile).run(&groups);
        let names: Vec<&str> = outcome.results.iter().map(|r| r.player_name.as_str()).collect();
        assert_eq!(names, vec!["High", "Mid"]);
        assert_eq!(outcome.decisions.len(), 3);
        assert!(outcome.decisions.iter().all(|d| d.is_selected()));
    }

    #[test]
    fn test_requoted_side_contributes_latest_price_once() {
        let profile = open_profile(&[("DraftKings", 1.0)], 15);
        let group = PropGroup::new("A", "player_rush_yds", 40.5)
            .with_quote("DraftKings", Side::Over, 2.05)
            .with_quote("DraftKings", Side::Under, 1.80)
            .with_quote("DraftKings", Side::Under, 1.95);
        let result = ConsensusEngine::new(&profile).evaluate_group(&group).unwrap();
        assert_eq!(result.selected_side, Side::Under);
        let books: Vec<(&str, i64)> = result
            .contributing_quotes
            .iter()
            .map(|q| (q.bookmaker.as_str(), q.american_price))
            .collect();
        assert_eq!(books, vec![("DraftKings", -105)]);
    }

    #[test]
    fn test_hockey_counts_books_on_selected_side() {
        let profile = SportProfile::defaults(Sport::Nhl);
        // Three books in total, but only two quote the favoured under.
        let group = PropGroup::new("David Pastrnak", "player_points", 0.5)
            .with_quote("DraftKings", Side::Over, 2.40)
            .with_quote("DraftKings", Side::Under, 1.60)
            .with_quote("FanDuel", Side::Over, 2.35)
            .with_quote("FanDuel", Side::Under, 1.62)
            .with_quote("BetMGM", Side::Over, 2.30);
        assert_eq!(
            ConsensusEngine::new(&profile).evaluate_group(&group),
            Err(SkipReason::Admission(RejectionReason::TooFewBookmakers { found: 2, required: 3 }))
        );

        let group = group.with_quote("BetMGM", Side::Under, 1.63);
        let result = ConsensusEngine::new(&profile).evaluate_group(&group).unwrap();
        assert_eq!(result.selected_side, Side::Under);
        assert_eq!(result.contributing_quotes.len(), 3);
    }

    #[test]
    fn test_hockey_prop_from_offshore_books_is_published() {
        let profile = SportProfile::defaults(Sport::Nhl);
        let group = PropGroup::new("David Pastrnak", "player_points", 0.5)
            .with_quote("BetRivers", Side::Over, 1.65)
            .with_quote("BetRivers", Side::Under, 2.20)
            .with_quote("Bovada", Side::Over, 1.62)
            .with_quote("Bovada", Side::Under, 2.25)
            .with_quote("BetOnline.ag", Side::Over, 1.67)
            .with_quote("BetOnline.ag", Side::Under, 2.15);
        let result = ConsensusEngine::new(&profile).evaluate_group(&group).unwrap();
        assert_eq!(result.selected_side, Side::Over);
        assert_eq!(result.market_label, "Points");
        let books: Vec<&str> = result.contributing_quotes.iter().map(|q| q.bookmaker.as_str()).collect();
        assert_eq!(books, vec!["BetRivers", "Bovada", "BetOnline.ag"]);
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(SkipReason::EvenPrices.to_string(), "over and under priced evenly");
        let admission = SkipReason::Admission(RejectionReason::NoSharpBook);
        assert!(admission.to_string().starts_with("admission"));
    }
}
