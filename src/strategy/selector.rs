//! Side selection and admission.
//!
//! The favoured side of a two-way prop is the one with the shorter fair
//! decimal price. Sports that demand broader market agreement also run
//! the admission check before a result is published.

use std::fmt;

use crate::sports::AdmissionPolicy;
use crate::types::{PropGroup, Side};

// ---------------------------------------------------------------------------
// Side choice
// ---------------------------------------------------------------------------

/// Outcome of comparing the two consensus prices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SideChoice {
    /// The favoured side and its consensus fair decimal price.
    Chosen { side: Side, fair_decimal: f64 },
    /// Both sides priced identically: no informational edge.
    Even,
    /// Neither side has a consensus price.
    Missing,
}

/// Pick the side with the lower fair decimal price.
pub fn select_side(avg_fair_over: Option<f64>, avg_fair_under: Option<f64>) -> SideChoice {
    match (avg_fair_over, avg_fair_under) {
        (Some(over), Some(under)) if over < under => SideChoice::Chosen {
            side: Side::Over,
            fair_decimal: over,
        },
        (Some(over), Some(under)) if over > under => SideChoice::Chosen {
            side: Side::Under,
            fair_decimal: under,
        },
        (Some(_), Some(_)) => SideChoice::Even,
        (Some(over), None) => SideChoice::Chosen {
            side: Side::Over,
            fair_decimal: over,
        },
        (None, Some(under)) => SideChoice::Chosen {
            side: Side::Under,
            fair_decimal: under,
        },
        (None, None) => SideChoice::Missing,
    }
}

// ---------------------------------------------------------------------------
// Admission
// ---------------------------------------------------------------------------

/// Why a proposition failed the sport's admission policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    TooFewBookmakers { found: usize, required: usize },
    NoSharpBook,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::TooFewBookmakers { found, required } => {
                write!(f, "only {found} bookmakers quoted, need {required}")
            }
            RejectionReason::NoSharpBook => write!(f, "no sharp bookmaker quoted the line"),
        }
    }
}

/// Check a proposition against the admission policy.
///
/// Counts distinct bookmakers quoting either side, unless the policy counts
/// the selected side only (see [`admit_selected_side`]). When the policy
/// names sharp books, at least one of them must be among those bookmakers.
pub fn admit(group: &PropGroup, policy: &AdmissionPolicy) -> Result<(), RejectionReason> {
    if !policy.count_selected_side {
        check_count(group.bookmaker_count(), policy)?;
    }

    if !policy.required_sharp_books.is_empty()
        && !group
            .quotes
            .iter()
            .any(|q| policy.required_sharp_books.iter().any(|sharp| *sharp == q.bookmaker))
    {
        return Err(RejectionReason::NoSharpBook);
    }

    Ok(())
}

/// Bookmaker count check for policies that count the selected side.
///
/// `found` is the number of bookmakers quoting the side that was picked.
/// A no-op for policies counting either side.
pub fn admit_selected_side(found: usize, policy: &AdmissionPolicy) -> Result<(), RejectionReason> {
    if policy.count_selected_side {
        check_count(found, policy)?;
    }
    Ok(())
}

fn check_count(found: usize, policy: &AdmissionPolicy) -> Result<(), RejectionReason> {
    if found < policy.min_bookmakers {
        return Err(RejectionReason::TooFewBookmakers {
            found,
            required: policy.min_bookmakers,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
