//! Allocation planning - which grants a spend draws from and how a
//! cancellation credits them back.
//!
//! Planning is pure: callers fetch the candidate grants or debit links inside
//! their own transaction and the planner walks the slices, which keeps the
//! FIFO walk trivially testable without a database.

use crate::{
    core::balance::GrantBalance,
    entities::consumption,
    errors::{Error, Result},
};

/// One planned draw against a source grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Draw {
    /// The earn grant to debit
    pub source_grant_id: i64,
    /// Positive magnitude to draw; persisted as a negative link amount
    pub amount: i64,
}

/// One planned credit back to a source grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credit {
    /// The earn grant to credit
    pub source_grant_id: i64,
    /// Positive magnitude to credit back
    pub amount: i64,
}

/// Plans the draws covering `requested` points from `available` grants.
///
/// `available` must be in FIFO order; each grant is drawn down to zero before
/// the next one is touched. A zero request plans no draws. Exhausting the
/// list mid-walk means the balance pre-check and the grant snapshot disagree,
/// which only happens after an invariant breach, so it is fatal rather than
/// retryable.
pub fn plan_draws(available: &[GrantBalance], requested: i64) -> Result<Vec<Draw>> {
    let mut outstanding = requested;
    let mut draws = Vec::new();

    for grant in available {
        if outstanding == 0 {
            break;
        }
        if grant.remaining <= 0 {
            continue;
        }
        let amount = outstanding.min(grant.remaining);
        draws.push(Draw {
            source_grant_id: grant.grant_id,
            amount,
        });
        outstanding -= amount;
    }

    if outstanding > 0 {
        return Err(Error::LedgerInconsistency {
            message: format!(
                "allocation exhausted grants with {outstanding} of {requested} uncovered"
            ),
        });
    }

    Ok(draws)
}

/// Plans the credits that undo the given debit links.
///
/// `debits` must be the spend's negative links in their original FIFO order;
/// each is mirrored with the opposite sign against the same source grant.
/// Calling this twice for one spend doubles the credit - reversing a spend at
/// most once is the caller's responsibility.
pub fn plan_credits(debits: &[consumption::Model]) -> Vec<Credit> {
    debits
        .iter()
        .map(|link| Credit {
            source_grant_id: link.source_grant_id,
            amount: -link.amount,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn available(balances: &[(i64, i64)]) -> Vec<GrantBalance> {
        balances
            .iter()
            .map(|&(grant_id, remaining)| GrantBalance {
                grant_id,
                remaining,
            })
            .collect()
    }

    #[test]
    fn test_single_grant_covers_the_request() {
        let draws = plan_draws(&available(&[(1, 100)]), 70).unwrap();
        assert_eq!(
            draws,
            vec![Draw {
                source_grant_id: 1,
                amount: 70,
            }]
        );
    }

    #[test]
    fn test_draws_span_grants_in_fifo_order() {
        let draws = plan_draws(&available(&[(1, 50), (2, 100)]), 70).unwrap();
        assert_eq!(
            draws,
            vec![
                Draw {
                    source_grant_id: 1,
                    amount: 50,
                },
                Draw {
                    source_grant_id: 2,
                    amount: 20,
                },
            ]
        );
    }

    #[test]
    fn test_zero_request_plans_nothing() {
        let draws = plan_draws(&available(&[(1, 50)]), 0).unwrap();
        assert!(draws.is_empty());
    }

    #[test]
    fn test_depleted_grants_are_skipped() {
        let draws = plan_draws(&available(&[(1, 0), (2, 30)]), 30).unwrap();
        assert_eq!(
            draws,
            vec![Draw {
                source_grant_id: 2,
                amount: 30,
            }]
        );
    }

    #[test]
    fn test_exhausted_grants_are_an_inconsistency() {
        let result = plan_draws(&available(&[(1, 50)]), 70);
        assert!(matches!(
            result.unwrap_err(),
            Error::LedgerInconsistency { .. }
        ));
    }

    #[test]
    fn test_credits_mirror_debits() {
        let debits = vec![
            consumption::Model {
                id: 10,
                spend_grant_id: 5,
                source_grant_id: 1,
                amount: -50,
                created_at: chrono::Utc::now(),
            },
            consumption::Model {
                id: 11,
                spend_grant_id: 5,
                source_grant_id: 2,
                amount: -20,
                created_at: chrono::Utc::now(),
            },
        ];

        let credits = plan_credits(&debits);
        assert_eq!(
            credits,
            vec![
                Credit {
                    source_grant_id: 1,
                    amount: 50,
                },
                Credit {
                    source_grant_id: 2,
                    amount: 20,
                },
            ]
        );
    }
}
