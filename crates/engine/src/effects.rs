//! Balance effect calculator.
//!
//! Maps a transaction to the signed balance deltas it contributes to each
//! account it references. Pure: no storage access.
//!
//! | kind     | source  | destination               |
//! |----------|---------|---------------------------|
//! | income   | +amount |                           |
//! | expense  | -amount |                           |
//! | transfer | -amount | +amount, when one is set  |

use serde::Serialize;
use uuid::Uuid;

use crate::{EngineError, ResultEngine, TransactionKind, TransactionSnapshot};

/// A signed balance delta for one account, in minor units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Effect {
    pub account_id: Uuid,
    pub delta: i64,
}

impl Effect {
    #[must_use]
    pub fn inverse(self) -> Self {
        Self {
            account_id: self.account_id,
            delta: -self.delta,
        }
    }
}

/// Compute the effects of a transaction.
///
/// A transfer without a destination only debits its source. A destination on
/// a non-transfer is ignored.
///
/// # Errors
///
/// Returns [`EngineError::Configuration`] for a non-positive amount or a
/// transfer whose destination is its own source.
pub fn effects(subject: &TransactionSnapshot) -> ResultEngine<Vec<Effect>> {
    if subject.amount_minor <= 0 {
        return Err(EngineError::Configuration(format!(
            "amount must be > 0, got {}",
            subject.amount_minor
        )));
    }
    let amount = subject.amount_minor;
    let source = subject.account_id;

    let out = match subject.kind {
        TransactionKind::Income => vec![Effect {
            account_id: source,
            delta: amount,
        }],
        TransactionKind::Expense => vec![Effect {
            account_id: source,
            delta: -amount,
        }],
        TransactionKind::Transfer => {
            let mut out = vec![Effect {
                account_id: source,
                delta: -amount,
            }];
            if let Some(destination) = subject.destination_account_id {
                if destination == source {
                    return Err(EngineError::Configuration(
                        "transfer destination must differ from source".to_string(),
                    ));
                }
                out.push(Effect {
                    account_id: destination,
                    delta: amount,
                });
            }
            out
        }
    };
    Ok(out)
}

#[must_use]
pub fn inverse_effects(effects: &[Effect]) -> Vec<Effect> {
    effects.iter().map(|effect| effect.inverse()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(
        kind: TransactionKind,
        account_id: Uuid,
        destination_account_id: Option<Uuid>,
        amount_minor: i64,
    ) -> TransactionSnapshot {
        TransactionSnapshot {
            kind,
            account_id,
            destination_account_id,
            amount_minor,
        }
    }

    #[test]
    fn income_credits_source() {
        let a = Uuid::new_v4();
        let out = effects(&subject(TransactionKind::Income, a, None, 1500)).unwrap();
        assert_eq!(
            out,
            vec![Effect {
                account_id: a,
                delta: 1500
            }]
        );
    }

    #[test]
    fn expense_ignores_destination() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let out = effects(&subject(TransactionKind::Expense, a, Some(b), 2500)).unwrap();
        assert_eq!(
            out,
            vec![Effect {
                account_id: a,
                delta: -2500
            }]
        );
    }

    #[test]
    fn transfer_moves_between_accounts() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let out = effects(&subject(TransactionKind::Transfer, a, Some(b), 500)).unwrap();
        assert_eq!(
            out,
            vec![
                Effect {
                    account_id: a,
                    delta: -500
                },
                Effect {
                    account_id: b,
                    delta: 500
                },
            ]
        );
        assert_eq!(out.iter().map(|e| e.delta).sum::<i64>(), 0);
    }

    #[test]
    fn transfer_without_destination_only_debits_source() {
        let a = Uuid::new_v4();
        let out = effects(&subject(TransactionKind::Transfer, a, None, 500)).unwrap();
        assert_eq!(
            out,
            vec![Effect {
                account_id: a,
                delta: -500
            }]
        );
    }

    #[test]
    fn malformed_subjects_are_rejected() {
        let a = Uuid::new_v4();
        assert!(matches!(
            effects(&subject(TransactionKind::Expense, a, None, 0)),
            Err(EngineError::Configuration(_))
        ));
        assert!(matches!(
            effects(&subject(TransactionKind::Income, a, None, -10)),
            Err(EngineError::Configuration(_))
        ));
        assert!(matches!(
            effects(&subject(TransactionKind::Transfer, a, Some(a), 10)),
            Err(EngineError::Configuration(_))
        ));
    }

    #[test]
    fn inverse_negates_every_delta() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let forward = effects(&subject(TransactionKind::Transfer, a, Some(b), 700)).unwrap();
        let backward = inverse_effects(&forward);
        for (f, r) in forward.iter().zip(&backward) {
            assert_eq!(f.account_id, r.account_id);
            assert_eq!(f.delta + r.delta, 0);
        }
    }
}
