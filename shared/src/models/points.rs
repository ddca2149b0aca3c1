//! Points Account & Ledger Models

use serde::{Deserialize, Serialize};

/// Points account — one per user, balance never negative
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PointsAccount {
    pub user_id: String,
    pub balance: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Ledger entry kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum LedgerKind {
    Earn,
    Spend,
}

/// Immutable record of one balance change
///
/// `amount` is signed (positive for earn, negative for spend); the
/// chronological sum of a user's amounts equals the current balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LedgerEntry {
    pub id: i64,
    pub user_id: String,
    pub amount: i64,
    pub kind: LedgerKind,
    pub reason: String,
    pub balance_before: i64,
    pub balance_after: i64,
    pub created_at: i64,
}

/// Direction of a balance adjustment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AdjustDirection {
    Add,
    Subtract,
}

/// Result of a successful adjustment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustResult {
    pub new_balance: i64,
    pub ledger_entry_id: i64,
}
