// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    pub id: i64,
    pub name: String,
    pub kind: String,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Income,
    Expense,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Income => "income",
            TxKind::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Option<TxKind> {
        match s {
            "income" => Some(TxKind::Income),
            "expense" => Some(TxKind::Expense),
            _ => None,
        }
    }
}

/// A ledger entry. `amount` is always non-negative; direction is carried by
/// `kind`. `currency` is fully populated by the row loader (missing values
/// default to the base currency there, never downstream).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub wallet_id: i64,
    pub amount: Decimal,
    pub kind: TxKind,
    pub category: Option<String>,
    pub currency: String,
    pub note: Option<String>,
}

/// Directional rate: 1 `base` = `rate` `quote`. The inverse pair is a
/// separate row; it is never derived as 1/rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub base: String,
    pub quote: String,
    pub rate: Decimal,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryGoal {
    pub id: i64,
    pub month: String, // YYYY-MM
    pub category: String,
    pub limit: Decimal, // display currency
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: String,
    pub total: Decimal,
    pub percentage: Decimal,
    pub count: u32,
}

/// Percentage change per metric against the previous period. A zero (or
/// negative) previous value yields 0, never an infinity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodDeltas {
    pub income_pct: Decimal,
    pub expenses_pct: Decimal,
    pub net_pct: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationResult {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_result: Decimal,
    pub by_category: Vec<CategoryBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vs_previous: Option<PeriodDeltas>,
}
