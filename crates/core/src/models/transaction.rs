use serde::{Deserialize, Serialize};

/// Direction of a portfolio transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Buy,
    Sell,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Buy => write!(f, "Buy"),
            TransactionType::Sell => write!(f, "Sell"),
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(TransactionType::Buy),
            "sell" => Ok(TransactionType::Sell),
            other => Err(format!("unknown transaction type '{other}'")),
        }
    }
}

/// One entry of the append-only portfolio ledger.
///
/// Once stored, a transaction is never edited; the only mutation the ledger
/// supports is removing a whole record by its position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "type")]
    pub kind: TransactionType,

    pub ticker: String,

    pub shares: f64,

    pub price: f64,

    #[serde(default)]
    pub date: Option<String>,
}

impl Transaction {
    /// Cash amount of the trade (`shares × price`).
    pub fn total(&self) -> f64 {
        self.shares * self.price
    }
}

/// User input for a new transaction, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub kind: TransactionType,
    pub ticker: String,
    pub shares: f64,
    pub price: f64,
    pub date: Option<String>,
}

impl TransactionDraft {
    pub fn buy(ticker: impl Into<String>, shares: f64, price: f64) -> Self {
        Self {
            kind: TransactionType::Buy,
            ticker: ticker.into(),
            shares,
            price,
            date: None,
        }
    }

    pub fn sell(ticker: impl Into<String>, shares: f64, price: f64) -> Self {
        Self {
            kind: TransactionType::Sell,
            ticker: ticker.into(),
            shares,
            price,
            date: None,
        }
    }

    pub fn on(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }
}

impl From<Transaction> for TransactionDraft {
    fn from(tx: Transaction) -> Self {
        Self {
            kind: tx.kind,
            ticker: tx.ticker,
            shares: tx.shares,
            price: tx.price,
            date: tx.date,
        }
    }
}

/// Per-ticker aggregate derived from the ledger. Never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Holding {
    pub ticker: String,

    /// Running total of bought minus sold shares.
    pub shares: f64,

    /// Running total of bought minus sold `shares × price`.
    pub cost: f64,
}

impl Holding {
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            shares: 0.0,
            cost: 0.0,
        }
    }

    /// `cost / shares`, only defined for a long position.
    pub fn average_cost(&self) -> Option<f64> {
        if self.is_open() {
            Some(self.cost / self.shares)
        } else {
            None
        }
    }

    pub fn is_open(&self) -> bool {
        self.shares > 0.0
    }
}
