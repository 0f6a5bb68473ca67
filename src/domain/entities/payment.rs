//! Manual payment entity (offline Ethiopian payment methods).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle of a manual payment.
///
/// `pending_verification` is the only state that can change; both review
/// outcomes are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    PendingVerification,
    Verified,
    Rejected,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingVerification => "pending_verification",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending_verification" => Ok(Self::PendingVerification),
            "verified" => Ok(Self::Verified),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("unknown payment status: {other}")),
        }
    }
}

/// Supported offline payment channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManualPaymentMethod {
    Telebirr,
    CbeBirr,
    Cbe,
    Awash,
    Dashen,
    Abyssinia,
    BankTransfer,
}

impl ManualPaymentMethod {
    pub const ALL: [ManualPaymentMethod; 7] = [
        Self::Telebirr,
        Self::CbeBirr,
        Self::Cbe,
        Self::Awash,
        Self::Dashen,
        Self::Abyssinia,
        Self::BankTransfer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Telebirr => "telebirr",
            Self::CbeBirr => "cbe_birr",
            Self::Cbe => "cbe",
            Self::Awash => "awash",
            Self::Dashen => "dashen",
            Self::Abyssinia => "abyssinia",
            Self::BankTransfer => "bank_transfer",
        }
    }
}

impl fmt::Display for ManualPaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ManualPaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("unknown payment method: {s}"))
    }
}

/// A submitted proof of an offline payment.
#[derive(Debug, Clone, Serialize)]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub amount: f64,
    pub currency: String,
    pub payment_method: ManualPaymentMethod,
    pub payer_account: Option<String>,
    pub transaction_id: String,
    pub proof_path: String,
    pub proof_content_type: String,
    pub status: PaymentStatus,
    pub rejection_reason: Option<String>,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    pub fn is_pending(&self) -> bool {
        self.status == PaymentStatus::PendingVerification
    }
}

/// Input data for recording a manual payment.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub amount: f64,
    pub currency: String,
    pub payment_method: ManualPaymentMethod,
    pub payer_account: Option<String>,
    pub transaction_id: String,
    pub proof_path: String,
    pub proof_content_type: String,
}
