//! Enrollment entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Where the payment behind an enrollment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentProvider {
    Stripe,
    Manual,
}

impl PaymentProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stripe => "stripe",
            Self::Manual => "manual",
        }
    }
}

impl fmt::Display for PaymentProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stripe" => Ok(Self::Stripe),
            "manual" => Ok(Self::Manual),
            other => Err(format!("unknown payment provider: {other}")),
        }
    }
}

/// Grants `user_id` access to `course_id`.
///
/// At most one enrollment exists per (user, course); the database enforces it.
#[derive(Debug, Clone, Serialize)]
pub struct Enrollment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub enrolled_at: DateTime<Utc>,
    pub payment_provider: Option<PaymentProvider>,
    pub payment_reference: Option<String>,
    pub amount_paid: Option<f64>,
    pub currency: Option<String>,
}

/// Input data for creating an enrollment.
#[derive(Debug, Clone)]
pub struct NewEnrollment {
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub payment_provider: Option<PaymentProvider>,
    pub payment_reference: Option<String>,
    pub amount_paid: Option<f64>,
    pub currency: Option<String>,
}

impl NewEnrollment {
    /// Enrollment in a free course; no payment data.
    pub fn free(user_id: Uuid, course_id: Uuid) -> Self {
        Self {
            user_id,
            course_id,
            payment_provider: None,
            payment_reference: None,
            amount_paid: None,
            currency: None,
        }
    }

    /// Enrollment backed by a confirmed payment.
    ///
    /// Amount and currency stay `None` when the provider did not report them.
    pub fn paid(
        user_id: Uuid,
        course_id: Uuid,
        provider: PaymentProvider,
        reference: String,
        amount: Option<f64>,
        currency: Option<String>,
    ) -> Self {
        Self {
            user_id,
            course_id,
            payment_provider: Some(provider),
            payment_reference: Some(reference),
            amount_paid: amount,
            currency,
        }
    }
}
