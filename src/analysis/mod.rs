//! Serde types for the financial analysis exchange, plus a gate that keeps
//! only the newest response when requests overlap.
//!
//! The analysis service is free-form: numeric fields arrive as numbers,
//! plain strings, or strings like `"$85,000"`. Values are kept as raw JSON
//! and parsed on access.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body sent to the analysis service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialProfile {
    pub prompt: String,
    pub income: f64,
    pub savings: f64,
    pub debt: f64,
}

impl FinancialProfile {
    pub fn new(prompt: impl Into<String>, income: f64, savings: f64, debt: f64) -> Self {
        Self {
            prompt: prompt.into(),
            income,
            savings,
            debt,
        }
    }

    /// Debt divided by income, or `None` when income is not positive.
    pub fn debt_to_income(&self) -> Option<f64> {
        (self.income > 0.0).then(|| self.debt / self.income)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    #[serde(default, alias = "annual_income")]
    pub annual_income: Value,
    #[serde(default)]
    pub savings: Value,
    #[serde(default)]
    pub debt: Value,
    #[serde(default, alias = "loan_recommendation")]
    pub loan_recommendation: Value,
    #[serde(default, alias = "potential_interest_rate")]
    pub potential_interest_rate: Value,
    #[serde(default, alias = "overall_financial_health")]
    pub overall_financial_health: Value,
    #[serde(default, alias = "risk_assessment")]
    pub risk_assessment: Value,
}

impl Analysis {
    pub fn annual_income(&self) -> Option<f64> {
        lenient_number(&self.annual_income)
    }

    pub fn savings(&self) -> Option<f64> {
        lenient_number(&self.savings)
    }

    pub fn debt(&self) -> Option<f64> {
        lenient_number(&self.debt)
    }

    /// Interest rate as a percentage, e.g. `6.5` for `"6.5%"`.
    pub fn interest_rate(&self) -> Option<f64> {
        lenient_number(&self.potential_interest_rate)
    }

    /// Whether the service recommends a loan, when it answered yes or no.
    pub fn loan_recommended(&self) -> Option<bool> {
        match &self.loan_recommendation {
            Value::Bool(flag) => Some(*flag),
            Value::String(text) => lenient_yes_no(text),
            _ => None,
        }
    }

    pub fn financial_health(&self) -> Option<String> {
        lenient_text(&self.overall_financial_health)
    }

    pub fn risk(&self) -> Option<String> {
        lenient_text(&self.risk_assessment)
    }
}

/// Response body returned by the analysis service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisPayload {
    #[serde(default)]
    pub analysis: Analysis,
    #[serde(default, alias = "text_analysis")]
    pub text_analysis: String,
}

impl AnalysisPayload {
    pub fn from_json_str(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

fn lenient_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => {
            let digits: String = text
                .trim()
                .chars()
                .filter(|ch| !matches!(ch, '$' | ',' | '%' | ' '))
                .collect();
            digits.parse().ok()
        }
        _ => None,
    }
}

fn lenient_yes_no(text: &str) -> Option<bool> {
    let lowered = text.trim().to_ascii_lowercase();
    let first = lowered
        .split(|ch: char| !ch.is_ascii_alphanumeric())
        .find(|word| !word.is_empty())?;
    match first {
        "yes" | "true" | "approved" | "recommended" | "eligible" => Some(true),
        "no" | "false" | "denied" | "not" | "ineligible" => Some(false),
        _ => None,
    }
}

fn lenient_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) if text.trim().is_empty() => None,
        Value::String(text) => Some(text.trim().to_string()),
        other => Some(other.to_string()),
    }
}

/// Sequence number handed out when a request starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Drops responses that arrive for anything but the latest request.
///
/// Each ticket is accepted at most once.
#[derive(Debug, Default)]
pub struct ResponseGate {
    issued: AtomicU64,
    accepted: AtomicU64,
}

impl ResponseGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> RequestTicket {
        RequestTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }

    pub fn accept<T>(&self, ticket: RequestTicket, payload: T) -> Option<T> {
        if !self.is_current(ticket) {
            return None;
        }
        let previous = self.accepted.fetch_max(ticket.0, Ordering::SeqCst);
        (previous < ticket.0).then_some(payload)
    }
}
