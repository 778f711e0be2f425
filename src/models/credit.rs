use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Solde de crédits de l'utilisateur.
/// Le backend fait foi, le frontend ne fait qu'afficher et estimer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditWallet {
    #[serde(rename = "currentCredits")]
    pub current_credits: i64,
    #[serde(rename = "monthlyCredits")]
    pub monthly_credits: i64,
    #[serde(rename = "usedCredits")]
    pub used_credits: i64,
    #[serde(rename = "planName")]
    pub plan_name: String,
    #[serde(rename = "lastReset")]
    pub last_reset: DateTime<Utc>,
}

/// Ligne de l'historique de consommation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditHistoryItem {
    pub id: i64,
    #[serde(rename = "featureName")]
    pub feature_name: String,
    #[serde(rename = "creditsUsed")]
    pub credits_used: i64,
    #[serde(rename = "remainingBalance")]
    pub remaining_balance: i64,
    #[serde(rename = "transactionType")]
    pub transaction_type: String,
    pub source: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditHistory {
    #[serde(default)]
    pub items: Vec<CreditHistoryItem>,
}

/// Détail d'une estimation renvoyée par le backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateBreakdownItem {
    pub component: String,
    pub value: f64,
    #[serde(default)]
    pub label: Option<String>,
}

/// Estimation de coût renvoyée par le backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditEstimate {
    #[serde(rename = "estimatedCredits")]
    pub estimated_credits: i64,
    #[serde(default)]
    pub breakdown: Vec<EstimateBreakdownItem>,
    #[serde(rename = "currentCredits")]
    pub current_credits: i64,
    #[serde(rename = "remainingCredits")]
    pub remaining_credits: i64,
    pub sufficient: bool,
    pub premium: bool,
}
