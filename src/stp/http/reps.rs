use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::stp::domain;

/// A Transaction-shaped STP payload, as submitted to the validate and
/// process endpoints. With an `id`, execution updates that plan row;
/// without one, a new ACTIVE plan is recorded.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StpTransactionPayload {
    pub id: Option<i64>,
    pub client_id: i64,
    pub amount: Decimal,
    pub from_fund: String,
    pub to_fund: String,
    pub frequency: String,
    pub next_transaction_date: NaiveDate,
    pub start_date: Option<NaiveDate>,
    pub end_date: NaiveDate,
    pub description: Option<String>,
}

impl TryFrom<StpTransactionPayload> for domain::StpTransfer {
    type Error = domain::StpError;

    fn try_from(payload: StpTransactionPayload) -> Result<Self, Self::Error> {
        Self::new(
            payload.id,
            payload.client_id,
            payload.amount,
            payload.from_fund,
            payload.to_fund,
            payload.frequency,
            payload.next_transaction_date,
            payload.start_date,
            payload.end_date,
            payload.description,
        )
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StpTransaction {
    pub id: i64,
    pub client_id: i64,
    pub client_name: String,
    pub amount: Decimal,
    pub from_fund: Option<String>,
    pub to_fund: Option<String>,
    pub frequency: Option<String>,
    pub next_transaction_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub remaining_amount: Option<Decimal>,
    pub source_balance: Option<Decimal>,
    pub status: String,
}

impl From<&domain::StpPlan> for StpTransaction {
    fn from(plan: &domain::StpPlan) -> Self {
        Self {
            id: plan.id,
            client_id: plan.client_id,
            client_name: plan.client_name.clone(),
            amount: plan.amount,
            from_fund: plan.from_fund.clone(),
            to_fund: plan.to_fund.clone(),
            frequency: plan.frequency.clone(),
            next_transaction_date: plan.next_transaction_date,
            start_date: plan.start_date,
            end_date: plan.end_date,
            remaining_amount: plan.remaining_amount,
            source_balance: plan.source_balance,
            status: plan.status.clone(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StpSummary {
    pub active_stps: i64,
    pub executing_today: i64,
    pub expiring_next3_months: i64,
    pub zero_balance_count: i64,
    pub monthly_trends: Vec<MonthlyTrend>,
}

#[derive(Serialize)]
pub struct MonthlyTrend {
    pub month: String,
    pub amount: Decimal,
    pub count: i64,
}

impl From<&domain::StpSummary> for StpSummary {
    fn from(summary: &domain::StpSummary) -> Self {
        Self {
            active_stps: summary.active_stps,
            executing_today: summary.executing_today,
            expiring_next3_months: summary.expiring_next_3_months,
            zero_balance_count: summary.zero_balance_count,
            monthly_trends: summary
                .monthly_trends
                .iter()
                .map(|trend| MonthlyTrend {
                    month: trend.month.clone(),
                    amount: trend.amount,
                    count: trend.count,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_serializes_with_wire_field_names() {
        let summary = StpSummary {
            active_stps: 2,
            executing_today: 1,
            expiring_next3_months: 0,
            zero_balance_count: 1,
            monthly_trends: vec![MonthlyTrend {
                month: "2024-01".to_owned(),
                amount: Decimal::new(400, 0),
                count: 1,
            }],
        };

        let value = serde_json::to_value(&summary).unwrap();

        assert_eq!(2, value["activeStps"]);
        assert_eq!(1, value["executingToday"]);
        assert_eq!(0, value["expiringNext3Months"]);
        assert_eq!(1, value["zeroBalanceCount"]);
        assert_eq!("2024-01", value["monthlyTrends"][0]["month"]);
        assert_eq!(1, value["monthlyTrends"][0]["count"]);
    }

    #[test]
    fn payload_accepts_camel_case_fields() {
        let payload: StpTransactionPayload = serde_json::from_value(serde_json::json!({
            "clientId": 21,
            "amount": 400,
            "fromFund": "F1",
            "toFund": "F2",
            "frequency": "monthly",
            "nextTransactionDate": "2024-01-15",
            "endDate": "2024-06-15"
        }))
        .unwrap();

        assert_eq!(None, payload.id);
        assert_eq!(21, payload.client_id);
        assert_eq!("F1", payload.from_fund);
        assert_eq!("monthly", payload.frequency);
    }
}
