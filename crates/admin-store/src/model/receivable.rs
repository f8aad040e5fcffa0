//! Accounts receivable (CXC): one open document per customer charge.
//!
//! Payments change balances the backend recomputes (status, aging), so the list is
//! refetched after every mutation.
use super::{record_id, required};
use chrono::NaiveDate;
use resource_slice::{InsertPosition, Resource, SliceError};
use serde::{Deserialize, Serialize};

record_id!(
    /// Type-safe identifier for Receivables.
    ReceivableId
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceivableStatus {
    Open,
    Partial,
    Paid,
    Overdue,
}

impl ReceivableStatus {
    /// Whether the document still accepts payments.
    pub fn is_collectible(self) -> bool {
        !matches!(self, ReceivableStatus::Paid)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receivable {
    pub id: ReceivableId,
    pub customer_id: u64,
    pub document_number: String,
    pub issued_on: NaiveDate,
    pub due_on: NaiveDate,
    pub amount: f64,
    pub balance: f64,
    pub status: ReceivableStatus,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivableFilters {
    pub status: Option<ReceivableStatus>,
    pub customer_id: Option<u64>,
    pub issued_from: Option<NaiveDate>,
    pub issued_to: Option<NaiveDate>,
}

impl ReceivableFilters {
    /// Open documents of one customer.
    pub fn open_for(customer_id: u64) -> Self {
        Self {
            status: Some(ReceivableStatus::Open),
            customer_id: Some(customer_id),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivableCreate {
    pub customer_id: u64,
    pub document_number: String,
    pub issued_on: NaiveDate,
    pub due_on: NaiveDate,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivableUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

/// Body of `POST /receivables/<id>/payments`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCreate {
    pub amount: f64,
    pub paid_on: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl PaymentCreate {
    /// Checks the payment against the document it settles, when that document is known.
    pub fn validate_against(&self, receivable: Option<&Receivable>) -> Result<(), SliceError> {
        if !(self.amount > 0.0) {
            return Err(SliceError::Validation(
                "payment amount must be positive".to_string(),
            ));
        }
        let Some(receivable) = receivable else {
            return Ok(());
        };
        if !receivable.status.is_collectible() {
            return Err(SliceError::Validation(format!(
                "document {} is already paid",
                receivable.document_number
            )));
        }
        if self.amount > receivable.balance {
            return Err(SliceError::Validation(format!(
                "payment {:.2} exceeds balance {:.2} of document {}",
                self.amount, receivable.balance, receivable.document_number
            )));
        }
        Ok(())
    }
}

impl Resource for Receivable {
    type Id = ReceivableId;
    type Filters = ReceivableFilters;
    type Create = ReceivableCreate;
    type Update = ReceivableUpdate;

    const PATH: &'static str = "/receivables";
    const NAME: &'static str = "receivables";
    const INSERT_POSITION: InsertPosition = InsertPosition::Append;
    const REFETCH_AFTER_MUTATION: bool = true;

    fn id(&self) -> &ReceivableId {
        &self.id
    }

    fn validate_create(payload: &ReceivableCreate) -> Result<(), SliceError> {
        required("document number", &payload.document_number)?;
        if !(payload.amount > 0.0) {
            return Err(SliceError::Validation("amount must be positive".to_string()));
        }
        if payload.due_on < payload.issued_on {
            return Err(SliceError::Validation(
                "due date precedes issue date".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_update(payload: &ReceivableUpdate) -> Result<(), SliceError> {
        match payload.amount {
            Some(amount) if !(amount > 0.0) => {
                Err(SliceError::Validation("amount must be positive".to_string()))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn receivable(balance: f64, status: ReceivableStatus) -> Receivable {
        Receivable {
            id: ReceivableId(3),
            customer_id: 12,
            document_number: "A-0003".into(),
            issued_on: date(1),
            due_on: date(31),
            amount: 1_000.0,
            balance,
            status,
        }
    }

    fn payment(amount: f64) -> PaymentCreate {
        PaymentCreate {
            amount,
            paid_on: date(10),
            reference: None,
        }
    }

    #[test]
    fn payment_cannot_exceed_balance() {
        let doc = receivable(400.0, ReceivableStatus::Partial);
        assert!(payment(400.0).validate_against(Some(&doc)).is_ok());
        let err = payment(400.01).validate_against(Some(&doc)).unwrap_err();
        assert!(matches!(err, SliceError::Validation(ref m) if m.contains("exceeds balance")));
    }

    #[test]
    fn paid_documents_reject_payments() {
        let doc = receivable(0.0, ReceivableStatus::Paid);
        assert!(payment(1.0).validate_against(Some(&doc)).is_err());
    }

    #[test]
    fn unknown_document_only_checks_amount() {
        assert!(payment(50.0).validate_against(None).is_ok());
        assert!(payment(0.0).validate_against(None).is_err());
        assert!(payment(f64::NAN).validate_against(None).is_err());
    }

    #[test]
    fn create_requires_consistent_dates() {
        let create = ReceivableCreate {
            customer_id: 1,
            document_number: "A-1".into(),
            issued_on: date(10),
            due_on: date(9),
            amount: 10.0,
        };
        assert!(Receivable::validate_create(&create).is_err());
    }
}
