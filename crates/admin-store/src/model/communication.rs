//! Outbound messages to customers (invoice notices, payment reminders).
//!
//! Newest first: a created communication is prepended, and the list is not refetched
//! after a mutation.
use super::{record_id, required};
use chrono::NaiveDate;
use resource_slice::{InsertPosition, Resource, SliceError};
use serde::{Deserialize, Serialize};

record_id!(
    /// Type-safe identifier for Communications.
    CommunicationId
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Sms,
    Whatsapp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommunicationStatus {
    Draft,
    Queued,
    Sent,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Communication {
    pub id: CommunicationId,
    pub subject: String,
    pub channel: Channel,
    pub recipient: String,
    pub status: CommunicationStatus,
    pub created_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationFilters {
    pub status: Option<CommunicationStatus>,
    pub channel: Option<Channel>,
    pub recipient: Option<String>,
    pub created_from: Option<NaiveDate>,
    pub created_to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationCreate {
    pub subject: String,
    pub channel: Channel,
    pub recipient: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl Resource for Communication {
    type Id = CommunicationId;
    type Filters = CommunicationFilters;
    type Create = CommunicationCreate;
    type Update = CommunicationUpdate;

    const PATH: &'static str = "/communications";
    const NAME: &'static str = "communications";
    const INSERT_POSITION: InsertPosition = InsertPosition::Prepend;

    fn id(&self) -> &CommunicationId {
        &self.id
    }

    fn validate_create(payload: &CommunicationCreate) -> Result<(), SliceError> {
        required("subject", &payload.subject)?;
        required("recipient", &payload.recipient)?;
        if payload.channel == Channel::Email && !payload.recipient.contains('@') {
            return Err(SliceError::Validation(format!(
                "'{}' is not an email address",
                payload.recipient
            )));
        }
        Ok(())
    }

    fn validate_update(payload: &CommunicationUpdate) -> Result<(), SliceError> {
        if let Some(subject) = &payload.subject {
            required("subject", subject)?;
        }
        if let Some(recipient) = &payload.recipient {
            required("recipient", recipient)?;
        }
        Ok(())
    }
}
