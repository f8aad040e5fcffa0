//! Shared test utilities: a sample resource and a mock HTTP backend.

#![allow(dead_code, unused_imports)]

pub mod mock_backend;

use resource_slice::{
    InsertPosition, PaginatedResponse, Reducer, Resource, ResourceState, SliceError,
    SliceIntent, SliceOf, SliceReducer,
};
use serde::{Deserialize, Serialize};

/// A minimal receivable-like record used across the integration tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Charge {
    pub id: u64,
    pub customer_id: u64,
    pub status: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeCreate {
    pub customer_id: u64,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ChargeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

impl Resource for Charge {
    type Id = u64;
    type Filters = ChargeFilters;
    type Create = ChargeCreate;
    type Update = ChargeUpdate;

    const PATH: &'static str = "/charges";
    const NAME: &'static str = "charges";
    const INSERT_POSITION: InsertPosition = InsertPosition::Append;

    fn id(&self) -> &u64 {
        &self.id
    }

    fn validate_create(payload: &ChargeCreate) -> Result<(), SliceError> {
        if payload.amount <= 0.0 {
            return Err(SliceError::Validation("amount must be positive".into()));
        }
        Ok(())
    }
}

/// Store root holding a single `Charge` slice.
#[derive(Debug, Clone, Default)]
pub struct TestState {
    pub charges: ResourceState<Charge>,
}

pub struct TestReducer;

impl Reducer for TestReducer {
    type State = TestState;
    type Intent = SliceIntent<Charge>;

    fn reduce(mut state: TestState, intent: SliceIntent<Charge>) -> TestState {
        state.charges = SliceReducer::<Charge>::reduce(state.charges, intent);
        state
    }
}

impl SliceOf<Charge> for TestReducer {
    fn wrap(intent: SliceIntent<Charge>) -> SliceIntent<Charge> {
        intent
    }

    fn project(state: &TestState) -> &ResourceState<Charge> {
        &state.charges
    }
}

pub fn charge(id: u64, status: &str) -> Charge {
    Charge {
        id,
        customer_id: 100 + id,
        status: status.to_string(),
        amount: 250.0,
    }
}

pub fn page(items: Vec<Charge>, page_number: u32, page_size: u32, total: u64) -> PaginatedResponse<Charge> {
    let total_pages = total.div_ceil(u64::from(page_size)) as u32;
    PaginatedResponse {
        total: items.len() as u64,
        data: items,
        page_number,
        page_size,
        total_pages,
        total_results: total,
    }
}
