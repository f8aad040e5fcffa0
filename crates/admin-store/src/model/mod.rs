//! Domain records managed by the admin store, one module per backend resource.
//!
//! Each record implements [`Resource`](resource_slice::Resource): its collection path,
//! its typed filters and payloads, and where a freshly created record lands in a list.

/// Declares a type-safe numeric identifier that serializes as a bare number and renders
/// as one in resource paths.
macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

pub(crate) use record_id;

pub mod communication;
pub mod item_return;
pub mod receivable;
pub mod template;

pub use communication::*;
pub use item_return::*;
pub use receivable::*;
pub use template::*;

fn required(field: &str, value: &str) -> Result<(), resource_slice::SliceError> {
    if value.trim().is_empty() {
        return Err(resource_slice::SliceError::Validation(format!(
            "{} is required",
            field
        )));
    }
    Ok(())
}
