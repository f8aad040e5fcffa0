//! Domain clients: a [`SliceHandle`](resource_slice::SliceHandle) per resource plus the
//! operations only that resource has.

pub mod communication_client;
pub mod item_return_client;
pub mod receivable_client;
pub mod template_client;

pub use communication_client::CommunicationClient;
pub use item_return_client::ItemReturnClient;
pub use receivable_client::ReceivableClient;
pub use template_client::TemplateClient;
