//! # Store Root
//!
//! The application's state tree: one [`ResourceState`] per domain, a single intent enum
//! tagged by domain, and a reducer that routes each intent to exactly one slice.
//!
//! The three are generated from one list of `field: Resource` pairs so adding a domain
//! is a one-line change.

use crate::model::{Communication, ItemReturn, Receivable, Template};
use resource_slice::{Reducer, ResourceState, SliceIntent, SliceOf, SliceReducer};

macro_rules! app_slices {
    ($($field:ident: $resource:ty),+ $(,)?) => {
        paste::paste! {
            /// Snapshot of every domain slice.
            #[derive(Debug, Clone, Default)]
            pub struct AppState {
                $(pub $field: ResourceState<$resource>,)+
            }

            /// An intent for one domain slice.
            #[derive(Debug)]
            pub enum AppIntent {
                $([<$field:camel>](SliceIntent<$resource>),)+
            }

            impl AppIntent {
                /// `domain/operation/phase`, for logs.
                pub fn label(&self) -> String {
                    match self {
                        $(AppIntent::[<$field:camel>](intent) => {
                            format!("{}/{}", stringify!($field), intent.label())
                        })+
                    }
                }
            }

            /// Routes every intent to its slice's reducer.
            pub struct AppReducer;

            impl Reducer for AppReducer {
                type State = AppState;
                type Intent = AppIntent;

                fn reduce(mut state: AppState, intent: AppIntent) -> AppState {
                    match intent {
                        $(AppIntent::[<$field:camel>](intent) => {
                            state.$field = SliceReducer::<$resource>::reduce(state.$field, intent);
                        })+
                    }
                    state
                }

                fn label(intent: &AppIntent) -> String {
                    intent.label()
                }
            }

            $(
                impl SliceOf<$resource> for AppReducer {
                    fn wrap(intent: SliceIntent<$resource>) -> AppIntent {
                        AppIntent::[<$field:camel>](intent)
                    }

                    fn project(state: &AppState) -> &ResourceState<$resource> {
                        &state.$field
                    }
                }
            )+

            impl AppState {
                /// An empty tree whose slices all start with `page_size`.
                pub fn with_page_size(page_size: u32) -> Self {
                    Self {
                        $($field: ResourceState::with_page_size(page_size),)+
                    }
                }
            }
        }
    };
}

app_slices! {
    communications: Communication,
    receivables: Receivable,
    item_returns: ItemReturn,
    templates: Template,
}
