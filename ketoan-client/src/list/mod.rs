//! Paginated list views
//!
//! A [`QueryController`] owns the search/filter/sort/page state of one list
//! view, fetches pages through a [`ListSource`] and publishes the result as
//! a [`ListSnapshot`].

mod controller;
mod snapshot;
mod source;

pub use controller::{FetchOutcome, FetchTicket, QueryController};
pub use snapshot::{ListSnapshot, LoadStatus};
pub use source::{Endpoint, ListSource, ListView};
