//! Booking flow: screens, guards and the reducer that sequences them.

mod actions;
mod environment;
mod reducer;
mod types;


pub use actions::FlowAction;
pub use environment::{DEFAULT_CONFIRMATION_HOLD, DEFAULT_FALLBACK_TOKEN, FlowEnvironment};
pub use reducer::FlowReducer;
pub use types::{DETAIL_UNAVAILABLE, DetailView, FlowState, NO_SEATS_SELECTED, Redirect, Screen};
