mod reducer;
mod state;

pub use reducer::{reduce, DataAction};
pub use state::{offers_in_city, DataState, RequestId, RequestTracker, Resource};
