mod command_bus;
mod search_request;

pub use command_bus::{BusCommand, BusHandle, CommandBus, PERFORM_SEARCH_EVENT, route_search};
pub use search_request::{Presentation, SearchRequest};
