pub mod coerce;
pub mod context;
pub mod error;
pub mod iter;
pub mod order;
pub mod stdlib;
pub mod value;

// Re-export the surface a host embedding the library needs
pub use context::{BasicContext, Context, Event};
pub use error::OpError;
pub use order::{order, structural_eq, Order};
pub use stdlib::call;
pub use value::{Callable, CallableFn, Kind, Pattern, Value, ValueFuture, ValueMap};
