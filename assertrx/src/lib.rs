mod dispatch_event;
mod dispatcher;
mod event_stream;
mod sequence_error;
pub mod macros;

pub use action_test::*;
pub use dispatch_event::*;
pub use dispatcher::*;
pub use event_stream::*;
pub use sequence_error::*;

pub trait State: Clone + Send + Sync + 'static {}
