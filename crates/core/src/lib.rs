pub mod error;
pub mod event;
pub mod source;

pub use error::{DialError, Result};
pub use event::Message;
pub use source::ValueSource;
