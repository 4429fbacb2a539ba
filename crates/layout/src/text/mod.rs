pub mod wrapper;

pub use wrapper::{WrappedLine, wrap_text};
