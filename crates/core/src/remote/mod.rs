mod error;
mod traits;

pub use error::{RemoteError, Result};
pub use traits::RemoteSource;
