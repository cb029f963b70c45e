mod changes;
mod error;
mod traits;

pub use changes::StoreChange;
pub use error::{RepositoryError, Result};
pub use traits::{ChangeFeed, LocalStore, RecipeStore, UserStore};
