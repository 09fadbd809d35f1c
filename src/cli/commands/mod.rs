//! CLI command implementations

pub mod cache;
pub mod config;
pub mod inspect;
pub mod list;
pub mod resolve;
pub mod warm;

pub use cache::execute as cache;
pub use config::execute as config;
pub use inspect::execute as inspect;
pub use list::execute as list;
pub use resolve::execute as resolve;
pub use resolve::show;
pub use warm::execute as warm;
