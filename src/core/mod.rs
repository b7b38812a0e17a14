pub mod config;
pub mod config_loader;
pub mod error;
pub mod traits;
pub mod types;

pub use config::*;
pub use config_loader::*;
pub use error::*;
pub use traits::*;
pub use types::*;
