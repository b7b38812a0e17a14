pub mod token;

pub use token::{mask_secret_in, mask_token, redact_url};
