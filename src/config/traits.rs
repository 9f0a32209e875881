use crate::error::Result;
use serde::{de::DeserializeOwned, Serialize};

/// A named, self-validating block of [`AppConfig`](super::AppConfig).
pub trait ConfigSection: Serialize + DeserializeOwned + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<()>;
}
