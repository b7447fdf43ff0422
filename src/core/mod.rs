pub mod handle;
pub mod router;

pub use crate::domain::model::{ClientSettings, RequestBody, RequestOptions, ServiceConfiguration};
pub use crate::domain::ports::{ConfigProvider, ServiceClient};
pub use crate::utils::error::Result;
