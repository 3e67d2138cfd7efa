mod gateway;
mod http;
mod transport;

pub use gateway::{CachePolicy, TrendsGateway};
pub use http::{error_from_status, HttpTransport};
pub use transport::{ApiRequest, Method, Transport};
