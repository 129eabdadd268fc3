mod core;
mod pipelines;
mod transport;

pub use self::core::{BitbucketClient, DEFAULT_API_URL};
pub use self::transport::{HttpTransport, ReqwestTransport};

#[cfg(test)]
pub(crate) use self::transport::fake;
