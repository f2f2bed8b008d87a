mod obs;
mod store;
mod transport;
mod xml;

pub use obs::{CreateBucketOptions, ObsClient};
pub use store::ObjectStore;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
