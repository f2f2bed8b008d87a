mod resource;
mod signature;

pub use resource::{canonicalized_resource, obs_url_encode};
pub use signature::ObsSignature;
