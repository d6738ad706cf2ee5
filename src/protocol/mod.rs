//! JSON request/response documents and the duration wire codec.

mod duration;
mod request;
mod response;

pub use duration::{ParseDurationError, WireDuration, format_duration, parse_duration};
pub use request::{
    DEFAULT_MAX_REDIRECTS, DEFAULT_TIMEOUT, FetchRequest, GetRequest, HeadRequest,
    ValidationError,
};
pub use response::{ErrorDocument, HeadDocument, SuccessDocument};
