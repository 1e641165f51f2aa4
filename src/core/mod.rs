pub mod client;
pub mod request;

pub use crate::domain::model::{
    HttpMethod, LoginFormMode, LoginUser, MultipartField, OidcClient, PhotoFile, Product,
    RawResponse, RegistrationUser, RequestBody, RequestDescriptor, RequestOverrides,
    ResponseType, Testimonial,
};
pub use crate::domain::ports::{TokenProvider, Transport};
pub use crate::utils::error::Result;
