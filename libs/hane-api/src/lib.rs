pub mod case;
pub mod entity;
pub mod error;
pub mod input;
pub mod params;
pub mod transformer;
pub mod value;

pub use hane_api_derive::Entity;

pub use entity::Entity;
pub use error::ConvertError;
pub use input::{ConversionInput, Shape};
pub use params::{ParamKeys, RequestParams};
pub use transformer::{Convert, Includes, Resolver, Transformer};
pub use value::{Fields, Value};

/// Re-exports used by `#[derive(Entity)]` expansions.
#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}
