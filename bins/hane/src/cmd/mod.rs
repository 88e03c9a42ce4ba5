pub mod convert;
pub mod make;
