pub mod csrf;
pub mod response;
