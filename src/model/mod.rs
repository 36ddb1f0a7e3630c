pub mod blog;
pub mod response;
pub mod tag;
pub mod validator;
