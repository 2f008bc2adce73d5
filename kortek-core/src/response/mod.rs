mod shape;
mod validator;


pub use shape::*;
pub use validator::*;
