pub mod decode;
pub mod prepare;
