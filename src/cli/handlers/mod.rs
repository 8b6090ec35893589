pub mod config;
pub mod decode;
pub mod encode;
pub mod options;
pub mod remove;
pub mod rename;
