pub mod calc;
pub mod config;
pub mod format;
pub mod input;
pub mod replay;
pub mod run;
