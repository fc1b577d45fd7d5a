pub mod evaluate;
pub mod init;
pub mod run;
pub mod validate;
