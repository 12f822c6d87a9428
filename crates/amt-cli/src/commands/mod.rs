pub mod assessment;
pub mod init;
pub mod report;
pub mod status;
