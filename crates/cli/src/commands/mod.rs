pub mod doctor;
pub mod init;
pub mod initiative;
pub mod respond;
