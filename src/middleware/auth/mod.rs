pub mod access;
pub mod bearer;
