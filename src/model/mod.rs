pub mod attendance;
pub mod employee;
pub mod problem;
pub mod role;
pub mod user;
