//! Access control for the intake bot: privileged operators and the ban list.
pub mod access_control;
pub mod ban_list;
pub mod privileged;

pub use access_control::*;
pub use ban_list::*;
pub use privileged::*;
