pub mod contact;
pub mod home;
pub mod submissions;
