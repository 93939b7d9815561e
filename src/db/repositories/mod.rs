pub mod account;
pub mod department;
pub mod link;
pub mod session;
