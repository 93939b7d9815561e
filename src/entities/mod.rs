pub mod prelude;

pub mod account_departments;
pub mod accounts;
pub mod department_links;
pub mod departments;
pub mod links;
pub mod session_tokens;
