pub use super::account_departments::Entity as AccountDepartments;
pub use super::accounts::Entity as Accounts;
pub use super::department_links::Entity as DepartmentLinks;
pub use super::departments::Entity as Departments;
pub use super::links::Entity as Links;
pub use super::session_tokens::Entity as SessionTokens;
