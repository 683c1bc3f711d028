pub mod enums;
pub mod linked_account;
