pub mod accounts;

pub use accounts::{Account, AccountRole, AccountsPort, NewAccount};
