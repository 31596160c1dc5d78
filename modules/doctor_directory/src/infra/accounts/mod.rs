pub mod http;
pub mod local;

pub use http::HttpAccountsClient;
pub use local::LocalAccounts;
