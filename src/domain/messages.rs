//! Response messages shared by pipelines and routes.

pub const INVALID_SEARCH_CRITERIA: &str =
    "The provided sort code or account number did not match the expected format";

pub const NO_ACCOUNT_FOUND: &str =
    "Unable to find an account matching this sort code and account number";

pub const CREATE_ACCOUNT_FAILED: &str = "Error happened during creating new account";

pub const INVALID_TRANSACTION: &str = "Account information is invalid or transaction has been denied for your protection. Please try again.";

pub const INSUFFICIENT_ACCOUNT_BALANCE: &str = "Your account does not have sufficient balance";

pub const SUCCESS: &str = "Operation completed successfully";
