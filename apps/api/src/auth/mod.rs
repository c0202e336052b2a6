// Accounts and sessions: Argon2id password hashes, HS256 bearer tokens.

pub mod accounts;
pub mod extractor;
pub mod handlers;
pub mod jwt;
pub mod password;

pub use extractor::AuthUser;
