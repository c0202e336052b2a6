// Saved resumes and cover letters, owned by the signed-in account.

pub mod handlers;
pub mod store;
