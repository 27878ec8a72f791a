pub mod grader;
pub mod list;
pub mod score;
pub mod session;
