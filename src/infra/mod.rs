pub mod git;
pub mod gitlab;
pub mod openai;
pub mod terminal;
