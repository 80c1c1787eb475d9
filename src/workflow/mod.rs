pub mod create_issue;
pub mod deploy;
pub mod open_mr;
pub mod project;
pub mod report;
pub mod review;
pub mod selection;
pub mod summary;

#[cfg(test)]
pub mod testing;
