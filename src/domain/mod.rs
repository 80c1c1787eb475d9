pub mod branch;
pub mod issue;
pub mod merge_request;
pub mod pipeline;
pub mod schedule;
pub mod template;
