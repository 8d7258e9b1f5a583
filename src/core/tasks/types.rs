use crate::core::{
    Candidate,
    Enrichment,
    TaberuError,
};

#[derive(Debug)]
pub enum TaskResult {
    Directory(Result<Vec<Candidate>, TaberuError>),
    Enrichment { issued_id: u32, result: Result<Enrichment, TaberuError> },
}

impl TaskResult {
    pub fn task_type(&self) -> &'static str {
        match self {
            TaskResult::Directory(_) => "directory",
            TaskResult::Enrichment { .. } => "enrichment",
        }
    }
}
