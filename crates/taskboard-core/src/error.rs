use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid task update: {0}")]
    InvalidUpdate(String),
}

pub type Result<T> = std::result::Result<T, Error>;
