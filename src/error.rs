use thiserror::Error;

/// Errors reported by lookups on an [`AvlTreeMap`](crate::AvlTreeMap).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("key not in tree")]
    ElementNotFound,
}

pub type Result<T> = std::result::Result<T, Error>;
