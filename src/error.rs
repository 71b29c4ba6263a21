use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoardError {
    /// Missing or blank required input.
    #[error("{0}")]
    Validation(String),

    #[error("這家餐廳（同地址）已經投稿過了！")]
    Duplicate,

    #[error("找不到編號為 {0} 的餐廳")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
