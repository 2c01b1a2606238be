use crate::error::AppError;
use crate::metrics;

pub async fn metrics_handler() -> Result<String, AppError> {
    metrics::render().map_err(AppError::Internal)
}
