/// Liveness check: confirms the service is up.
pub async fn index() -> &'static str {
    "Credit System API is up."
}
