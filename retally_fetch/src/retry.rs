use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Retry an async operation, sleeping `delays[i]` seconds after the i-th
/// failure. Gives up early on errors `should_retry` rejects.
///
/// With an empty `delays` slice the operation runs exactly once.
pub async fn retry_with_backoff<F, Fut, T, E, P>(
    mut operation: F,
    delays: &[u64],
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let attempts = delays.len() + 1;
    let mut delays = delays.iter();

    let mut attempt = 0;

    loop {
        attempt += 1;
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                let Some(delay_secs) = delays.next().filter(|_| should_retry(&e)) else {
                    return Err(e);
                };
                warn!(
                    "Fetch failed (attempt {attempt}/{attempts}): {e}. Retrying after {delay_secs}s..."
                );
                sleep(Duration::from_secs(*delay_secs)).await;
            }
        }
    }
}
