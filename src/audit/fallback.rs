//! Ordered-fallback combinator: walk a candidate list, first success wins.

use std::future::Future;

/// Try `attempt` against each candidate in order and return the first
/// `Some` it produces. `None` once the list is exhausted. There is no
/// delay between attempts; moving to the next candidate IS the retry
/// policy.
pub async fn first_success<C, T, F, Fut>(candidates: &[C], mut attempt: F) -> Option<T>
where
    C: Clone,
    F: FnMut(C) -> Fut,
    Fut: Future<Output = Option<T>>,
{
    for candidate in candidates {
        if let Some(value) = attempt(candidate.clone()).await {
            return Some(value);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_first_successful_candidate() {
        let models = ["a", "b", "c", "d"];
        let mut tried = Vec::new();

        let got = first_success(&models, |m: &str| {
            tried.push(m);
            async move { (m == "c").then(|| format!("{m}!")) }
        })
        .await;

        assert_eq!(got.as_deref(), Some("c!"));
        // Stops at the first success; "d" is never attempted.
        assert_eq!(tried, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn exhaustion_yields_none() {
        let got: Option<u32> = first_success(&[1, 2, 3], |_| async { None }).await;
        assert!(got.is_none());
    }

    #[tokio::test]
    async fn empty_candidate_list_yields_none() {
        let got = first_success::<u32, u32, _, _>(&[], |_| async { Some(1) }).await;
        assert!(got.is_none());
    }
}
