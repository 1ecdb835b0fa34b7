//! Cross-platform task spawning
//!
//! Native builds run futures on the tokio runtime created by `run_native`. Web builds
//! run them on the JavaScript event loop through `wasm-bindgen-futures`, which also
//! accepts the `!Send` futures returned by browser APIs.

use std::future::Future;

/// Spawn a fire-and-forget task on the tokio runtime.
///
/// Must be called from within the runtime context (the UI thread under `run_native`).
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn<F>(future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    #[cfg(feature = "profiling")]
    {
        tokio::spawn(async move {
            profiling::scope!(
                "async_runtime::spawn",
                format!("task_type={}", std::any::type_name::<F>()).as_str()
            );
            future.await
        });
    }
    #[cfg(not(feature = "profiling"))]
    {
        tokio::spawn(future);
    }
}

/// Spawn a fire-and-forget task on the JavaScript event loop.
#[cfg(target_arch = "wasm32")]
pub fn spawn<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(future);
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_runs_task() {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .build()
            .unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel();

        rt.block_on(async {
            spawn(async move {
                let _ = tx.send(42);
            });
            assert_eq!(rx.await.unwrap(), 42);
        });
    }
}
