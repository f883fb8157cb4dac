use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::task::JoinHandle;

/// Wrapper around [`tokio::task::JoinHandle`] that aborts the task once dropped.
///
/// Owning one of these scopes a background task to its owner.
#[derive(Debug)]
pub struct AbortingJoinHandle<T>(JoinHandle<T>);

impl<T> Future for AbortingJoinHandle<T> {
	type Output = <JoinHandle<T> as Future>::Output;

	fn poll(self: Pin<&mut Self>, context: &mut Context<'_>) -> Poll<Self::Output> {
		Pin::new(&mut self.get_mut().0).poll(context)
	}
}

impl<T> From<JoinHandle<T>> for AbortingJoinHandle<T> {
	fn from(join_handle: JoinHandle<T>) -> Self {
		Self(join_handle)
	}
}

impl<T> Drop for AbortingJoinHandle<T> {
	fn drop(&mut self) {
		self.0.abort();
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use tokio::sync::oneshot;

	#[tokio::test]
	async fn dropping_the_handle_should_abort_the_task() {
		let (sender, receiver) = oneshot::channel::<()>();
		let handle = AbortingJoinHandle::from(tokio::spawn(async move {
			std::future::pending::<()>().await;
			drop(sender);
		}));

		drop(handle);

		// the sender is only dropped without sending if the task was aborted
		assert!(receiver.await.is_err());
	}

	#[tokio::test]
	async fn awaiting_the_handle_should_return_the_result_of_the_task() {
		let handle = AbortingJoinHandle::from(tokio::spawn(async { 42 }));
		assert_eq!(42, handle.await.expect("Task failed"));
	}
}
