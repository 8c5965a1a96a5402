use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::stream::Stream;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::DispatchEvent;

/// An async stream of the dispatch calls recorded by a [`Dispatcher`].
///
/// Created by [`Dispatcher::to_stream`]. Calls recorded before the stream was
/// created are replayed first; later calls arrive as the action under test
/// makes them. The stream terminates once the expected sequence completes or
/// fails.
///
/// ## Examples
///
/// ```
/// use assertrx::{expect_event, test_action, ActionContext, State};
/// use futures::StreamExt;
///
/// #[derive(Clone)]
/// struct Empty;
/// impl State for Empty {}
///
/// async fn example() {
///     let (dispatcher, completion) = test_action(
///         |ctx: ActionContext<Empty>, ()| ctx.dispatch("PING"),
///         (),
///         Empty,
///         vec![expect_event!("PING")],
///     );
///
///     let mut stream = dispatcher.to_stream();
///     while let Some(event) = stream.next().await {
///         println!("observed {}", event.name);
///     }
///     completion.wait().await.unwrap();
/// }
/// ```
///
/// [`Dispatcher`]: crate::Dispatcher
/// [`Dispatcher::to_stream`]: crate::Dispatcher::to_stream
#[derive(Debug)]
#[must_use = "Streams do nothing unless polled"]
pub struct DispatchStream {
    rx: UnboundedReceiver<DispatchEvent>,
}

impl DispatchStream {
    pub(crate) fn new(rx: UnboundedReceiver<DispatchEvent>) -> Self {
        DispatchStream { rx }
    }
}

impl Stream for DispatchStream {
    type Item = DispatchEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}
