use std::future::Future;
use std::marker::PhantomData;
use std::pin::{pin, Pin};
use std::task::{Context, Poll};

use futures::channel::oneshot;
use futures::future::{self, Either};
use futures::Stream;
use serde::de::DeserializeOwned;

use super::{CodecError, Decoder};
use crate::RunError;

enum Source {
    Reading(Decoder),
    Exhausted,
    Failed,
}

/// Requests decoded lazily from a [`Decoder`], for client-streaming calls.
///
/// The stream ends when the input is exhausted. A request that fails to
/// decode never ends the stream: it stays pending forever, so the request
/// body is not closed, and the error goes to the paired [`DecodeFailure`].
/// Run the call through [`DecodeFailure::guard`] to abort it.
pub struct RequestStream<T> {
    source: Source,
    failure: Option<oneshot::Sender<CodecError>>,
    _message: PhantomData<fn() -> T>,
}

impl<T> Unpin for RequestStream<T> {}

impl<T> RequestStream<T> {
    /// Wrap `decoder`, returning the stream and its failure signal.
    pub fn new(decoder: Decoder) -> (Self, DecodeFailure) {
        let (sender, receiver) = oneshot::channel();
        let stream = Self { source: Source::Reading(decoder), failure: Some(sender), _message: PhantomData };
        (stream, DecodeFailure(receiver))
    }
}

impl<T: DeserializeOwned> Stream for RequestStream<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<T>> {
        let this = self.get_mut();
        let decoder = match &mut this.source {
            Source::Reading(decoder) => decoder,
            Source::Exhausted => return Poll::Ready(None),
            Source::Failed => return Poll::Pending,
        };
        match decoder.decode::<T>() {
            Ok(Some(message)) => Poll::Ready(Some(message)),
            Ok(None) => {
                this.source = Source::Exhausted;
                Poll::Ready(None)
            }
            Err(err) => {
                tracing::debug!("request stream stopped: {err}");
                this.source = Source::Failed;
                if let Some(sender) = this.failure.take() {
                    let _ = sender.send(err);
                }
                Poll::Pending
            }
        }
    }
}

/// Resolves with the error that stopped a [`RequestStream`].
///
/// Stays pending if the stream finishes cleanly.
#[derive(Debug)]
pub struct DecodeFailure(oneshot::Receiver<CodecError>);

impl DecodeFailure {
    /// Drive `call` unless the request stream fails first.
    ///
    /// On a decode failure `call` is dropped before it completes, which
    /// cancels the RPC instead of half-closing it. A failure is reported
    /// even when `call` finished in the same poll.
    pub async fn guard<F, T, E>(self, call: F) -> crate::Result<T>
    where
        F: Future<Output = Result<T, E>>,
        RunError: From<E>,
    {
        let call = pin!(call);
        match future::select(call, self).await {
            Either::Left((result, mut failure)) => match failure.0.try_recv() {
                Ok(Some(err)) => Err(err.into()),
                _ => Ok(result?),
            },
            Either::Right((err, _call)) => Err(err.into()),
        }
    }
}

impl Future for DecodeFailure {
    type Output = CodecError;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<CodecError> {
        match Pin::new(&mut self.0).poll(cx) {
            Poll::Ready(Ok(err)) => Poll::Ready(err),
            // sender dropped: the stream ended without failing
            Poll::Ready(Err(oneshot::Canceled)) | Poll::Pending => Poll::Pending,
        }
    }
}

/// Stream over already decoded requests, for bidirectional calls.
///
/// Paired with a [`Sent`] future that resolves once the last request has
/// been handed to the transport and the stream has ended.
pub fn send_all<T>(messages: Vec<T>) -> (SendAll<T>, Sent) {
    let (sender, receiver) = oneshot::channel();
    (SendAll { messages: messages.into_iter(), done: Some(sender) }, Sent(receiver))
}

/// See [`send_all`].
#[derive(Debug)]
pub struct SendAll<T> {
    messages: std::vec::IntoIter<T>,
    done: Option<oneshot::Sender<()>>,
}

impl<T> Unpin for SendAll<T> {}

impl<T> Stream for SendAll<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<T>> {
        let this = self.get_mut();
        match this.messages.next() {
            Some(message) => Poll::Ready(Some(message)),
            None => {
                if let Some(done) = this.done.take() {
                    let _ = done.send(());
                }
                Poll::Ready(None)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) { self.messages.size_hint() }
}

/// Resolves once a [`SendAll`] stream has ended or been dropped.
#[derive(Debug)]
pub struct Sent(oneshot::Receiver<()>);

impl Future for Sent {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        Pin::new(&mut self.0).poll(cx).map(|_| ())
    }
}
