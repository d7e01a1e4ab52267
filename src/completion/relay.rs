use anyhow::Result;
use futures_util::{Stream, StreamExt};
use std::future::Future;
use std::io::Write;

/// How a relayed stream ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// Sentinel or end of body.
    Finished,
    /// The body failed mid-stream.
    Interrupted,
    /// The caller's cancel future fired.
    Cancelled,
}

/// Echoes each delta to `out` as it arrives and returns the accumulated text.
///
/// Read errors end the relay like a normal end of stream. `cancel` is polled
/// alongside the stream; when it resolves the text received so far is kept.
/// Only failures writing to `out` are returned as errors.
pub async fn relay<S, C>(
    stream: S,
    out: &mut (dyn Write + Send),
    cancel: C,
) -> Result<(String, StreamEnd)>
where
    S: Stream<Item = Result<String>>,
    C: Future<Output = ()>,
{
    let mut stream = std::pin::pin!(stream);
    let mut cancel = std::pin::pin!(cancel);
    let mut accumulated = String::new();

    let end = loop {
        tokio::select! {
            biased;
            () = &mut cancel => break StreamEnd::Cancelled,
            next = stream.next() => match next {
                Some(Ok(chunk)) => {
                    out.write_all(chunk.as_bytes())?;
                    out.flush()?;
                    accumulated.push_str(&chunk);
                }
                Some(Err(e)) => {
                    tracing::debug!("treating read error as end of stream: {e:#}");
                    break StreamEnd::Interrupted;
                }
                None => break StreamEnd::Finished,
            },
        }
    };

    Ok((accumulated, end))
}
