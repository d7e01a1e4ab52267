use anyhow::Result;
use futures_util::StreamExt;
use std::future::Future;

use super::registry::Context;
use crate::completion::{StreamEnd, relay};
use crate::ui::{Spinner, Style, write_error};

/// Resolves on Ctrl+C in an interactive session; never resolves otherwise.
pub(super) async fn interrupted(interactive: bool) {
    if interactive && tokio::signal::ctrl_c().await.is_ok() {
        return;
    }
    std::future::pending::<()>().await;
}

/// Sends `text` as a user turn and streams the reply.
///
/// The user message is appended first and stays even if the request never
/// reaches the service. A reply, complete or not, is appended only once a
/// response stream was opened.
pub async fn run_chat_turn(text: &str, ctx: &mut Context<'_>) -> Result<()> {
    let cancel = interrupted(ctx.interactive);
    run_chat_turn_until(text, ctx, cancel).await
}

/// Like [`run_chat_turn`], stopping early when `cancel` resolves.
///
/// Cancelling before the response stream opens counts as a failed request.
pub async fn run_chat_turn_until<C>(text: &str, ctx: &mut Context<'_>, cancel: C) -> Result<()>
where
    C: Future<Output = ()>,
{
    ctx.state.push_user(text);
    let mut cancel = std::pin::pin!(cancel);

    let spinner = if ctx.interactive {
        Spinner::new("Thinking...")
    } else {
        Spinner::hidden()
    };

    let request = ctx
        .services
        .completion
        .stream_chat(ctx.state.active_model(), ctx.state.transcript());
    let opened = tokio::select! {
        biased;
        () = &mut cancel => None,
        result = request => Some(result),
    };

    let stream = match opened {
        Some(Ok(stream)) => stream,
        Some(Err(e)) => {
            spinner.stop();
            write_error(ctx.out, format!("{e:#}"))?;
            return Ok(());
        }
        None => {
            spinner.stop();
            writeln!(ctx.out, "{}", Style::hint("(interrupted)"))?;
            return Ok(());
        }
    };

    // Dropping the spinner clears it; do that as soon as text arrives.
    let mut spinner = Some(spinner);
    let stream = stream.inspect(move |_| {
        spinner.take();
    });

    let (reply, end) = relay(stream, ctx.out, &mut cancel).await?;
    writeln!(ctx.out)?;
    if end == StreamEnd::Cancelled {
        writeln!(ctx.out, "{}", Style::hint("(interrupted)"))?;
    }

    tracing::debug!(?end, chars = reply.len(), "completion finished");
    ctx.state.push_assistant(reply);
    Ok(())
}
