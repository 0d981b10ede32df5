use crate::mpd::{MpdError, MpdResult, MpdSession, NowPlaying};

/// Replace the server queue with `uris[start..]` and start playing the first one.
///
/// Empty URIs are skipped. `clear` and `add` failures abort; a failed
/// `playid` falls back to `play 0`, and a failure there is only logged.
pub async fn enqueue_and_play(
    session: &dyn MpdSession,
    uris: &[String],
    start: usize,
) -> MpdResult<NowPlaying> {
    let mut pending = uris
        .iter()
        .skip(start)
        .map(String::as_str)
        .filter(|uri| !uri.is_empty());

    let Some(first) = pending.next() else {
        return Err(MpdError::EmptyEnqueue);
    };

    session.queue_clear().await?;
    let first_id = session.queue_add_id(first).await?;
    let mut queued = 1usize;
    for uri in pending {
        session.queue_add(uri).await?;
        queued += 1;
    }
    tracing::debug!(queued, ?first_id, "queue replaced");

    let started = match first_id {
        Some(id) => match session.play_id(id).await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(id, error = %e, "playid failed");
                false
            }
        },
        None => false,
    };
    if !started {
        if let Err(e) = session.play_at(0).await {
            tracing::warn!(error = %e, "play 0 failed");
        }
    }

    session.now_playing().await
}
