use kanal::AsyncSender;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::sync::CancellationToken;

/// Forward non-blank input lines to the annotation loop until EOF or cancel.
/// Dropping the sender on return closes the channel.
pub async fn line_reader<R>(
    reader: R,
    cancel: CancellationToken,
    line_tx: AsyncSender<String>,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("Line reader cancelled");
                break;
            }
            line = lines.next_line() => line?,
        };

        let Some(line) = line else {
            tracing::debug!("Input closed");
            break;
        };

        if line.trim().is_empty() {
            continue;
        }

        line_tx.send(line).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn forwards_non_blank_lines() {
        let (tx, rx) = kanal::bounded_async(8);
        let _keep_open = tx.clone();
        let input: &[u8] = "你好\n\n  \n世界\n".as_bytes();

        line_reader(input, CancellationToken::new(), tx).await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), "你好");
        assert_eq!(rx.recv().await.unwrap(), "世界");
        assert!(rx.is_empty());
    }

    #[tokio::test]
    async fn stops_when_cancelled() {
        let (tx, rx) = kanal::bounded_async::<String>(8);
        let _keep_open = tx.clone();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let (_writer, pending) = tokio::io::duplex(64);
        line_reader(tokio::io::BufReader::new(pending), cancel, tx)
            .await
            .unwrap();

        assert!(rx.is_empty());
    }
}
