//! Transport loops. Requests are newline-delimited JSON objects, either
//! over stdio or over a TCP connection this process establishes to a
//! listening editor.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::info;

use crate::server::handler::RequestHandler;

pub async fn run_stdio(handler: RequestHandler) -> io::Result<()> {
    info!("serving on stdio");
    serve(&handler, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
}

pub async fn run_tcp(
    handler: RequestHandler,
    port: u16,
) -> io::Result<()> {
    let address = format!("127.0.0.1:{port}");
    info!(%address, "connecting to editor");
    let stream = TcpStream::connect(&address).await?;
    let (reader, writer) = stream.into_split();
    serve(&handler, BufReader::new(reader), writer).await
}

async fn serve<R, W>(
    handler: &RequestHandler,
    reader: R,
    mut writer: W,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = handler.handle_line(&line).await;
        writer.write_all(response.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    info!("input stream closed, shutting down");
    Ok(())
}
