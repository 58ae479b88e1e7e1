use crate::domain::constants::CODE_BAD_REQUEST;
use crate::domain::models::{ControlRequest, ControlResponse};
use crate::services::owner::SettingsOwner;
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Control channel errors. `Unavailable` is the one the CLI must keep
/// distinguishable from a locked-field rejection.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("cannot reach the settings owner at {socket}: {source}")]
    Unavailable {
        socket: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("control channel failure: {0}")]
    Protocol(String),
}

/// An error the settings owner reported over the channel.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct RemoteError {
    pub code: String,
    pub message: String,
}

/// Serve control requests until a shutdown request arrives.
///
/// One connection is handled at a time, so every mutation is serialized
/// through the single owner without any locking. Each connection carries one
/// newline-terminated JSON request and gets one JSON response back.
pub fn serve(socket: &Path, owner: &mut SettingsOwner) -> anyhow::Result<()> {
    if socket.exists() {
        std::fs::remove_file(socket)?;
    }
    if let Some(parent) = socket.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let listener = UnixListener::bind(socket)?;
    info!(socket = %socket.display(), "settings owner listening");

    for stream in listener.incoming() {
        let stream = match stream {
            Ok(stream) => stream,
            Err(err) => {
                warn!(error = %err, "control connection failed to accept");
                continue;
            }
        };
        match handle_connection(stream, owner) {
            Ok(shutdown) => {
                if shutdown {
                    break;
                }
            }
            Err(err) => warn!(error = %err, "control connection failed"),
        }
    }

    let _ = std::fs::remove_file(socket);
    info!("settings owner stopped");
    Ok(())
}

fn handle_connection(stream: UnixStream, owner: &mut SettingsOwner) -> anyhow::Result<bool> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut line = String::new();
    reader.read_line(&mut line)?;

    let (response, shutdown) = match serde_json::from_str::<ControlRequest>(line.trim()) {
        Ok(request) => {
            let shutdown = matches!(request, ControlRequest::Shutdown);
            (owner.handle(request), shutdown)
        }
        Err(err) => (
            ControlResponse::Error {
                code: CODE_BAD_REQUEST.to_string(),
                message: format!("unparseable control request: {err}"),
            },
            false,
        ),
    };

    let mut stream = stream;
    serde_json::to_writer(&mut stream, &response)?;
    stream.write_all(b"\n")?;
    stream.flush()?;
    Ok(shutdown)
}

/// One blocking request/response round trip from the one-shot CLI.
pub fn request(socket: &Path, request: &ControlRequest) -> Result<ControlResponse, TransportError> {
    let mut stream = UnixStream::connect(socket).map_err(|source| TransportError::Unavailable {
        socket: socket.to_path_buf(),
        source,
    })?;

    let payload =
        serde_json::to_string(request).map_err(|err| TransportError::Protocol(err.to_string()))?;
    stream
        .write_all(payload.as_bytes())
        .and_then(|()| stream.write_all(b"\n"))
        .map_err(|err| TransportError::Protocol(format!("write request: {err}")))?;

    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .map_err(|err| TransportError::Protocol(format!("read response: {err}")))?;
    if line.trim().is_empty() {
        return Err(TransportError::Protocol(
            "settings owner closed the connection without a response".to_string(),
        ));
    }
    serde_json::from_str(line.trim()).map_err(|err| TransportError::Protocol(err.to_string()))
}
