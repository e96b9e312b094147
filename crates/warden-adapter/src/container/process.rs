/*
[INPUT]:  WebSocket URL of a container's run endpoint and a process spec
[OUTPUT]: Running process handle with stdin, output events and exit status
[POS]:    Container layer - process streaming over WebSocket
[UPDATE]: When the process stream frame format changes
*/

use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::http::{Result, WardenError};
use crate::types::ProcessSpec;

const CHANNEL_CAPACITY: usize = 100;

/// Frames exchanged on the run endpoint, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum StreamFrame {
    Run {
        pspec: ProcessSpec,
    },
    Stdin {
        data: String,
    },
    Close {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<String>,
    },
    Pid {
        data: String,
    },
    Stdout {
        data: String,
    },
    Stderr {
        data: String,
    },
    Error {
        data: String,
    },
    #[serde(other)]
    Other,
}

/// Something the remote process did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    Stdout(String),
    Stderr(String),
    Exited(i32),
    Failed(String),
}

/// Collected result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Handle on a process running inside a remote container
#[derive(Debug)]
pub struct Process {
    id: String,
    pid: String,
    outbound_tx: mpsc::Sender<WsMessage>,
    events: mpsc::UnboundedReceiver<ProcessEvent>,
}

impl Process {
    /// Connect, send the run request and wait for the host to report a pid
    pub(crate) async fn spawn(url: Url, mut spec: ProcessSpec) -> Result<Self> {
        let id = spec
            .id
            .get_or_insert_with(|| Uuid::new_v4().to_string())
            .clone();

        let (ws_stream, _response) = connect_async(url.as_str()).await?;
        let (mut write, mut read) = ws_stream.split();

        write.send(encode(&StreamFrame::Run { pspec: spec })?).await?;

        let pid = loop {
            match read.next().await {
                Some(Ok(message)) => match parse_frame(message) {
                    Some(StreamFrame::Pid { data }) => break data,
                    Some(StreamFrame::Error { data }) => return Err(WardenError::Process(data)),
                    Some(StreamFrame::Close { .. }) => {
                        return Err(WardenError::Process(
                            "stream closed before process started".to_string(),
                        ));
                    }
                    _ => {}
                },
                Some(Err(err)) => return Err(err.into()),
                None => {
                    return Err(WardenError::Process(
                        "stream ended before process started".to_string(),
                    ));
                }
            }
        };
        debug!(process_id = %id, pid = %pid, "process started");

        let (outbound_tx, mut outbound_rx) = mpsc::channel::<WsMessage>(CHANNEL_CAPACITY);
        // Unbounded so the pump never stalls the writer on an undrained reader
        let (event_tx, events) = mpsc::unbounded_channel();
        let task_id = id.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    outbound = outbound_rx.recv() => {
                        match outbound {
                            Some(message) => {
                                if write.send(message).await.is_err() {
                                    let _ = event_tx.send(ProcessEvent::Failed(
                                        "failed to write to process stream".to_string(),
                                    ));
                                    break;
                                }
                            }
                            None => {
                                let _ = write.send(WsMessage::Close(None)).await;
                                break;
                            }
                        }
                    }
                    incoming = read.next() => {
                        let event = match incoming {
                            Some(Ok(WsMessage::Ping(_))) | Some(Ok(WsMessage::Pong(_))) => continue,
                            Some(Ok(WsMessage::Close(_))) | None => {
                                ProcessEvent::Failed("stream closed before process exited".to_string())
                            }
                            Some(Ok(message)) => match parse_frame(message) {
                                Some(StreamFrame::Stdout { data }) => ProcessEvent::Stdout(data),
                                Some(StreamFrame::Stderr { data }) => ProcessEvent::Stderr(data),
                                Some(StreamFrame::Error { data }) => ProcessEvent::Failed(data),
                                Some(StreamFrame::Close { data }) => exit_event(data),
                                _ => continue,
                            },
                            Some(Err(err)) => ProcessEvent::Failed(err.to_string()),
                        };

                        let finished = matches!(event, ProcessEvent::Exited(_) | ProcessEvent::Failed(_));
                        if event_tx.send(event).is_err() || finished {
                            break;
                        }
                    }
                }
            }
            debug!(process_id = %task_id, "process stream finished");
        });

        Ok(Self {
            id,
            pid,
            outbound_tx,
            events,
        })
    }

    /// Caller-visible process id (generated when the spec had none)
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Process id reported by the remote host
    pub fn pid(&self) -> &str {
        &self.pid
    }

    pub async fn write_stdin(&self, data: &str) -> Result<()> {
        self.send_frame(&StreamFrame::Stdin {
            data: data.to_string(),
        })
        .await
    }

    /// Signal end of input to the process
    pub async fn close_stdin(&self) -> Result<()> {
        self.send_frame(&StreamFrame::Close { data: None }).await
    }

    /// Next output or exit event; `None` once the stream is finished
    pub async fn next_event(&mut self) -> Option<ProcessEvent> {
        self.events.recv().await
    }

    /// Drain the stream until the process exits
    pub async fn wait(mut self) -> Result<ProcessOutput> {
        let mut output = ProcessOutput::default();
        while let Some(event) = self.next_event().await {
            match event {
                ProcessEvent::Stdout(data) => output.stdout.push_str(&data),
                ProcessEvent::Stderr(data) => output.stderr.push_str(&data),
                ProcessEvent::Exited(code) => {
                    output.exit_code = code;
                    return Ok(output);
                }
                ProcessEvent::Failed(message) => return Err(WardenError::Process(message)),
            }
        }
        Err(WardenError::Process(
            "stream ended before process exited".to_string(),
        ))
    }

    async fn send_frame(&self, frame: &StreamFrame) -> Result<()> {
        self.outbound_tx
            .send(encode(frame)?)
            .await
            .map_err(|_| WardenError::Process("process stream closed".to_string()))
    }
}

fn encode(frame: &StreamFrame) -> Result<WsMessage> {
    let text = serde_json::to_string(frame).map_err(WardenError::Encode)?;
    Ok(WsMessage::Text(text.into()))
}

fn parse_frame(message: WsMessage) -> Option<StreamFrame> {
    let text: String = match message {
        WsMessage::Text(text) => text.to_string(),
        WsMessage::Binary(bytes) => String::from_utf8(bytes.to_vec()).ok()?,
        _ => return None,
    };

    match serde_json::from_str::<StreamFrame>(&text) {
        Ok(frame) => Some(frame),
        Err(err) => {
            debug!(error = %err, bytes = text.len(), "process frame parse failed");
            None
        }
    }
}

fn exit_event(data: Option<String>) -> ProcessEvent {
    let raw = data.unwrap_or_default();
    match raw.trim().parse::<i32>() {
        Ok(code) => ProcessEvent::Exited(code),
        Err(_) => ProcessEvent::Failed(format!("invalid exit status {raw:?}")),
    }
}
