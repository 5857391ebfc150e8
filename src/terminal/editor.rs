//! Interactive terminal with line editing and history.

use super::{LineEvent, Terminal};
use crate::session::{InputStream, OutputStream};
use async_trait::async_trait;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io;
use std::sync::mpsc;
use std::sync::Mutex;
use std::thread;
use tokio::sync::oneshot;
use tracing::debug;

type Reply = oneshot::Sender<io::Result<LineEvent>>;
type PendingReply = oneshot::Receiver<io::Result<LineEvent>>;

/// A [`Terminal`] that reads through rustyline.
///
/// The editor lives on its own thread; each `read_line` call sends the
/// prompt there and awaits the reply, so the async caller never blocks.
/// If the caller stops waiting, the readline in progress is kept and the
/// next call picks up its result instead of prompting again.
pub struct RustylineTerminal {
    requests: Mutex<mpsc::Sender<(String, Reply)>>,
    pending: tokio::sync::Mutex<Option<PendingReply>>,
    output: OutputStream,
}

impl RustylineTerminal {
    /// Opens the editor on the controlling terminal.
    pub fn new() -> io::Result<Self> {
        let (requests, inbox) = mpsc::channel::<(String, Reply)>();
        let (ready_tx, ready_rx) = mpsc::channel::<io::Result<()>>();

        thread::Builder::new()
            .name("ctk-line-editor".to_string())
            .spawn(move || {
                let mut editor = match DefaultEditor::new() {
                    Ok(editor) => {
                        let _ = ready_tx.send(Ok(()));
                        editor
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(to_io(e)));
                        return;
                    }
                };

                while let Ok((prompt, reply)) = inbox.recv() {
                    let event = match editor.readline(&prompt) {
                        Ok(line) => {
                            if !line.trim().is_empty() {
                                let _ = editor.add_history_entry(line.as_str());
                            }
                            Ok(LineEvent::Line(line))
                        }
                        Err(ReadlineError::Interrupted) => Ok(LineEvent::Interrupted),
                        Err(ReadlineError::Eof) => Ok(LineEvent::Eof),
                        Err(e) => Err(to_io(e)),
                    };
                    let _ = reply.send(event);
                }
                debug!("Line editor thread exiting");
            })?;

        ready_rx
            .recv()
            .map_err(|_| io::Error::other("line editor thread exited"))??;

        Ok(Self {
            requests: Mutex::new(requests),
            pending: tokio::sync::Mutex::new(None),
            output: OutputStream::stdout(),
        })
    }
}

fn to_io(error: ReadlineError) -> io::Error {
    match error {
        ReadlineError::Io(e) => e,
        other => io::Error::other(other.to_string()),
    }
}

#[async_trait]
impl Terminal for RustylineTerminal {
    async fn read_line(&self, prompt: &str) -> io::Result<LineEvent> {
        let mut pending = self.pending.lock().await;
        if pending.is_none() {
            let (reply, response) = oneshot::channel();
            self.requests
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .send((prompt.to_string(), reply))
                .map_err(|_| io::Error::other("line editor is closed"))?;
            *pending = Some(response);
        }

        let Some(response) = pending.as_mut() else {
            return Err(io::Error::other("no line editor request"));
        };
        let reply = response.await;
        *pending = None;
        reply.map_err(|_| io::Error::other("line editor dropped the request"))?
    }

    fn input(&self) -> InputStream {
        InputStream::stdin()
    }

    fn output(&self) -> OutputStream {
        self.output.clone()
    }
}
