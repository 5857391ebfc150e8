//! One-shot command sessions.

use super::{ExecRequest, Session, SessionCore};
use crate::commands::{CommandContext, ExitCode, ResolvedBinding};
use crate::console::Console;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Runs a single resolved command against the streams of an [`ExecRequest`].
pub struct ExecSession {
    console: Arc<Console>,
    request: ExecRequest,
    binding: ResolvedBinding,
    core: SessionCore,
}

impl ExecSession {
    pub(crate) fn new(console: Arc<Console>, request: ExecRequest, binding: ResolvedBinding) -> Self {
        Self {
            console,
            request,
            binding,
            core: SessionCore::new(),
        }
    }

    /// The request this session serves.
    pub fn request(&self) -> &ExecRequest {
        &self.request
    }

    /// The command this session runs.
    pub fn binding(&self) -> &ResolvedBinding {
        &self.binding
    }
}

#[async_trait]
impl Session for ExecSession {
    async fn execute(&self) -> Result<ExitCode> {
        let cancel = self.core.begin()?;
        let _running = scopeguard::guard(&self.core, SessionCore::finish);
        info!(command = %self.binding.name(), "Exec session started");

        let ctx = CommandContext {
            console: &self.console,
            env: &self.request.env,
            input: &self.request.input,
            out: &self.request.out,
            err: &self.request.err,
            cancel: &cancel,
            shell: None,
        };
        let result = self.binding.execute(&ctx).await;
        self.request.out.flush()?;

        info!(result = ?result.as_ref().ok(), "Exec session finished");
        result
    }

    fn interrupt(&self) -> bool {
        self.core.interrupt()
    }
}
