use super::types::{Ack, DocumentId, LaunchOut, OpenOptions, OpenOut, SheetInfo, SheetsOut};
use super::{Engine, Session};
use crate::config::Config;
use crate::family::DocumentFamily;
use anyhow::{Context, Result, anyhow};
use serde::de::DeserializeOwned;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Drives the desktop office suite through a bridge host process speaking
/// newline-delimited JSON over stdin/stdout. One host process per session,
/// one session per family per pipeline run.
pub struct BridgeEngine {
    cfg: Config,
}

impl BridgeEngine {
    pub fn new(cfg: &Config) -> Self {
        Self { cfg: cfg.clone() }
    }
}

impl Engine for BridgeEngine {
    type Session = BridgeSession;

    fn launch(&self, family: DocumentFamily) -> Result<BridgeSession> {
        let script = PathBuf::from(&self.cfg.engine.bridge_script);
        if !script.exists() {
            return Err(anyhow!("missing bridge script: {}", script.display()));
        }
        let host_exe = resolve_host_exe(&self.cfg.engine.host_exe);

        debug!(
            "launching bridge host: {} {}",
            host_exe.display(),
            script.display()
        );

        let mut cmd = Command::new(&host_exe);
        cmd.arg(&script);
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::null());
        for (k, v) in &self.cfg.engine.env {
            cmd.env(k, v);
        }

        let mut child = cmd
            .spawn()
            .with_context(|| format!("spawning bridge host: {}", host_exe.display()))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("no stdin on bridge host"))?;
        let stdout = BufReader::new(
            child
                .stdout
                .take()
                .ok_or_else(|| anyhow!("no stdout on bridge host"))?,
        );

        let mut session = BridgeSession {
            child,
            stdin,
            stdout,
            family,
            closed: false,
        };

        let launched = session.request::<LaunchOut>(&serde_json::json!({
            "cmd": "launch",
            "family": family,
            "with_window": false,
            "suppress_alerts": true,
            "update_links": false,
        }));

        match launched {
            Ok(out) if out.ok => {
                if let Some(version) = out.engine_version.as_deref() {
                    debug!("engine ready family={} version={}", family.label(), version);
                }
                Ok(session)
            }
            Ok(out) => {
                session.abandon();
                Err(anyhow!(
                    out.error
                        .unwrap_or_else(|| "engine launch refused".to_string())
                ))
            }
            Err(err) => {
                session.abandon();
                Err(err.context(format!("launching engine for {}", family.label())))
            }
        }
    }
}

pub struct BridgeSession {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    family: DocumentFamily,
    closed: bool,
}

impl BridgeSession {
    fn request<O: DeserializeOwned>(&mut self, req: &serde_json::Value) -> Result<O> {
        let mut line = serde_json::to_string(req)?;
        line.push('\n');
        self.stdin
            .write_all(line.as_bytes())
            .with_context(|| "writing to bridge host")?;
        self.stdin
            .flush()
            .with_context(|| "flushing bridge host stdin")?;

        let mut buf = String::new();
        let n = self
            .stdout
            .read_line(&mut buf)
            .with_context(|| "reading from bridge host")?;
        if n == 0 {
            anyhow::bail!("bridge host closed the pipe");
        }
        serde_json::from_str(&buf).with_context(|| "parsing bridge host response")
    }

    fn ack(&mut self, req: &serde_json::Value) -> Result<()> {
        let out: Ack = self.request(req)?;
        if !out.ok {
            anyhow::bail!(out.error.unwrap_or_else(|| "engine call failed".to_string()));
        }
        Ok(())
    }

    fn abandon(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        self.closed = true;
    }
}

impl Session for BridgeSession {
    fn open_document(&mut self, path: &Path, opts: &OpenOptions) -> Result<DocumentId> {
        let out: OpenOut = self.request(&serde_json::json!({
            "cmd": "open",
            "path": path,
            "with_window": opts.with_window,
            "read_only": opts.read_only,
            "update_links": opts.update_links,
            "repair": opts.repair,
        }))?;
        if !out.ok {
            anyhow::bail!(
                out.error
                    .unwrap_or_else(|| format!("open failed: {}", path.display()))
            );
        }
        Ok(DocumentId(out.doc_id))
    }

    fn sheet_info(&mut self, doc: DocumentId) -> Result<Vec<SheetInfo>> {
        let out: SheetsOut = self.request(&serde_json::json!({
            "cmd": "sheet_info",
            "doc_id": doc,
        }))?;
        if !out.ok {
            anyhow::bail!(
                out.error
                    .unwrap_or_else(|| "sheet enumeration failed".to_string())
            );
        }
        Ok(out.sheets)
    }

    fn fit_sheet_to_width(&mut self, doc: DocumentId, sheet: &str) -> Result<()> {
        self.ack(&serde_json::json!({
            "cmd": "fit_sheet_to_width",
            "doc_id": doc,
            "sheet": sheet,
        }))
    }

    fn select_sheets(&mut self, doc: DocumentId, sheets: &[String]) -> Result<()> {
        self.ack(&serde_json::json!({
            "cmd": "select_sheets",
            "doc_id": doc,
            "sheets": sheets,
        }))
    }

    fn export_pdf(&mut self, doc: DocumentId, pdf: &Path, format_code: u32) -> Result<()> {
        self.ack(&serde_json::json!({
            "cmd": "export_pdf",
            "doc_id": doc,
            "pdf_path": pdf,
            "format_code": format_code,
        }))
    }

    fn close_document(&mut self, doc: DocumentId, save_changes: bool) -> Result<()> {
        self.ack(&serde_json::json!({
            "cmd": "close",
            "doc_id": doc,
            "save_changes": save_changes,
        }))
    }

    fn release_document(&mut self, doc: DocumentId) -> Result<()> {
        self.ack(&serde_json::json!({
            "cmd": "release",
            "doc_id": doc,
        }))
    }

    fn quit(&mut self) {
        if self.closed {
            return;
        }
        // A broken engine instance must not take the batch down with it.
        if let Err(err) = self.ack(&serde_json::json!({"cmd": "quit"})) {
            warn!("engine quit failed for {}: {err:#}", self.family.label());
        }
        if let Err(err) = wait_with_timeout(&mut self.child, Duration::from_secs(10)) {
            warn!("bridge host did not exit cleanly: {err:#}");
        }
        self.closed = true;
    }
}

impl Drop for BridgeSession {
    fn drop(&mut self) {
        // Backstop only; the pipeline quits explicitly on every path.
        if !self.closed {
            self.abandon();
        }
    }
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<()> {
    let start = Instant::now();
    loop {
        if child
            .try_wait()
            .with_context(|| "try_wait on bridge host")?
            .is_some()
        {
            return Ok(());
        }
        if start.elapsed() > timeout {
            let _ = child.kill();
            child.wait().with_context(|| "wait after kill")?;
            anyhow::bail!("bridge host killed after {timeout:?}");
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}

fn resolve_host_exe(raw: &str) -> PathBuf {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("auto") {
        if let Ok(env_val) = std::env::var("PDFSWEEP_PYTHON") {
            if !env_val.is_empty() {
                return PathBuf::from(env_val);
            }
        }
        return PathBuf::from("python3");
    }
    PathBuf::from(raw)
}
