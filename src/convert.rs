//! Document conversion to PDF through an external program.
//!
//! The program runs synchronously; the run waits for it and any failure
//! is fatal.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{BuildError, BuildResult};
use crate::render::DocumentFormat;

/// Document conversion collaborator.
pub trait DocumentConverter {
    /// Format the converter reads.
    fn source_format(&self) -> DocumentFormat;

    /// Convert `source` and return the path of the produced document.
    fn convert(&self, source: &Path) -> BuildResult<PathBuf>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConverterKind {
    /// LaTeX source, compiled in the source's directory.
    Xelatex,
    /// HTML source, printed with page margins.
    Wkhtmltopdf,
}

impl ConverterKind {
    pub fn program(&self) -> &'static str {
        match self {
            ConverterKind::Xelatex => "xelatex",
            ConverterKind::Wkhtmltopdf => "wkhtmltopdf",
        }
    }

    pub fn source_format(&self) -> DocumentFormat {
        match self {
            ConverterKind::Xelatex => DocumentFormat::Tex,
            ConverterKind::Wkhtmltopdf => DocumentFormat::Html,
        }
    }
}

/// Page margins in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMargins {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl Default for PageMargins {
    fn default() -> Self {
        Self {
            top: 17,
            bottom: 17,
            left: 7,
            right: 7,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PdfConverter {
    kind: ConverterKind,
    margins: PageMargins,
}

impl PdfConverter {
    pub fn new(kind: ConverterKind, margins: PageMargins) -> Self {
        Self { kind, margins }
    }

    pub fn kind(&self) -> ConverterKind {
        self.kind
    }

    pub fn is_available(&self) -> bool {
        Command::new(self.kind.program())
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// The command line for `source` and the PDF it will produce.
    pub fn command(&self, source: &Path) -> (Command, PathBuf) {
        let output = source.with_extension("pdf");
        let mut cmd = Command::new(self.kind.program());

        match self.kind {
            ConverterKind::Xelatex => {
                cmd.args(["-synctex=1", "-interaction=nonstopmode"]).arg(source);
                if let Some(dir) = source.parent().filter(|p| !p.as_os_str().is_empty()) {
                    cmd.current_dir(dir);
                }
            }
            ConverterKind::Wkhtmltopdf => {
                let m = self.margins;
                cmd.args(["--margin-bottom", &m.bottom.to_string()])
                    .args(["--margin-left", &m.left.to_string()])
                    .args(["--margin-right", &m.right.to_string()])
                    .args(["--margin-top", &m.top.to_string()])
                    .arg(source)
                    .arg(&output);
            }
        }

        (cmd, output)
    }
}

impl DocumentConverter for PdfConverter {
    fn source_format(&self) -> DocumentFormat {
        self.kind.source_format()
    }

    fn convert(&self, source: &Path) -> BuildResult<PathBuf> {
        let program = self.kind.program();
        let source = source
            .canonicalize()
            .map_err(|e| BuildError::io(source, e))?;
        let (mut cmd, output) = self.command(&source);
        cmd.stdin(Stdio::null());

        tracing::info!(tool = program, "converting {}", source.display());
        let result = cmd.output().map_err(|e| {
            BuildError::tool(program, format!("failed to spawn (is it installed and on PATH?): {}", e))
        })?;

        if !result.status.success() {
            // xelatex reports on stdout, wkhtmltopdf on stderr
            let mut log = String::from_utf8_lossy(&result.stderr).into_owned();
            log.push_str(&String::from_utf8_lossy(&result.stdout));
            return Err(BuildError::tool(
                program,
                format!("exited with {} on {}: {}", result.status, source.display(), tail(&log, 20)),
            ));
        }

        if !output.exists() {
            return Err(BuildError::tool(
                program,
                format!("reported success but {} was not produced", output.display()),
            ));
        }

        Ok(output)
    }
}

fn tail(log: &str, lines: usize) -> String {
    let all: Vec<&str> = log.trim().lines().collect();
    all[all.len().saturating_sub(lines)..].join("\n")
}
