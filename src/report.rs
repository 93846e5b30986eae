//! Rendering of comparison results.
//!
//! The text format prefixes every result line with a sigil so the output
//! stays machine-parseable:
//!
//! | sigil | meaning                                   |
//! |-------|-------------------------------------------|
//! | `=`   | redundant content / overall redundancy    |
//! | `<`   | only on the left side                     |
//! | `>`   | only on the right side                    |
//! | `{`   | duplicate group inside the left directory |
//! | `}`   | duplicate group inside the right directory|
//!
//! Verbose lines (`<digest> '<path>'`, suffixed with ` cached` on cache hits)
//! carry no sigil.

use std::io::{self, Write};
use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use crate::cache::{DigestSource, ResolvedFile};
use crate::cli::OutputFormat;
use crate::compare::{Finding, Outcome, Side};
use crate::digest::Digest;
use crate::utils::{format_path_list, serialize_path_lossy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Files,
    Directories,
}

impl Mode {
    fn noun(self) -> &'static str {
        match self {
            Self::Files => "files",
            Self::Directories => "directories",
        }
    }
}

#[derive(Serialize)]
struct JsonFile<'a> {
    digest: Digest,
    #[serde(serialize_with = "serialize_path_lossy")]
    path: &'a Path,
    cached: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    mode: Mode,
    outcome: Outcome,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    files: Vec<JsonFile<'a>>,
    findings: &'a [Finding],
}

pub struct Reporter<W: Write> {
    out: W,
    format: OutputFormat,
    verbose: bool,
    color: bool,
    // Verbose files held back for the single JSON document.
    pending: Vec<ResolvedFile>,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, format: OutputFormat, verbose: bool, color: bool) -> Self {
        Self {
            out,
            format,
            verbose,
            color,
            pending: Vec::new(),
        }
    }

    /// Reports one resolved file. Text output writes the verbose line right
    /// away; JSON output keeps it for [`Reporter::report`]. Without verbose
    /// mode this does nothing.
    pub fn file_resolved(&mut self, file: &ResolvedFile) -> io::Result<()> {
        if !self.verbose {
            return Ok(());
        }
        match self.format {
            OutputFormat::Text => {
                let annotation = match file.source {
                    DigestSource::Cached => " cached",
                    DigestSource::Computed => "",
                };
                writeln!(self.out, "{} '{}'{}", file.digest, file.path.display(), annotation)?;
                self.out.flush()
            }
            OutputFormat::Json => {
                self.pending.push(file.clone());
                Ok(())
            }
        }
    }

    /// Writes the findings, then the closing verdict line when the inputs
    /// are redundant. In JSON mode this is the whole document.
    pub fn report(&mut self, mode: Mode, findings: &[Finding], outcome: Outcome) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => self.write_text(mode, findings, outcome),
            OutputFormat::Json => self.write_json(mode, findings, outcome),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_text(&mut self, mode: Mode, findings: &[Finding], outcome: Outcome) -> io::Result<()> {
        for finding in findings {
            let line = finding_line(finding);
            let line = if self.color {
                colorize(finding, &line)
            } else {
                line
            };
            writeln!(self.out, "{line}")?;
        }

        if outcome.is_redundant() {
            let verdict = format!("=input {} are redundant", mode.noun());
            if self.color {
                writeln!(self.out, "{}", verdict.green().bold())?;
            } else {
                writeln!(self.out, "{verdict}")?;
            }
        }
        self.out.flush()
    }

    fn write_json(&mut self, mode: Mode, findings: &[Finding], outcome: Outcome) -> io::Result<()> {
        let report = JsonReport {
            mode,
            outcome,
            files: self
                .pending
                .iter()
                .map(|file| JsonFile {
                    digest: file.digest,
                    path: &file.path,
                    cached: file.source == DigestSource::Cached,
                })
                .collect(),
            findings,
        };
        // Rendered in full first so a failure never leaves half a document.
        let mut document = serde_json::to_vec_pretty(&report)?;
        document.push(b'\n');
        self.out.write_all(&document)?;
        self.out.flush()
    }
}

pub fn finding_line(finding: &Finding) -> String {
    match finding {
        Finding::InternalDuplicate {
            side: Side::Left,
            digest,
            paths,
        } => format!("{{{} {}", digest, format_path_list(paths)),
        Finding::InternalDuplicate {
            side: Side::Right,
            digest,
            paths,
        } => format!("}}{} {}", digest, format_path_list(paths)),
        Finding::Redundant { digest, paths } => format!("={} {}", digest, format_path_list(paths)),
        Finding::UniqueLeft { digest, path } => format!("<{} '{}'", digest, path.display()),
        Finding::UniqueRight { digest, path } => format!(">{} '{}'", digest, path.display()),
    }
}

fn colorize(finding: &Finding, line: &str) -> String {
    match finding {
        Finding::InternalDuplicate { .. } => line.magenta().to_string(),
        Finding::Redundant { .. } => line.green().to_string(),
        Finding::UniqueLeft { .. } => line.yellow().to_string(),
        Finding::UniqueRight { .. } => line.cyan().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn resolved(n: u64, path: &str, source: DigestSource) -> ResolvedFile {
        ResolvedFile {
            path: PathBuf::from(path),
            digest: Digest::from_u64(n),
            source,
        }
    }

    fn render(
        format: OutputFormat,
        verbose: bool,
        files: &[ResolvedFile],
        findings: &[Finding],
        outcome: Outcome,
    ) -> String {
        let mut reporter = Reporter::new(Vec::new(), format, verbose, false);
        for file in files {
            reporter.file_resolved(file).unwrap();
        }
        reporter.report(Mode::Directories, findings, outcome).unwrap();
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn sigils_prefix_every_finding() {
        let findings = vec![
            Finding::InternalDuplicate {
                side: Side::Left,
                digest: Digest::from_u64(1),
                paths: vec![PathBuf::from("/a/1"), PathBuf::from("/a/2")],
            },
            Finding::InternalDuplicate {
                side: Side::Right,
                digest: Digest::from_u64(2),
                paths: vec![PathBuf::from("/b/1"), PathBuf::from("/b/2")],
            },
            Finding::UniqueLeft {
                digest: Digest::from_u64(3),
                path: PathBuf::from("/a/3"),
            },
            Finding::Redundant {
                digest: Digest::from_u64(1),
                paths: vec![PathBuf::from("/a/1"), PathBuf::from("/b/9")],
            },
            Finding::UniqueRight {
                digest: Digest::from_u64(4),
                path: PathBuf::from("/b/4"),
            },
        ];
        let text = render(OutputFormat::Text, false, &[], &findings, Outcome::NotRedundant);
        assert_eq!(
            text,
            "{0000000000000001 ['/a/1', '/a/2']\n\
             }0000000000000002 ['/b/1', '/b/2']\n\
             <0000000000000003 '/a/3'\n\
             =0000000000000001 ['/a/1', '/b/9']\n\
             >0000000000000004 '/b/4'\n"
        );
    }

    #[test]
    fn verbose_lines_mark_cache_hits() {
        let files = vec![
            resolved(1, "/a/1", DigestSource::Cached),
            resolved(2, "/a/2", DigestSource::Computed),
        ];
        let text = render(OutputFormat::Text, true, &files, &[], Outcome::Redundant);
        assert_eq!(
            text,
            "0000000000000001 '/a/1' cached\n\
             0000000000000002 '/a/2'\n\
             =input directories are redundant\n"
        );

        let quiet = render(OutputFormat::Text, false, &files, &[], Outcome::Redundant);
        assert_eq!(quiet, "=input directories are redundant\n");
    }

    #[test]
    fn json_report_carries_outcome_and_findings() {
        let findings = vec![Finding::UniqueLeft {
            digest: Digest::from_u64(3),
            path: PathBuf::from("/a/3"),
        }];
        let files = vec![resolved(3, "/a/3", DigestSource::Cached)];
        let text = render(OutputFormat::Json, true, &files, &findings, Outcome::NotRedundant);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["mode"], "directories");
        assert_eq!(value["outcome"], "not_redundant");
        assert_eq!(value["files"][0]["cached"], true);
        assert_eq!(value["findings"][0]["kind"], "unique_left");
        assert_eq!(value["findings"][0]["digest"], "0000000000000003");
        assert_eq!(value["findings"][0]["path"], "/a/3");
    }

    #[cfg(unix)]
    #[test]
    fn json_report_survives_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let bad = PathBuf::from("/a").join(OsStr::from_bytes(b"bad\xff"));
        let findings = vec![Finding::UniqueLeft {
            digest: Digest::from_u64(5),
            path: bad.clone(),
        }];
        let files = vec![ResolvedFile {
            path: bad,
            digest: Digest::from_u64(5),
            source: DigestSource::Computed,
        }];
        let text = render(OutputFormat::Json, true, &files, &findings, Outcome::NotRedundant);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["findings"][0]["path"], "/a/bad\u{fffd}");
        assert_eq!(value["files"][0]["path"], "/a/bad\u{fffd}");
    }
}
