use std::ffi::OsString;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use toolcheck_lib::Platform;
use tracing::{error, info};
use crate::config::Config;
use crate::error::AppError;

/// Command line of a child run testing one platform.
pub fn child_args(config: &Config, platform: Platform) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![];

    if let Some(path) = &config.config_path {
        args.push("--config".into());
        args.push(path.into());
    }

    args.push("--models".into());
    args.push(config.models.clone().into());
    args.push("--data-dir".into());
    args.push(config.data_dir.clone().into());
    args.push("--docs-dir".into());
    args.push(config.docs_dir.clone().into());
    args.push(format!("--trials={}", config.trials).into());
    args.push(format!("--timeout={}", config.timeout.as_secs()).into());

    if let Some(pause) = config.pause {
        args.push(format!("--pause={}", pause.as_secs()).into());
    }
    if config.verbose > 0 {
        args.push(format!("-{}", "v".repeat(config.verbose as usize)).into());
    }

    args.push("test".into());
    args.push(platform.key().into());
    args
}

// Write to a std stream line by line, every line tagged with a prefix.
struct PrefixWriter<T: Write> {
    prefix: String,
    pending: Vec<u8>,
    stdstream: T,
}

impl<T: Write> PrefixWriter<T> {
    fn new(prefix: String, stdstream: T) -> Self {
        PrefixWriter { prefix, pending: vec![], stdstream }
    }

    fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
        let mut out = Vec::with_capacity(self.prefix.len() + line.len() + 1);
        out.extend_from_slice(self.prefix.as_bytes());
        out.extend_from_slice(line);
        if !line.ends_with(b"\n") {
            out.push(b'\n');
        }
        // One call per line keeps lines of parallel children apart.
        self.stdstream.write_all(&out)
    }
}

impl<T: Write> Write for PrefixWriter<T> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            self.write_line(&line)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            let line = std::mem::take(&mut self.pending);
            self.write_line(&line)?;
        }
        self.stdstream.flush()
    }
}

fn stream<R, W>(mut source: R, mut writer: PrefixWriter<W>) -> JoinHandle<io::Result<()>>
    where R: Read + Send + 'static, W: Write + Send + 'static
{
    thread::spawn(move || {
        io::copy(&mut source, &mut writer)?;
        writer.flush()
    })
}

struct Run {
    platform: Platform,
    child: Child,
    streams: Vec<JoinHandle<io::Result<()>>>,
}

fn spawn(exe: &Path, config: &Config, platform: Platform) -> Result<Run, AppError> {
    let mut child = Command::new(exe)
        .args(child_args(config, platform))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| AppError::Error(format!("Failed to run {} checks\nError: {}", platform, err)))?;

    let prefix = format!("[{}] ", platform.key());
    let mut streams = vec![];
    if let Some(stdout) = child.stdout.take() {
        streams.push(stream(stdout, PrefixWriter::new(prefix.clone(), io::stdout())));
    }
    if let Some(stderr) = child.stderr.take() {
        streams.push(stream(stderr, PrefixWriter::new(prefix, io::stderr())));
    }

    Ok(Run { platform, child, streams })
}

/// Test platforms in parallel child processes and wait for all of them.
///
/// Returns the exit status of each platform, `None` when the child could not be started.
pub fn run_platforms(config: &Config, platforms: &[Platform]) -> Result<Vec<(Platform, Option<ExitStatus>)>, AppError> {
    let exe = std::env::current_exe().map_err(|err| AppError::Error(format!("Failed to locate the executable: {}", err)))?;

    let mut runs = vec![];
    let mut statuses = vec![];

    for platform in platforms {
        match spawn(&exe, config, *platform) {
            Ok(run) => {
                info!("started {} checks, pid {}", platform, run.child.id());
                runs.push(run);
            },
            Err(err) => {
                error!("{err}");
                statuses.push((*platform, None));
            }
        }
    }

    for mut run in runs {
        let status = run.child.wait()
            .map_err(|err| AppError::Error(format!("Failed to wait for {} checks\nError: {}", run.platform, err)))?;

        for handle in run.streams {
            match handle.join() {
                Ok(Ok(())) => {},
                Ok(Err(err)) => error!("failed to stream {} output: {err}", run.platform),
                Err(_) => return Err(AppError::Error(format!("Output thread of {} checks panicked", run.platform))),
            }
        }

        info!("{} checks finished: {status}", run.platform);
        statuses.push((run.platform, Some(status)));
    }

    statuses.sort_by_key(|(platform, _)| Platform::ALL.iter().position(|p| p == platform));
    Ok(statuses)
}
