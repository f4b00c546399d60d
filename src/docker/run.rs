use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::{Child, ChildStderr, ChildStdout, Command, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use super::types::{ContainerCommand, ContainerResult, OutputLine};

/// Spawn the runtime binary and return a channel that streams its output.
///
/// The caller receives [`OutputLine::Stdout`]/[`Stderr`] as they arrive,
/// followed by exactly one [`OutputLine::Done`] carrying the exit status.
/// There is no timeout: a follow-mode command streams until the runtime
/// closes it or the process is interrupted.
pub fn spawn(program: &str, cmd: &ContainerCommand) -> io::Result<Receiver<OutputLine>> {
    let log_file = cmd.log_path.as_deref().map(open_log).transpose()?;

    let mut child = Command::new(program)
        .args(&cmd.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let stdout = child.stdout.take().ok_or_else(|| missing_pipe("stdout"))?;
    let stderr = child.stderr.take().ok_or_else(|| missing_pipe("stderr"))?;

    let (tx, rx) = mpsc::channel();

    std::thread::spawn(move || {
        orchestrate(child, stdout, stderr, tx, log_file);
    });

    Ok(rx)
}

fn open_log(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn missing_pipe(name: &str) -> io::Error {
    io::Error::other(format!("{name} of child process was not captured"))
}

fn orchestrate(
    mut child: Child,
    stdout: ChildStdout,
    stderr: ChildStderr,
    tx: Sender<OutputLine>,
    log_file: Option<File>,
) {
    // Shared by both readers so lines land in the file in arrival order.
    let log_file = log_file.map(|f| Arc::new(Mutex::new(f)));

    // --- reader threads ---------------------------------------------------
    let stdout_handle = forward(stdout, tx.clone(), log_file.clone(), OutputLine::Stdout);
    let stderr_handle = forward(stderr, tx.clone(), log_file, OutputLine::Stderr);

    // --- wait --------------------------------------------------------------
    let status = child.wait().ok();

    let _ = stdout_handle.join();
    let _ = stderr_handle.join();

    let result = status
        .map(ContainerResult::from)
        .unwrap_or(ContainerResult::from_code(None));

    let _ = tx.send(OutputLine::Done(result));
}

fn forward<R>(
    pipe: R,
    tx: Sender<OutputLine>,
    log_file: Option<Arc<Mutex<File>>>,
    wrap: fn(String) -> OutputLine,
) -> std::thread::JoinHandle<()>
where
    R: io::Read + Send + 'static,
{
    std::thread::spawn(move || {
        let mut reader = io::BufReader::new(pipe);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
            // Container output is not guaranteed to be UTF-8.
            let line = decode_line(&buf);
            if let Some(file) = &log_file
                && let Ok(mut file) = file.lock()
            {
                let _ = writeln!(file, "{line}");
            }
            // Receiver may be dropped — ignore send errors.
            let _ = tx.send(wrap(line));
        }
    })
}

/// Lossily decode one raw line, dropping the `\n` or `\r\n` terminator.
fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
