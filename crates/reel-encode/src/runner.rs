//! Launching the external encoder.

use std::io::{BufRead, BufReader, Read};
use std::process::{Command, Stdio};
use std::sync::mpsc;

use reel_core::{ReelError, ReelResult};

use crate::command::EncodeCommand;

/// What the encoder left behind once it exited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` if the process was killed by a signal.
    pub exit_code: Option<i32>,
    /// Standard output and standard error, merged line by line.
    pub output: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs an [`EncodeCommand`] to completion.
pub trait ProcessRunner {
    fn run(&self, command: &EncodeCommand) -> ReelResult<ProcessOutput>;
}

/// Runs the encoder as a real child process.
///
/// Stdin is closed from the start. Stderr is drained on a helper thread
/// while the calling thread drains stdout; both feed one channel so the
/// captured log keeps the order in which lines arrived.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, command: &EncodeCommand) -> ReelResult<ProcessOutput> {
        let program = command.program();
        let mut child = Command::new(program)
            .args(command.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ReelError::encode(program, e))?;

        let (tx, rx) = mpsc::channel::<String>();

        let stderr_thread = child.stderr.take().map(|stderr| {
            let tx = tx.clone();
            std::thread::spawn(move || forward_lines(stderr, &tx))
        });

        let stdout_result = match child.stdout.take() {
            Some(stdout) => forward_lines(stdout, &tx),
            None => Ok(()),
        };
        drop(tx);

        let stderr_result = match stderr_thread {
            Some(handle) => handle.join().unwrap_or_else(|_| {
                Err(std::io::Error::other("stderr reader thread panicked"))
            }),
            None => Ok(()),
        };

        // Always reap the child, even if reading failed.
        let status = child.wait().map_err(|e| ReelError::encode(program, e))?;
        stdout_result.map_err(|e| ReelError::encode(program, e))?;
        stderr_result.map_err(|e| ReelError::encode(program, e))?;

        let mut output = String::new();
        for line in rx.iter() {
            output.push_str(&line);
            output.push('\n');
        }

        Ok(ProcessOutput {
            exit_code: status.code(),
            output,
        })
    }
}

/// Send each line of `stream` to `tx` until end of file.
///
/// On a read error the rest of the stream is still drained, so the child
/// never blocks on a full pipe while the other stream is being joined.
fn forward_lines(stream: impl Read, tx: &mpsc::Sender<String>) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => return Ok(()),
            Ok(_) => {}
            Err(e) => {
                let _ = std::io::copy(&mut reader, &mut std::io::sink());
                return Err(e);
            }
        }
        // Encoders print progress with bare carriage returns; keep it readable.
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']).replace('\r', "\n");
        // The receiver lives until the child has been reaped.
        let _ = tx.send(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitrate::FixedBitrate;
    use crate::movie::MovieSettings;
    use crate::template::FrameTemplate;
    use reel_core::{CodecType, CompressionQuality, EncoderConfig};
    use std::collections::VecDeque;
    use std::path::PathBuf;

    /// Hands out scripted reads, one chunk or error per call.
    struct ScriptedReader(VecDeque<std::io::Result<Vec<u8>>>);

    impl Read for ScriptedReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            match self.0.pop_front() {
                None => Ok(0),
                Some(Err(e)) => Err(e),
                Some(Ok(chunk)) => {
                    buf[..chunk.len()].copy_from_slice(&chunk);
                    Ok(chunk.len())
                }
            }
        }
    }

    #[test]
    fn test_carriage_returns_become_lines() {
        let (tx, rx) = mpsc::channel();
        forward_lines(&b"frame=1\rframe=2\r\ndone\n"[..], &tx).unwrap();
        drop(tx);
        let lines: Vec<String> = rx.iter().collect();
        assert_eq!(lines, vec!["frame=1\nframe=2", "done"]);
    }

    #[test]
    fn test_read_error_still_drains_stream() {
        let mut reader = ScriptedReader(VecDeque::from([
            Ok(b"first\n".to_vec()),
            Err(std::io::Error::other("pipe hiccup")),
            Ok(b"still writing\n".to_vec()),
            Ok(b"more\n".to_vec()),
        ]));
        let (tx, rx) = mpsc::channel();

        assert!(forward_lines(&mut reader, &tx).is_err());
        drop(tx);

        assert!(reader.0.is_empty());
        assert_eq!(rx.iter().collect::<Vec<_>>(), vec!["first"]);
    }

    fn command_for(program: &str, target: &str) -> EncodeCommand {
        EncodeCommand::build(
            program,
            &FrameTemplate::from_base("/tmp/sme-runner"),
            &MovieSettings {
                target_path: PathBuf::from(target),
                width: 2,
                height: 2,
                codec: CodecType::Mpeg4,
                quality: CompressionQuality::Best,
                verbose: false,
            },
            &EncoderConfig::default(),
            &FixedBitrate::default(),
        )
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_program_is_encode_error() {
        let cmd = command_for("/nonexistent/reel/ffmpeg", "out.mp4");
        let err = SystemRunner.run(&cmd).unwrap_err();
        assert!(matches!(err, ReelError::Encode { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_merged_output_and_status() {
        // `sh -y ...` fails with a usage message on stderr and a non-zero code.
        let cmd = command_for("/bin/sh", "out.mp4");
        let out = SystemRunner.run(&cmd).unwrap();
        assert!(!out.success());
        assert!(out.exit_code.is_some());
        assert!(!out.output.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_process_reports_zero() {
        // `true` ignores its arguments.
        let cmd = command_for("true", "out.mp4");
        let out = SystemRunner.run(&cmd).unwrap();
        assert!(out.success());
    }
}
