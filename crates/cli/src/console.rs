use std::io::{self, BufRead, Write};

use piratesearch_core::{Console, SessionError};

/// Console on the process's stdin and stdout.
pub struct StdConsole {
    stdin: io::Stdin,
    stdout: io::Stdout,
}

impl StdConsole {
    pub fn new() -> Self {
        Self {
            stdin: io::stdin(),
            stdout: io::stdout(),
        }
    }
}

impl Console for StdConsole {
    fn ask(&mut self, prompt: &str) -> Result<String, SessionError> {
        let mut out = self.stdout.lock();
        out.write_all(prompt.as_bytes())
            .and_then(|_| out.flush())
            .map_err(|e| SessionError::Console(e.to_string()))?;

        let mut line = String::new();
        let read = self
            .stdin
            .lock()
            .read_line(&mut line)
            .map_err(|e| SessionError::Console(e.to_string()))?;
        if read == 0 {
            return Err(SessionError::InputClosed);
        }

        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn say(&mut self, message: &str) {
        // A closed stdout ends the session at the next prompt.
        let _ = writeln!(self.stdout.lock(), "{message}");
    }
}
