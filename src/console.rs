//! Line-oriented console used by the visit engine and the front desk.

use std::io::{self, BufRead, Write};

/// I/O seam between the engine and whoever is driving it.
///
/// `prompt` returns `Ok(None)` once input is closed; callers treat that as the
/// visitor walking away.
pub trait GymConsole {
    fn say(&mut self, text: &str);
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>>;
}

/// [`GymConsole`] over the process's stdin and stdout.
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

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl GymConsole for StdConsole {
    fn say(&mut self, text: &str) {
        let mut out = self.stdout.lock();
        let _ = writeln!(out, "{}", text);
        let _ = out.flush();
    }

    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        {
            let mut out = self.stdout.lock();
            write!(out, "{}", text)?;
            out.flush()?;
        }
        let mut line = String::new();
        let read = self.stdin.lock().read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}
