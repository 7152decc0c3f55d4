use crate::core::Console;
use crate::utils::error::Result;
use std::io::{IsTerminal, Stdout, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tokio::sync::Mutex;

pub const PAUSE_PROMPT: &str = "Press Enter to continue . . . ";

/// Whether an operator can answer the pause prompt.
pub fn stdin_is_interactive() -> bool {
    std::io::stdin().is_terminal()
}

/// Operator console. Messages go to stdout/stderr; the pause prompt is written to `W`
/// and answered by one line from `R`.
pub struct TerminalConsole<R = BufReader<Stdin>, W = Stdout> {
    input: Mutex<R>,
    prompt: std::sync::Mutex<W>,
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self::with_io(BufReader::new(tokio::io::stdin()), std::io::stdout())
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, W> TerminalConsole<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    pub fn with_io(input: R, prompt: W) -> Self {
        Self {
            input: Mutex::new(input),
            prompt: std::sync::Mutex::new(prompt),
        }
    }

    fn write_prompt(&self) -> Result<()> {
        let mut out = self
            .prompt
            .lock()
            .map_err(|_| std::io::Error::other("prompt writer poisoned"))?;
        write!(out, "{}", PAUSE_PROMPT)?;
        out.flush()?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl<R, W> Console for TerminalConsole<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    fn info(&self, message: &str) {
        println!("{}", message);
    }

    fn error(&self, message: &str) {
        eprintln!("{}", message);
    }

    async fn wait_for_acknowledgment(&self) -> Result<()> {
        self.write_prompt()?;

        // EOF 也視為確認，避免在關閉的 stdin 上卡住
        let mut line = String::new();
        self.input.lock().await.read_line(&mut line).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt_text(console: &TerminalConsole<&[u8], Vec<u8>>) -> String {
        String::from_utf8(console.prompt.lock().unwrap().clone()).unwrap()
    }

    #[tokio::test]
    async fn test_enter_acknowledges_and_prompt_is_written() {
        let console = TerminalConsole::with_io(&b"\n"[..], Vec::new());

        console.wait_for_acknowledgment().await.unwrap();

        assert_eq!(prompt_text(&console), PAUSE_PROMPT);
    }

    #[tokio::test]
    async fn test_closed_input_counts_as_acknowledgment() {
        let console = TerminalConsole::with_io(&b""[..], Vec::new());

        assert!(console.wait_for_acknowledgment().await.is_ok());
        assert_eq!(prompt_text(&console), PAUSE_PROMPT);
    }

    #[tokio::test]
    async fn test_each_acknowledgment_consumes_one_line() {
        let console = TerminalConsole::with_io(&b"\nleftover\n"[..], Vec::new());

        console.wait_for_acknowledgment().await.unwrap();
        assert_eq!(*console.input.lock().await, &b"leftover\n"[..]);

        console.wait_for_acknowledgment().await.unwrap();
        assert!(console.input.lock().await.is_empty());
        assert_eq!(prompt_text(&console), PAUSE_PROMPT.repeat(2));
    }
}
