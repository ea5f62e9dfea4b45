use std::io::{self, BufRead, Write};

use supportbot_agent::{Speaker, SupportSession};

use crate::bootstrap::{bootstrap, default_load_options};
use crate::commands::CommandResult;

pub fn run() -> CommandResult {
    let app = match bootstrap(default_load_options()) {
        Ok(app) => app,
        Err(error) => return CommandResult::from_error("chat", &error),
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    match run_loop(&app.session, &app.config.session.mode, stdin.lock(), stdout.lock()) {
        Ok(()) => CommandResult::output(""),
        Err(error) => CommandResult::failure("chat", "io", error.to_string(), 1),
    }
}

/// Reads one message per line until `exit`/`quit` or end of input.
pub fn run_loop<R, W>(session: &SupportSession, mode: &str, input: R, mut output: W) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "=== Smart Customer Support Bot (CLI demo) ===")?;
    writeln!(output, "Mode: {mode}")?;
    writeln!(
        output,
        "Type 'exit' to quit. Examples: 'what is your return policy', 'check order A100', 'my order B201', etc."
    )?;

    let mut lines = input.lines();
    loop {
        write!(output, "\nYou: ")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            writeln!(output, "\nGoodbye.")?;
            break;
        };
        let line = line?;
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            writeln!(output, "Goodbye.")?;
            break;
        }

        let reply = session.respond(message);
        match reply.speaker {
            Speaker::Bot => writeln!(output, "Bot: {}", reply.message)?,
            Speaker::HumanAgent => writeln!(output, "{}", reply.message)?,
        }
    }

    output.flush()
}
