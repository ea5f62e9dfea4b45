use supportbot_agent::Speaker;
use supportbot_core::config::LoadOptions;

use crate::bootstrap::{bootstrap, default_load_options};
use crate::commands::CommandResult;

pub fn run(text: &str, json: bool) -> CommandResult {
    run_with(default_load_options(), text, json)
}

pub fn run_with(options: LoadOptions, text: &str, json: bool) -> CommandResult {
    let app = match bootstrap(options) {
        Ok(app) => app,
        Err(error) => return CommandResult::from_error("ask", &error),
    };

    let reply = app.session.respond(text.trim());
    if json {
        return match serde_json::to_string(&reply) {
            Ok(output) => CommandResult::output(output),
            Err(error) => CommandResult::failure("ask", "serialization", error.to_string(), 1),
        };
    }

    match reply.speaker {
        Speaker::Bot => CommandResult::output(format!("Bot: {}", reply.message)),
        Speaker::HumanAgent => CommandResult::output(reply.message),
    }
}
