use std::sync::Arc;

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::chat::{ConversationController, ExchangeClient, Role, Submission, Turn};

pub fn render_turn(turn: &Turn) -> String {
    match turn.role() {
        Role::User => format!(">>> {}", turn.text()),
        Role::Assistant => turn.text().to_string(),
    }
}

pub async fn run(client: ExchangeClient, restore_history: bool) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let client = Arc::new(client);
    let controller = ConversationController::new(client.clone());

    if restore_history {
        let turns = load_history(&client).await;
        for turn in turns.iter() {
            println!("{}", render_turn(turn));
        }
        controller.restore(turns);
    }

    repl(&mut rl, controller).await
}

/// Server side history, or an empty conversation when the backend
/// can't provide it.
pub async fn load_history(client: &ExchangeClient) -> Vec<Turn> {
    match client.history().await {
        Ok(turns) => turns,
        Err(err) => {
            tracing::warn!(kind = err.kind(), "Starting without history: {}", err);
            Vec::new()
        }
    }
}

async fn repl(rl: &mut DefaultEditor, controller: ConversationController) -> Result<()> {
    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => {
                controller.set_input(&line);
                let _ = rl.add_history_entry(line.as_str());

                match controller.submit_input().await {
                    Submission::Skipped => continue,
                    Submission::Delivered | Submission::Failed => {
                        // The reply is always the last turn
                        if let Some(turn) = controller.turns().last() {
                            println!("{}", render_turn(turn));
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}
