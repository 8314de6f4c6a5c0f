use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::api::AppState;
use crate::core::AppConfig;
use crate::lessons::LessonFilter;

pub async fn run(user_id: &str, lesson_ids: &[String], config: AppConfig) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let state = AppState::new(config);

    // Only the first turn carries the filter, later turns keep it
    let mut filter = LessonFilter::from_lesson_ids(lesson_ids);

    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());
                match state.tutor.chat_turn(user_id, &line, filter.take()).await {
                    Ok(outcome) => println!("{}", outcome.response),
                    Err(err) => println!("Error: {}", err),
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
