use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, id: i64, format: &OutputFormat) -> Result<()> {
    let today = app.today();
    let problem = app.store.problem_detail(id, today)?;
    let attempts = app.store.attempts_for(id)?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "detail": problem,
                "attempts": attempts,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("[{}] {} ({})", problem.lc_num, problem.title, problem.importance);
            if !problem.tags.is_empty() {
                println!("Tags: {}", problem.tags.join(", "));
            }
            if let Some(days) = problem.days_since {
                println!("Last attempted {} days ago", days);
            }
            if let Some(until) = problem.snooze_until {
                println!("Snoozed until {}", until);
            }
            println!(
                "{} attempts, {} reviews completed",
                problem.attempt_count, problem.review_count
            );

            for attempt in &attempts {
                println!("\n--- {} (attempt #{})", attempt.attempt_at, attempt.id);
                println!("{}", attempt.notes.trim_end());
            }
        }
    }

    Ok(())
}

pub fn run_delete(app: &App, id: i64, format: &OutputFormat) -> Result<()> {
    let problem = app.store.problem_detail(id, app.today())?;
    app.store.delete_problem(id)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "deleted": id }));
        }
        OutputFormat::Plain => {
            println!("Deleted [{}] {}", problem.lc_num, problem.title);
        }
    }

    Ok(())
}
