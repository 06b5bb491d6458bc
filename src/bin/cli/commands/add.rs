use anyhow::Result;

use kata_lib::problems::NewAttempt;

use crate::app::App;
use crate::OutputFormat;

pub fn run(
    app: &mut App,
    lc_num: &str,
    title: &str,
    notes: &str,
    tags: Option<&str>,
    importance: Option<&str>,
    format: &OutputFormat,
) -> Result<()> {
    let request = NewAttempt {
        lc_num: lc_num.to_string(),
        title: title.to_string(),
        tags: tags
            .map(|raw| {
                raw.split(',')
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default(),
        importance: importance.map(|s| s.to_string()),
        notes: notes.to_string(),
    };

    let today = app.today();
    let problem_id = app.store.add_attempt(&request, today)?;
    let problem = app.store.problem_detail(problem_id, today)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&problem)?);
        }
        OutputFormat::Plain => {
            println!(
                "Logged attempt #{} for [{}] {} ({})",
                problem.attempt_count, problem.lc_num, problem.title, problem.importance
            );
            if !problem.tags.is_empty() {
                println!("Tags: {}", problem.tags.join(", "));
            }
        }
    }

    Ok(())
}
