use anyhow::Result;

use kata_lib::library::sorted_view;
use kata_lib::prefs::SortPreference;
use kata_lib::review::due_score;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, search: &str, tags: Option<&str>, format: &OutputFormat) -> Result<()> {
    let tag_filter: Vec<String> = tags
        .map(|raw| {
            raw.split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let today = app.today();
    let problems = app.store.list_problems(search, &tag_filter, today)?;
    let pinned = app.prefs.pinned();
    let view = sorted_view(&problems, &pinned, app.prefs.sort_preference(), today);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        OutputFormat::Plain => {
            if view.is_empty() {
                println!("No problems found.");
                return Ok(());
            }

            for problem in &view {
                let pin = if pinned.contains(&problem.id) { "*" } else { " " };
                let due = due_score(problem, today);
                let due_marker = if due >= 0 { " due" } else { "" };
                println!(
                    "{}{:>4}  [{}] {} ({}, {} attempts{})",
                    pin,
                    problem.id,
                    problem.lc_num,
                    problem.title,
                    problem.importance,
                    problem.attempt_count,
                    due_marker,
                );
            }

            println!(
                "\n{} problems, sorted by {}",
                view.len(),
                app.prefs.sort_preference().as_str()
            );
        }
    }

    Ok(())
}

pub fn run_pin(app: &mut App, id: i64, pin: bool, format: &OutputFormat) -> Result<()> {
    // Validate the id before touching the pin set.
    let problem = app.store.problem_detail(id, app.today())?;
    app.prefs.set_pinned(id, pin);

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({ "id": id, "pinned": pin })
            );
        }
        OutputFormat::Plain => {
            let verb = if pin { "Pinned" } else { "Unpinned" };
            println!("{} [{}] {}", verb, problem.lc_num, problem.title);
        }
    }

    Ok(())
}

pub fn run_sort(app: &mut App, preference: Option<&str>, format: &OutputFormat) -> Result<()> {
    let pref = match preference {
        Some(value) => {
            let pref = SortPreference::parse(value);
            app.prefs.set_sort_preference(pref);
            pref
        }
        None => app.prefs.sort_preference(),
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "sort_preference": pref.as_str() }));
        }
        OutputFormat::Plain => match preference {
            Some(_) => println!("Sort preference set to {}", pref.as_str()),
            None => println!("Sort preference is {}", pref.as_str()),
        },
    }

    Ok(())
}
