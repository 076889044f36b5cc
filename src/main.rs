use std::sync::Arc;
use timetable_match::config::Config;
use timetable_match::display::{print_analysis, write_analysis_to_file};
use timetable_match::store::{to_participants, CsvStore, StudentStore};
use timetable_match::summary::enricher_from_config;
use timetable_match::web::{self, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    let enricher = enricher_from_config(&config)?;

    // Check if we should run in web mode
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "web" {
        let port = args.get(2)
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);

        let store = CsvStore::new(config.students_csv.clone());
        log::info!("Starting web server on port {}...", port);
        log::info!("Storing submissions in {}", store.path().display());

        let state = AppState::new(Arc::new(store), enricher, config.admin_password.clone());
        web::start_server(port, state).await?;
        return Ok(());
    }

    // CLI mode: analyse a stored CSV once
    let csv_path = match args.get(1).map(String::as_str) {
        Some("analyze") => args.get(2).map(Into::into).unwrap_or_else(|| config.students_csv.clone()),
        Some(other) => {
            eprintln!("Unknown command {:?}", other);
            eprintln!("Usage: timetable-match [web [port] | analyze [csv]]");
            std::process::exit(2);
        }
        None => config.students_csv.clone(),
    };

    println!("Loading students from {}...", csv_path.display());
    let store = CsvStore::new(csv_path);
    let records = store.list_all().await?;
    println!("Loaded {} student record(s)", records.len());

    let participants = to_participants(&records);
    let result = enricher.analyze(&participants).await;
    print_analysis(&result, participants.len());

    println!("\n=== Writing Analysis to File ===");
    write_analysis_to_file(&result, "common_slots.txt")?;
    println!("Analysis saved to common_slots.txt");

    Ok(())
}
