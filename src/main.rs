use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use log::error;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::error::Error;
use std::process::ExitCode;
use studentdb::menu;
use studentdb::{ConnectionConfig, StudentRecordService};

#[derive(Parser, Debug)]
#[command(name = "studentdb", version, about = "Manage student records stored in PostgreSQL")]
struct Cli {
    #[command(flatten)]
    connection: ConnectionConfig,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive menu (the default)
    Menu,
    /// Print every student and exit
    List {
        #[arg(long)]
        json: bool,
    },
    /// Print enrollment statistics and exit
    Stats {
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let mut service = match StudentRecordService::connect(&cli.connection) {
        Ok(service) => service,
        Err(err) => {
            error!("Startup failed: {}", err);
            eprintln!("✗ Error connecting to {}: {}", cli.connection, err);
            eprintln!("\nPlease ensure:");
            eprintln!("1. The PostgreSQL server is running");
            eprintln!("2. The connection settings (flags, environment or .env) are correct");
            eprintln!("3. The students table exists (see migrations/)");
            return ExitCode::FAILURE;
        }
    };

    let outcome = match cli.command.unwrap_or(Command::Menu) {
        Command::Menu => {
            println!("✓ Connected to database: {}\n", cli.connection);
            let outcome = run_menu(&mut service);
            service.close();
            println!("\n✓ Database connection closed.");
            return outcome;
        }
        Command::List { json } => print_list(&mut service, json),
        Command::Stats { json } => print_statistics(&mut service, json),
    };
    service.close();

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            eprintln!("✗ {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run_menu(service: &mut StudentRecordService) -> ExitCode {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(err) => {
            eprintln!("✗ Cannot open terminal: {}", err);
            return ExitCode::FAILURE;
        }
    };
    // rustyline only turns Ctrl-C into `Interrupted` while it is reading a
    // line. A Ctrl-C during a blocking database statement gets the default
    // SIGINT handling and ends the process with status 130.
    match menu::run(service, &mut editor) {
        Ok(()) => ExitCode::SUCCESS,
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
            println!("\n\nProgram interrupted by user. Exiting...");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("Terminal input failed: {}", err);
            eprintln!("✗ {}", err);
            ExitCode::FAILURE
        }
    }
}

fn print_list(service: &mut StudentRecordService, json: bool) -> Result<(), Box<dyn Error>> {
    let all = service.list_all()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&all)?);
    } else if all.is_empty() {
        println!("No students found in the database.");
    } else {
        println!("{}", menu::render_table(&all));
    }
    Ok(())
}

fn print_statistics(service: &mut StudentRecordService, json: bool) -> Result<(), Box<dyn Error>> {
    let stats = service.statistics()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("{}", menu::render_statistics(&stats).trim_start());
    }
    Ok(())
}
