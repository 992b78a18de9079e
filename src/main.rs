//! QuizForge CLI

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use quizforge::{
    client::{GenerationRequest, QuizClient},
    config::Config,
    extract,
    library::QuizLibrary,
    question::{QuestionKind, QuestionSpec},
    scoring::{AnswerRecord, AttemptScore, QuestionOutcome},
    session::{AppState, Event, SetupForm},
};

#[derive(Parser)]
#[command(name = "quizforge")]
#[command(about = "Turn PDF study material into AI-generated quizzes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate questions from a PDF
    Generate {
        /// Source PDF
        #[arg(short, long)]
        input: PathBuf,

        /// Number of questions (default from config)
        #[arg(short = 'n', long)]
        count: Option<u32>,

        /// Question kind: mcq, fill-blanks, very-short, short, long,
        /// case-based, extract-based
        #[arg(short, long, default_value = "mcq")]
        kind: String,

        /// Difficulty label (default from config)
        #[arg(short, long)]
        difficulty: Option<String>,

        /// Exam style to steer tone, e.g. "class 10 board exam"
        #[arg(long)]
        exam_context: Option<String>,

        /// Write generated questions to a JSON file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also save the quiz to the library under this title
        #[arg(long)]
        save: Option<String>,
    },

    /// Grade a handwritten answer image against a reference answer
    Evaluate {
        /// Question text
        #[arg(short, long)]
        question: String,

        /// Reference answer text
        #[arg(short, long)]
        answer: String,

        /// Image of the handwritten answer
        #[arg(short, long)]
        image: PathBuf,

        /// Image MIME type (inferred from the extension when omitted)
        #[arg(long)]
        mime: Option<String>,

        /// Maximum marks for the question
        #[arg(short, long, default_value = "5")]
        max_marks: u32,
    },

    /// Extract plain text from a PDF
    Extract {
        /// Source PDF
        #[arg(short, long)]
        input: PathBuf,

        /// Write text to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run an interactive quiz in the terminal
    Play {
        /// Source PDF to generate from
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Play a saved quiz from the library instead
        #[arg(long)]
        quiz: Option<String>,

        /// Number of questions (default from config)
        #[arg(short = 'n', long)]
        count: Option<u32>,

        /// Question kind
        #[arg(short, long, default_value = "mcq")]
        kind: String,

        /// Difficulty label
        #[arg(short, long)]
        difficulty: Option<String>,
    },

    /// Manage the saved quiz library
    Library {
        #[command(subcommand)]
        command: LibraryCommands,
    },

    /// Generate sample configuration
    InitConfig {
        /// Output path for configuration file
        #[arg(short, long, default_value = "quizforge.toml")]
        output: PathBuf,
    },
}

#[derive(Subcommand)]
enum LibraryCommands {
    /// List saved quizzes
    List,

    /// Print one saved quiz
    Show {
        /// Quiz id
        id: String,
    },

    /// Delete a saved quiz
    Delete {
        /// Quiz id
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("quizforge=debug,info")
    } else {
        EnvFilter::new("quizforge=info,warn")
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load_or_default(),
    };

    match cli.command {
        Commands::Generate {
            input,
            count,
            kind,
            difficulty,
            exam_context,
            output,
            save,
        } => {
            generate(&config, input, count, &kind, difficulty, exam_context, output, save).await?;
        }

        Commands::Evaluate {
            question,
            answer,
            image,
            mime,
            max_marks,
        } => {
            evaluate(&config, &question, &answer, image, mime, max_marks).await?;
        }

        Commands::Extract { input, output } => {
            extract_to(input, output)?;
        }

        Commands::Play {
            input,
            quiz,
            count,
            kind,
            difficulty,
        } => {
            play(&config, input, quiz, count, &kind, difficulty).await?;
        }

        Commands::Library { command } => {
            library_command(&config, command)?;
        }

        Commands::InitConfig { output } => {
            init_config(&config, output)?;
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn generate(
    config: &Config,
    input: PathBuf,
    count: Option<u32>,
    kind: &str,
    difficulty: Option<String>,
    exam_context: Option<String>,
    output: Option<PathBuf>,
    save: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let kind: QuestionKind = kind.parse()?;
    let count = count.unwrap_or(config.generation.default_question_count);
    let difficulty = difficulty.unwrap_or_else(|| config.generation.default_difficulty.clone());

    println!("Extracting text from {}...", input.display());
    let source_text = extract::extract_text_from_file(&input)?;
    println!("Extracted {} characters", source_text.len());

    let client = QuizClient::from_env(config)?;
    let mut request = GenerationRequest::new(source_text, count, kind).with_difficulty(&difficulty);
    if let Some(context) = exam_context {
        request = request.with_exam_context(context);
    }

    println!("Generating {} {} questions...", count, kind.display_name());
    let questions = client.generate_questions(&request).await?;
    println!("Generated {} questions", questions.len());

    let json = serde_json::to_string_pretty(&questions)?;
    match output {
        Some(path) => {
            std::fs::write(&path, json)?;
            println!("Questions written to: {}", path.display());
        }
        None => println!("{}", json),
    }

    if let Some(title) = save {
        let library = QuizLibrary::open(&config.library.directory)?;
        let saved = library.save(&title, &difficulty, kind, questions)?;
        println!("Saved to library as: {}", saved.id);
    }

    Ok(())
}

async fn evaluate(
    config: &Config,
    question: &str,
    answer: &str,
    image: PathBuf,
    mime: Option<String>,
    max_marks: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let mime = mime.unwrap_or_else(|| mime_for_path(&image).to_string());
    let image_bytes = std::fs::read(&image)?;

    let client = QuizClient::from_env(config)?;
    let result = client
        .evaluate_answer(question, answer, &image_bytes, &mime, max_marks)
        .await?;

    println!("Score: {}/{}", result.score, result.max_marks);
    if result.clamped {
        println!("(model reported an out-of-range score; it was clamped)");
    }
    if !result.mistakes.is_empty() {
        println!("Mistakes:");
        for mistake in &result.mistakes {
            println!("  - {}", mistake);
        }
    }
    println!("Feedback: {}", result.feedback);

    Ok(())
}

fn extract_to(input: PathBuf, output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let text = extract::extract_text_from_file(&input)?;
    match output {
        Some(path) => {
            std::fs::write(&path, &text)?;
            println!("Text written to: {} ({} characters)", path.display(), text.len());
        }
        None => println!("{}", text),
    }
    Ok(())
}

async fn play(
    config: &Config,
    input: Option<PathBuf>,
    quiz_id: Option<String>,
    count: Option<u32>,
    kind: &str,
    difficulty: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut client: Option<QuizClient> = None;

    let questions: Vec<QuestionSpec> = if let Some(id) = quiz_id {
        let library = QuizLibrary::open(&config.library.directory)?;
        let quiz = library.load(&id)?;
        println!("Playing saved quiz: {}", quiz.title);
        quiz.questions
    } else if let Some(path) = input {
        let kind: QuestionKind = kind.parse()?;
        let count = count.unwrap_or(config.generation.default_question_count);
        let difficulty = difficulty.unwrap_or_else(|| config.generation.default_difficulty.clone());

        println!("Extracting text from {}...", path.display());
        let source_text = extract::extract_text_from_file(&path)?;

        let request =
            GenerationRequest::new(source_text, count, kind).with_difficulty(&difficulty);
        println!("Generating {} {} questions...", count, kind.display_name());
        let questions = ensure_client(&mut client, config)?
            .generate_questions(&request)
            .await?;
        println!("Generated {} questions\n", questions.len());
        questions
    } else {
        eprintln!("Error: provide --input to generate a quiz or --quiz to play a saved one");
        std::process::exit(1);
    };

    let mut state = AppState::Setup(SetupForm::default());
    state.apply(Event::Start)?;
    state.apply(Event::QuestionsReady(questions))?;

    loop {
        let question = match &state {
            AppState::Quiz(session) => match session.current() {
                Some(q) => {
                    println!(
                        "Question {}/{} [{} marks]",
                        session.cursor() + 1,
                        session.questions().len(),
                        q.marks
                    );
                    q.clone()
                }
                None => {
                    state.apply(Event::Finish)?;
                    break;
                }
            },
            _ => break,
        };

        let record = ask_question(&mut client, config, &question).await?;
        state.apply(Event::Answer(record))?;
        println!();
    }

    if let AppState::Results(score) = &state {
        print_results(score);
    }

    Ok(())
}

/// Present one question and collect the answer record for it
async fn ask_question(
    client: &mut Option<QuizClient>,
    config: &Config,
    question: &QuestionSpec,
) -> Result<AnswerRecord, Box<dyn std::error::Error>> {
    if !question.context_passage.is_empty() {
        println!("{}\n", question.context_passage);
    }
    println!("{}", question.prompt);
    for (i, option) in question.options.iter().enumerate() {
        println!("  {}. {}", i + 1, option);
    }

    if question.kind.is_objective() {
        let answer = prompt_line("Your answer (Enter to skip): ")?;
        if answer.is_empty() {
            return Ok(AnswerRecord::Skipped);
        }
        return Ok(AnswerRecord::Text(answer));
    }

    let path = prompt_line("Path to an image of your handwritten answer (Enter to skip): ")?;
    if path.is_empty() {
        return Ok(AnswerRecord::Skipped);
    }

    let image_bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Could not read {}: {}", path, e);
            return Ok(AnswerRecord::Skipped);
        }
    };
    let mime = mime_for_path(Path::new(&path));
    let result = ensure_client(client, config)?
        .evaluate_answer(
            &question.prompt,
            question.reference_answer(),
            &image_bytes,
            mime,
            question.marks,
        )
        .await;

    match result {
        Ok(evaluation) => {
            println!("Scored {}/{}", evaluation.score, evaluation.max_marks);
            println!("Feedback: {}", evaluation.feedback);
            Ok(AnswerRecord::Evaluated(evaluation))
        }
        Err(e) => {
            eprintln!("Evaluation failed: {}", e);
            Ok(AnswerRecord::Skipped)
        }
    }
}

fn print_results(score: &AttemptScore) {
    println!("=== Results ===");
    println!("{:-<50}", "");
    for (i, outcome) in score.outcomes.iter().enumerate() {
        let line = match outcome {
            QuestionOutcome::Correct => "correct".to_string(),
            QuestionOutcome::Incorrect { expected } => format!("incorrect (answer: {})", expected),
            QuestionOutcome::Graded { score, clamped } => {
                if *clamped {
                    format!("graded {} (clamped)", score)
                } else {
                    format!("graded {}", score)
                }
            }
            QuestionOutcome::Skipped => "skipped".to_string(),
        };
        println!("  Q{:<3} {}", i + 1, line);
    }
    println!("{:-<50}", "");
    println!(
        "Total: {}/{} ({:.1}%)",
        score.earned,
        score.possible,
        score.percent()
    );
}

fn library_command(
    config: &Config,
    command: LibraryCommands,
) -> Result<(), Box<dyn std::error::Error>> {
    let library = QuizLibrary::open(&config.library.directory)?;

    match command {
        LibraryCommands::List => {
            let index = library.list()?;
            println!("Saved Quizzes ({}):", index.len());
            println!("{:-<72}", "");
            for (id, summary) in &index {
                println!(
                    "  {} | {} | {} | {} questions | {}",
                    id,
                    summary.title,
                    summary.kind.display_name(),
                    summary.question_count,
                    summary.created_at.format("%Y-%m-%d %H:%M"),
                );
            }
        }

        LibraryCommands::Show { id } => {
            let quiz = library.load(&id)?;
            println!("{}", serde_json::to_string_pretty(&quiz)?);
        }

        LibraryCommands::Delete { id } => {
            library.delete(&id)?;
            println!("Deleted: {}", id);
        }
    }

    Ok(())
}

fn init_config(config: &Config, output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    // Ensure parent directory exists
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    config.save_toml(&output)?;
    println!("Configuration written to: {}", output.display());
    Ok(())
}

fn ensure_client<'a>(
    slot: &'a mut Option<QuizClient>,
    config: &Config,
) -> Result<&'a QuizClient, Box<dyn std::error::Error>> {
    match slot {
        Some(client) => Ok(client),
        None => Ok(slot.insert(QuizClient::from_env(config)?)),
    }
}

fn prompt_line(prompt: &str) -> Result<String, std::io::Error> {
    print!("{}", prompt);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn mime_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        _ => "image/png",
    }
}
