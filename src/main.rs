//! Resume relevance: hybrid resume and job description scoring tool

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use resume_relevance::cli::{self, Cli, Commands, ConfigAction, ModelAction};
use resume_relevance::config::{Config, OutputFormat};
use resume_relevance::error::{RelevanceError, Result};
use resume_relevance::input::file_detector::FileType;
use resume_relevance::input::InputManager;
use resume_relevance::output::formatter::{save_report_to_file, ReportGenerator};
use resume_relevance::output::report::{BatchReport, EvaluationReport, ReportMetadata, ShortlistCriteria};
use resume_relevance::processing::analyzer::{shortlist, RelevanceEvaluator};
use resume_relevance::processing::embeddings::{HashingEmbedder, Model2VecEmbedder};
use resume_relevance::processing::similarity::Embedder;
use resume_relevance::processing::text_processor::Vocabularies;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

async fn run_command(command: Commands, config: Config, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Evaluate {
            resume,
            job,
            company,
            location,
            embedding,
            output,
            save,
            offline,
            detailed,
        } => {
            info!("Starting resume evaluation");

            validate_input(&resume, "Resume file")?;
            validate_input(&job, "Job description file")?;

            let output_format = resolve_output_format(output.as_deref(), &config)?;
            let detailed = detailed || config.output.detailed;

            println!("🚀 Resume relevance evaluation");
            println!("📄 Resume: {}", resume.display());
            println!("💼 Job Description: {}", job.display());
            println!("🔧 Output Format: {:?}", output_format);

            let start_time = Instant::now();
            let vocabularies = Vocabularies::load(&config.vocabulary)?;
            let mut input_manager = InputManager::new(&vocabularies)?;

            println!("\n📂 Loading documents...");
            let job_record = input_manager
                .load_job(&job, company.as_deref(), location.as_deref())
                .await?;
            let resume_record = input_manager.load_resume(&resume).await?;

            let embedder = load_embedder(&config, embedding.as_deref(), offline);
            println!("🧠 Embedding Model: {}", embedder.name());

            let evaluator = RelevanceEvaluator::builder(config.scoring.clone(), embedder)
                .vocabularies(vocabularies)
                .build()?;

            println!("🔍 Scoring...\n");
            let evaluation = evaluator.evaluate_detailed(&resume_record, &job_record);

            let metadata = ReportMetadata::new(
                evaluator.embedder_name(),
                start_time.elapsed().as_millis() as u64,
            );
            let report = EvaluationReport::new(&resume_record, &job_record, evaluation, detailed, metadata);

            let generator = report_generator(&config, detailed);
            let content = generator.generate_report(&report, output_format)?;
            emit(&content, save.as_deref())?;
        }

        Commands::Batch {
            job,
            resumes,
            company,
            location,
            top,
            min_score,
            embedding,
            output,
            save,
            offline,
            detailed,
        } => {
            info!("Starting batch evaluation of {} resumes", resumes.len());

            validate_input(&job, "Job description file")?;

            let output_format = resolve_output_format(output.as_deref(), &config)?;
            let detailed = detailed || config.output.detailed;
            let criteria = ShortlistCriteria {
                top_n: top.unwrap_or(config.output.shortlist_size),
                min_score: min_score.unwrap_or(config.output.shortlist_min_score),
            };

            println!("🚀 Batch relevance evaluation");
            println!("💼 Job Description: {}", job.display());
            println!("📄 Resumes submitted: {}", resumes.len());

            let start_time = Instant::now();
            let vocabularies = Vocabularies::load(&config.vocabulary)?;
            let mut input_manager = InputManager::new(&vocabularies)?;

            let job_record = input_manager
                .load_job(&job, company.as_deref(), location.as_deref())
                .await?;

            let submitted = resumes.len();
            let mut loaded = Vec::with_capacity(submitted);
            for path in &resumes {
                match input_manager.load_resume(path).await {
                    Ok(resume) => loaded.push(resume),
                    Err(e) => warn!("Skipping {}: {}", path.display(), e),
                }
            }

            if loaded.is_empty() {
                return Err(RelevanceError::InvalidInput(
                    "None of the submitted resumes could be loaded".to_string(),
                ));
            }

            let embedder = load_embedder(&config, embedding.as_deref(), offline);
            println!("🧠 Embedding Model: {}", embedder.name());

            let evaluator = Arc::new(
                RelevanceEvaluator::builder(config.scoring.clone(), embedder)
                    .vocabularies(vocabularies)
                    .build()?,
            );
            let model_name = evaluator.embedder_name().to_string();

            let progress = ProgressBar::new_spinner();
            progress.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner} {msg} [{elapsed}]")
                    .map_err(|e| RelevanceError::OutputFormatting(e.to_string()))?,
            );
            progress.set_message(format!("Scoring {} resumes", loaded.len()));
            progress.enable_steady_tick(Duration::from_millis(100));

            let results = Arc::clone(&evaluator)
                .batch_evaluate(loaded.clone(), &job_record)
                .await;

            progress.finish_and_clear();

            if results.is_empty() {
                return Err(RelevanceError::Processing(
                    "Every resume evaluation failed".to_string(),
                ));
            }

            let shortlisted = shortlist(&results, criteria.top_n, criteria.min_score);
            println!(
                "✅ Scored {} of {} resumes, {} shortlisted\n",
                results.len(),
                submitted,
                shortlisted.len()
            );

            let metadata = ReportMetadata::new(&model_name, start_time.elapsed().as_millis() as u64);
            let report = BatchReport::new(
                &job_record,
                &loaded,
                results,
                &shortlisted,
                criteria,
                submitted,
                metadata,
            );

            let generator = report_generator(&config, detailed);
            let content = generator.generate_batch_report(&report, output_format)?;
            emit(&content, save.as_deref())?;
        }

        Commands::Models { action } => match action {
            ModelAction::List => {
                println!("📚 Available Models\n");
                println!("🧠 Embedding Models:");
                for model in &config.models.available_models {
                    let marker = if model.repo_id == config.models.default_embedding_model {
                        " [default]"
                    } else {
                        ""
                    };
                    let local = config.models_dir().join(&model.repo_id).exists();
                    let status = if local { "✅ Local" } else { "⬇️  Hub" };
                    println!(
                        "  • {} ({}) - {} MB, {} dims [{}]{}",
                        model.name, model.repo_id, model.size_mb, model.dimensions, status, marker
                    );
                    println!("    {}", model.description);
                }
                println!();
                println!(
                    "💡 Use --offline to score with the built-in {} embedder",
                    HashingEmbedder::default().name()
                );
            }
        },

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration\n");
                println!("Models Directory: {}", config.models_dir().display());
                println!("Default Embedding Model: {}", config.models.default_embedding_model);
                println!("\nScoring Weights:");
                println!("  Hard match: {:.1}%", config.scoring.hard_weight * 100.0);
                println!("  Soft match: {:.1}%", config.scoring.soft_weight * 100.0);
                println!("  Dense similarity (of soft): {:.1}%", config.scoring.dense_weight * 100.0);
                println!("  BM25 ranking (of soft): {:.1}%", config.scoring.ranking_weight * 100.0);
                println!("\nVerdict Thresholds:");
                println!("  High: >= {}", config.scoring.high_threshold);
                println!("  Medium: >= {}", config.scoring.medium_threshold);
                println!("\nOutput:");
                println!("  Format: {:?}", config.output.format);
                println!(
                    "  Shortlist: top {} with score >= {}",
                    config.output.shortlist_size, config.output.shortlist_min_score
                );
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                match &config_path {
                    Some(path) => Config::default().save_to(path)?,
                    None => {
                        Config::reset()?;
                    }
                }
                println!("✅ Configuration reset successfully!");
            }

            Some(ConfigAction::Path) => {
                let path = config_path.unwrap_or_else(Config::config_path);
                println!("{}", path.display());
            }
        },
    }

    Ok(())
}

fn validate_input(path: &Path, label: &str) -> Result<()> {
    cli::validate_file_extension(path, FileType::supported_extensions())
        .map_err(|e| RelevanceError::InvalidInput(format!("{}: {}", label, e)))
}

fn resolve_output_format(requested: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match requested {
        Some(format) => cli::parse_output_format(format).map_err(RelevanceError::InvalidInput),
        None => Ok(config.output.format),
    }
}

/// Load the requested Model2Vec model, falling back to feature hashing
fn load_embedder(config: &Config, model: Option<&str>, offline: bool) -> Arc<dyn Embedder> {
    if offline {
        info!("Offline mode: using hashing embedder");
        return Arc::new(HashingEmbedder::default());
    }

    match Model2VecEmbedder::from_config(config, model) {
        Ok(embedder) => Arc::new(embedder),
        Err(e) => {
            warn!("Could not load embedding model ({}), falling back to hashing embedder", e);
            println!("⚠️  Embedding model unavailable, using offline hashing embedder");
            Arc::new(HashingEmbedder::default())
        }
    }
}

fn report_generator(config: &Config, detailed: bool) -> ReportGenerator {
    ReportGenerator::with_options(config.output.color_output, detailed, true, true, true)
}

fn emit(content: &str, save: Option<&Path>) -> Result<()> {
    match save {
        Some(path) => {
            save_report_to_file(content, path)?;
            println!("💾 Report saved to {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}
