//! Command-line interface for building, applying, and evaluating photo
//! classifier models.

use clap::{Parser, Subcommand};
use photo_classifier::dataset::{list_images, LabelOracle};
use photo_classifier::pipeline::{Classifier, Evaluator, ModelBuilder};
use photo_classifier::utils::init_tracing;
use photo_classifier::Result;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser)]
#[command(name = "photo-classifier")]
#[command(about = "Train and apply a binary image classifier for a target subject")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train a model on a directory with one subdirectory per label
    Build {
        /// Path the model artifact is written to
        #[arg(short, long)]
        model: PathBuf,

        /// Directory of labeled training images
        #[arg(short, long)]
        images: PathBuf,

        /// Number of epochs per training pass
        #[arg(short, long, default_value_t = 100)]
        epochs: usize,
    },

    /// Print the match probability for every image in a directory
    Classify {
        /// Path to a persisted model artifact
        #[arg(short, long)]
        model: PathBuf,

        /// Directory of images to classify
        #[arg(short, long)]
        images: PathBuf,
    },

    /// Evaluate a model against a directory of captioned images
    Evaluate {
        /// Path to a persisted model artifact
        #[arg(short, long)]
        model: PathBuf,

        /// Directory of evaluation images
        #[arg(short, long)]
        images: PathBuf,

        /// Caption marking the positive class
        #[arg(short, long)]
        label: String,
    },
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Build {
            model,
            images,
            epochs,
        } => {
            ModelBuilder::new(epochs).build(&images, &model, LabelOracle::parent_dir())?;
        }
        Command::Classify { model, images } => {
            let classifier = Classifier::load(&model)?;
            for path in list_images(&images)? {
                match classifier.classify(&path) {
                    Ok(probability) => {
                        println!("{:5.2}% {}", probability * 100.0, path.display());
                    }
                    Err(e) => {
                        error!(path = %path.display(), error = %e, "couldn't classify image");
                    }
                }
            }
        }
        Command::Evaluate {
            model,
            images,
            label,
        } => {
            Evaluator::load(&model)?.evaluate(&images, &label)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
