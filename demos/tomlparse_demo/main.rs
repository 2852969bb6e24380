//! # tomlparse demo application
//!
//! A pretend training script whose hyperparameters can be set on the command
//! line or pre-populated from `experiments.toml`. It prints the resolved
//! values and exists purely to demonstrate and manually verify the layering.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example tomlparse_demo -- --epochs 3
//! cargo run --example tomlparse_demo -- --config demos/tomlparse_demo/experiments.toml
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature                 | Arguments after `--`                                                    |
//! |-------------------------|-------------------------------------------------------------------------|
//! | Plain parse             | `--epochs 3 --no-shuffle`                                               |
//! | Top-level defaults      | `--config demos/tomlparse_demo/experiments.toml`                        |
//! | Override table          | `--config demos/tomlparse_demo/experiments.toml --table big`            |
//! | Root + override table   | `... --root-table baseline --table big`                                 |
//! | Explicit beats file     | `... --table big --batch-size 8`                                        |
//! | Synthesized option      | `... --table debug --seed 7` (`seed` is only declared by the file)      |
//! | Help with file defaults | `... --table big --help`                                                |
//! | Strict mode             | `TOMLPARSE_DEMO_STRICT=1 ... --table debug` (fails on `seed`)           |
//! | Write-back              | `... --table big --save-to runs/last.toml`                              |
//! | Debug logging           | `RUST_LOG=tomlparse=debug ...`                                          |

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use tomlparse::{Argument, ArgumentParser, Namespace, OptionKind, write_to_toml};

/// The typed view of the options every run has.
#[derive(Debug, Deserialize)]
struct Hyperparameters {
    epochs: i64,
    batch_size: i64,
    learning_rate: f64,
    optimizer: String,
    shuffle: bool,
}

fn make_parser() -> ArgumentParser {
    let strict = std::env::var_os("TOMLPARSE_DEMO_STRICT").is_some();

    ArgumentParser::new("tomlparse-demo")
        .about("Pretend to train a model; hyperparameters may come from a TOML file.")
        .strict(strict)
        .arg(Argument::new("--epochs", 5).help("Passes over the training set"))
        .arg(Argument::new("--batch-size", 64).help("Examples per step"))
        .arg(
            Argument::new("--learning-rate", 1)
                .kind(OptionKind::Float)
                .help("Optimizer step size"),
        )
        .arg(Argument::new("--optimizer", "adam").help("sgd or adam"))
        .arg(Argument::new("--shuffle", false).help("Shuffle between epochs"))
        .arg(Argument::new("--save-to", "").help("Write the resolved values to this file"))
}

fn print_namespace(args: &Namespace) {
    let max_key_len = args.keys().map(str::len).max().unwrap_or(0);
    for (key, value) in args.iter() {
        println!("{key:<max_key_len$}  {value}");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let parser = make_parser();
    let mut args = parser.parse();

    print_namespace(&args);

    let hyper: Hyperparameters = match args.deserialize_into() {
        Ok(h) => h,
        Err(e) => parser.exit(e),
    };
    println!();
    println!(
        "training with {} for {} epochs (batch {}, lr {}, shuffle {})",
        hyper.optimizer, hyper.epochs, hyper.batch_size, hyper.learning_rate, hyper.shuffle
    );

    let save_to = args.remove("save_to").and_then(|v| v.as_str().map(str::to_string));
    if let Some(path) = save_to.filter(|p| !p.is_empty()) {
        if let Err(e) = write_to_toml(&args, &path, Some("saved")) {
            parser.exit(e);
        }
        println!("saved to [saved] in {path}");
    }
}
