//! note-speech CLI — 将笔记转换为语音，管理 ElevenLabs 凭据
//!
//! Usage:
//!   note-speech export <note.md> [--vault <dir>]          Generate audios/<note>.mp3
//!   note-speech config show [--vault <dir>]               Show settings (key masked)
//!   note-speech config set <field> <value> [--vault <dir>] Update one setting

use anyhow::{bail, Context};
use note_speech::{
    generate_audio, settings::update_setting, ConsoleNotifier, ElevenLabsClient,
    EnvOverrideStore, JsonSettingsStore, NoteFile, SettingKey, SettingsStore, SpeechExporter,
    VaultStorage,
};
use std::path::{Path, PathBuf};

const SETTINGS_FILE: &str = ".note-speech/data.json";

#[tokio::main]
async fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "export" => cmd_export(&args[2..]).await,
        "config" => cmd_config(&args[2..]).await,
        "version" | "--version" | "-V" => {
            cmd_version();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"note-speech — 笔记转语音命令行工具

USAGE:
    note-speech <COMMAND> [OPTIONS]

COMMANDS:
    export <note.md> [--vault <dir>]            Convert a note to audios/<note>.mp3 in the vault
    config show [--vault <dir>]                 Show the stored settings
    config set <field> <value> [--vault <dir>]  Set api-key or voice-id
    version                                     Show version information
    help                                        Show this help message

OPTIONS:
    --vault <dir>        Vault root (default: current directory)

ENVIRONMENT:
    ELEVENLABS_API_KEY   Overrides the stored API key
    ELEVENLABS_VOICE_ID  Overrides the stored voice ID
    ELEVENLABS_BASE_URL  Synthesis service base URL (default: https://api.elevenlabs.io)
    RUST_LOG             Log filter, e.g. note_speech=debug"#
    );
}

fn cmd_version() {
    println!("note-speech {}", env!("CARGO_PKG_VERSION"));
}

/// Split `--vault <dir>` out of `args`, returning the vault and the rest.
fn take_vault(args: &[String]) -> anyhow::Result<(PathBuf, Vec<String>)> {
    let mut vault = None;
    let mut rest = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--vault" {
            match iter.next() {
                Some(dir) => vault = Some(PathBuf::from(dir)),
                None => bail!("--vault requires a directory"),
            }
        } else {
            rest.push(arg.clone());
        }
    }
    let vault = match vault {
        Some(dir) => dir,
        None => std::env::current_dir().context("cannot determine current directory")?,
    };
    let vault = vault
        .canonicalize()
        .with_context(|| format!("vault directory not found: {}", vault.display()))?;
    Ok((vault, rest))
}

fn settings_store(vault: &Path) -> JsonSettingsStore {
    JsonSettingsStore::new(vault.join(SETTINGS_FILE))
}

async fn cmd_export(args: &[String]) -> anyhow::Result<()> {
    let (vault, rest) = take_vault(args)?;
    let note_arg = match rest.as_slice() {
        [note] => PathBuf::from(note),
        _ => bail!("usage: note-speech export <note.md> [--vault <dir>]"),
    };
    let note_path = note_arg
        .canonicalize()
        .with_context(|| format!("note not found: {}", note_arg.display()))?;
    let document = NoteFile::open(&vault, &note_path)
        .await
        .with_context(|| format!("cannot read {}", note_path.display()))?;

    let mut client = ElevenLabsClient::builder();
    if let Ok(base_url) = std::env::var("ELEVENLABS_BASE_URL") {
        client = client.base_url(base_url);
    }
    let exporter = SpeechExporter::new(client.build()?, VaultStorage::new(&vault));
    let store = EnvOverrideStore::from_env(settings_store(&vault));

    let outcome = generate_audio(&document, &store, &exporter, &ConsoleNotifier).await?;
    println!("{}", vault.join(&outcome.path).display());
    Ok(())
}

async fn cmd_config(args: &[String]) -> anyhow::Result<()> {
    let (vault, rest) = take_vault(args)?;
    let store = settings_store(&vault);
    match rest.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["show"] | [] => {
            let settings = store.load().await?;
            println!("Settings file: {}", store.path().display());
            println!("{settings}");
        }
        ["set", field, value] => {
            let key: SettingKey = field.parse()?;
            update_setting(&store, key, *value).await?;
            println!("{} updated.", key.label());
        }
        _ => bail!("usage: note-speech config <show | set <api-key|voice-id> <value>> [--vault <dir>]"),
    }
    Ok(())
}
