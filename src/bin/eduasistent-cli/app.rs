use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use clap::Parser;

use eduasistent::builder::DEFAULT_TEMPERATURE;
use eduasistent::loader::decode_text;
use eduasistent::secret_store::SecretStore;
use eduasistent::{
    BatchEvaluator, CandidateFile, EvalSession, ExportFormat, ModelKind, ProgressEvent,
    ProviderBuilder,
};

use crate::args::{CliArgs, CommandKind};
use crate::logging::init_logging;

pub async fn run() -> anyhow::Result<()> {
    init_logging()?;
    let args = CliArgs::parse();

    if let Some(kind) = args.command_kind() {
        return handle_key_command(kind, args.key_value.as_deref());
    }

    run_batch(&args).await
}

fn handle_key_command(kind: CommandKind, value: Option<&str>) -> anyhow::Result<()> {
    let mut store = SecretStore::new()?;
    match kind {
        CommandKind::Set => {
            let Some(value) = value else {
                bail!("Chybí hodnota API klíče. Použití: eduasistent set <klíč>");
            };
            store.set_api_key(value)?;
            println!("API klíč uložen.");
        }
        CommandKind::Get => match store.api_key() {
            Some(key) => println!("{key}"),
            None => println!("Žádný API klíč není uložen."),
        },
        CommandKind::Delete => {
            store.delete_api_key()?;
            println!("API klíč odstraněn.");
        }
    }
    Ok(())
}

async fn run_batch(args: &CliArgs) -> anyhow::Result<()> {
    let Some(reference_path) = args.reference.as_deref() else {
        bail!("Chybí vzorový text. Zadejte jej volbou --reference.");
    };
    if args.students.is_empty() {
        bail!("Chybí texty žáků. Zadejte je volbou --student (lze opakovat).");
    }

    let api_key = resolve_api_key(args)?;
    let mut session = EvalSession::new()?;
    session.set_credential(api_key.clone());

    let reference = load_reference(reference_path)?;
    if args.show_reference {
        println!("--- Vzorový text ---\n{reference}\n");
    }

    let candidates = load_candidates(&args.students)?;
    println!("Nahráno {} souborů.", candidates.len());

    let model = match args.model.as_deref() {
        Some(raw) => raw.parse::<ModelKind>().map_err(|_| {
            let allowed: Vec<&str> = ModelKind::all().iter().map(ModelKind::as_str).collect();
            anyhow::anyhow!(
                "Neznámý model: {raw}. Dostupné modely: {}",
                allowed.join(", ")
            )
        })?,
        None => ModelKind::default(),
    };

    let mut builder = ProviderBuilder::new()
        .api_key(api_key.as_str())
        .model(model)
        .temperature(args.temperature.unwrap_or(DEFAULT_TEMPERATURE));
    if let Some(base_url) = &args.base_url {
        builder = builder.base_url(base_url);
    }
    if let Some(timeout) = args.timeout {
        builder = builder.timeout_seconds(timeout);
    }
    let provider = builder.build()?;

    let evaluator = BatchEvaluator::new(Box::new(provider)).on_progress(|event| {
        if let ProgressEvent::ItemStarted { index, total, file } = event {
            eprintln!("Analyzuji soubor {index}/{total}: {file}");
        }
    });

    let records = evaluator.run(&reference, &candidates).await;
    eprintln!("Analýza dokončena!");
    session.replace_results(records);

    print_summary(&session);

    if let Some(name) = &args.detail {
        print_detail(&session, name)?;
    }

    export_results(&session, args)
}

fn resolve_api_key(args: &CliArgs) -> anyhow::Result<String> {
    if let Some(key) = &args.api_key {
        return Ok(key.clone());
    }
    if let Ok(key) = std::env::var("OPENAI_API_KEY") {
        if !key.is_empty() {
            return Ok(key);
        }
    }
    if let Some(key) = SecretStore::new()?.api_key() {
        return Ok(key.clone());
    }
    bail!(
        "Chybí API klíč. Uložte jej příkazem `eduasistent set <klíč>`, \
         nastavte proměnnou OPENAI_API_KEY, nebo použijte volbu --api-key."
    );
}

fn load_reference(path: &Path) -> anyhow::Result<String> {
    let bytes =
        fs::read(path).with_context(|| format!("Nepodařilo se přečíst {}", path.display()))?;
    let decoded = decode_text(&bytes)
        .map_err(|_| anyhow::anyhow!("Nepodařilo se načíst vzorový text. Zkontrolujte kódování souboru."))?;
    Ok(decoded.text)
}

fn load_candidates(paths: &[std::path::PathBuf]) -> anyhow::Result<Vec<CandidateFile>> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::with_capacity(paths.len());
    for path in paths {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .with_context(|| format!("Neplatná cesta k souboru: {}", path.display()))?;
        if !seen.insert(name.clone()) {
            bail!("Duplicitní název souboru: {name}");
        }
        let bytes =
            fs::read(path).with_context(|| format!("Nepodařilo se přečíst {}", path.display()))?;
        candidates.push(CandidateFile::new(name, bytes));
    }
    Ok(candidates)
}

fn print_summary(session: &EvalSession) {
    println!("\n{:<40} hodnocení (1–5)", "soubor");
    for record in session.results() {
        println!("{:<40} {}", record.file, record.score);
    }
}

fn print_detail(session: &EvalSession, name: &str) -> anyhow::Result<()> {
    let Some(record) = session.result_for(name) else {
        bail!("Soubor {name} není ve výsledcích.");
    };
    println!("\nHodnocení: {}/5", record.score);
    println!("Zpětná vazba:\n{}", record.feedback);
    Ok(())
}

fn export_results(session: &EvalSession, args: &CliArgs) -> anyhow::Result<()> {
    let format = match args.format.as_deref() {
        Some(raw) => raw
            .parse::<ExportFormat>()
            .map_err(|_| anyhow::anyhow!("Neznámý formát exportu: {raw}. Použijte csv nebo excel."))?,
        None => ExportFormat::default(),
    };
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| format.default_file_name().into());

    let bytes = eduasistent::export::export_bytes(session.results(), format)?;
    fs::write(&output, bytes)
        .with_context(|| format!("Nepodařilo se zapsat {}", output.display()))?;
    println!("\nVýsledky uloženy do {}", output.display());
    Ok(())
}
