use std::path::{Path, PathBuf};

use designer_lib::ai_client::request_chat;
use designer_lib::command::{execute_command, AgentCommand};
use designer_lib::export::export_file_name;
use designer_lib::harness::TestHarness;
use designer_lib::share;
use designer_lib::state::scene::{load_scene_file, save_scene_file};
use designer_lib::state::{AppSettings, SceneState};
use designer_lib::DesignResult;

const USAGE: &str = "\
usage:
  designer export <scene.json> [out.stl]
  designer share <scene.json>
  designer import <token> [out.json]
  designer chat <scene.json> <message...>
  designer run <commands.json> [--scene <scene.json>]
  designer config";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "designer=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((cmd, rest)) = args.split_first() else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };

    let settings = AppSettings::load();
    let result = match (cmd.as_str(), rest) {
        ("export", [scene, out @ ..]) if out.len() <= 1 => {
            export(settings, Path::new(scene), out.first().map(PathBuf::from))
        }
        ("share", [scene]) => share_scene(Path::new(scene)),
        ("import", [token, out @ ..]) if out.len() <= 1 => {
            import(token, out.first().map(PathBuf::from))
        }
        ("chat", [scene, message @ ..]) if !message.is_empty() => {
            chat(settings, Path::new(scene), message.join(" ")).await
        }
        ("config", []) => config(&settings),
        ("run", [commands, opts @ ..]) => match opts {
            [] => run(settings, Path::new(commands), None),
            [flag, scene] if flag == "--scene" => {
                run(settings, Path::new(commands), Some(Path::new(scene)))
            }
            _ => usage(),
        },
        _ => usage(),
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn usage() -> DesignResult<()> {
    eprintln!("{USAGE}");
    std::process::exit(2);
}

fn export(settings: AppSettings, scene_path: &Path, out: Option<PathBuf>) -> DesignResult<()> {
    let scene = load_scene_file(scene_path)?;
    let harness = TestHarness::with_scene(settings, scene);
    let stl = harness.export_stl()?;
    let out = out.unwrap_or_else(|| PathBuf::from(export_file_name()));
    std::fs::write(&out, stl)?;
    tracing::info!("Wrote {}", out.display());
    Ok(())
}

fn share_scene(scene_path: &Path) -> DesignResult<()> {
    let scene = load_scene_file(scene_path)?;
    println!("{}", share::encode(&scene)?);
    Ok(())
}

fn import(token: &str, out: Option<PathBuf>) -> DesignResult<()> {
    let scene = share::decode(token)?;
    tracing::info!("Decoded {} objects", scene.len());
    match out {
        Some(path) => save_scene_file(&path, &scene)?,
        None => println!("{}", serde_json::to_string_pretty(&scene)?),
    }
    Ok(())
}

async fn chat(settings: AppSettings, scene_path: &Path, message: String) -> DesignResult<()> {
    let server_url = settings.chat_server_url();
    let scene = if scene_path.exists() {
        load_scene_file(scene_path)?
    } else {
        Default::default()
    };
    let mut harness = TestHarness::with_scene(settings, scene);

    harness.app.chat.input = message;
    let Some(request) = harness.app.chat.send_message(&harness.app.scene) else {
        return Ok(());
    };

    let client = reqwest::Client::new();
    let result = request_chat(&client, &server_url, &request).await;
    let added = harness.app.finish_chat(result);

    if let Some(reply) = harness.app.chat.messages.last() {
        if reply.is_error {
            eprintln!("{}", reply.text);
            std::process::exit(1);
        }
        println!("{}", reply.text);
    }
    save_scene_file(scene_path, &harness.app.scene.scene)?;
    if !added.is_empty() {
        harness.app.scene.autosave();
    }
    tracing::info!("Added {} objects to {}", added.len(), scene_path.display());
    Ok(())
}

fn run(settings: AppSettings, commands_path: &Path, scene_path: Option<&Path>) -> DesignResult<()> {
    // Without --scene the batch continues from the last autosave
    let mut harness = match scene_path {
        Some(path) if path.exists() => TestHarness::with_scene(settings, load_scene_file(path)?),
        Some(_) => TestHarness::with_settings(settings),
        None => match SceneState::load_autosave() {
            Some(scene) => TestHarness::with_scene(settings, scene),
            None => TestHarness::with_settings(settings),
        },
    };
    let start_version = harness.app.scene.version();

    let json = std::fs::read_to_string(commands_path)?;
    let commands: Vec<AgentCommand> = serde_json::from_str(&json)?;
    let responses: Vec<_> = commands
        .into_iter()
        .map(|cmd| execute_command(&mut harness, cmd))
        .collect();
    let failed = responses.iter().filter(|r| !r.success).count();
    println!("{}", serde_json::to_string_pretty(&responses)?);

    if let Some(path) = scene_path {
        save_scene_file(path, &harness.app.scene.scene)?;
    }
    if harness.app.scene.version() != start_version {
        harness.app.scene.autosave();
    }
    if failed > 0 {
        tracing::warn!("{} of {} commands failed", failed, responses.len());
    }
    Ok(())
}

/// Write the effective settings (defaults filled in) to the config file
fn config(settings: &AppSettings) -> DesignResult<()> {
    println!("{}", serde_json::to_string_pretty(settings)?);
    match settings.save()? {
        Some(path) => tracing::info!("Saved settings to {}", path.display()),
        None => tracing::warn!("No config directory, settings not saved"),
    }
    Ok(())
}
