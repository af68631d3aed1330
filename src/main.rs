use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use url::Url;

use keyhub_console::config::{APP_NAME, Config};
use keyhub_console::models::LicenseKey;
use keyhub_console::render;
use keyhub_console::{ApiClient, Console, FileStorage, SessionStore};

#[derive(Debug, Parser)]
#[command(name = "keyhub-console", about = "Interactive admin console for the KeyHub license service")]
struct Args {
    /// Backend base URL (overrides KEYHUB_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Keep the session token in memory instead of on disk
    #[arg(long)]
    ephemeral: bool,
}

const HELP: &str = "\
Commands:
  login <username>              log in and store the session token
  logout                        clear the stored session token
  projects                      reload and list projects
  use <id>                      select a project
  project add <name> [desc]     create a project
  project edit <name> [desc]    rename/describe the selected project
  project rm                    delete the selected project
  keys                          reload keys for the selected project
  gen [--key <value>] [remarks] create a key (server-generated unless --key)
  key toggle <key>              enable/disable a key
  key remarks <key> <text>      update a key's remarks
  key rm <key>                  delete a key and its bindings
  bindings <key>                open the bindings view for a key
  unbind <id>                   remove a binding from the open view
  close                         close the bindings view
  admins                        list admin accounts
  admin add <username>          create an admin account
  admin rename <old> <new>      change an admin's username
  admin passwd <username>       change an admin's password
  admin rm <username>           delete an admin account
  quit                          exit
";

fn prompt_line(prompt: &str) -> io::Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn confirm(message: &str) -> bool {
    matches!(
        prompt_line(&format!("{message} [y/N] ")),
        Ok(Some(answer)) if answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
    )
}

fn show_keys(keys: &[LicenseKey], console: &Console<ApiClient>) {
    if let Some(project) = console.current_project() {
        let desc = project.description.as_deref().unwrap_or("no description");
        println!("Project [{}] {}  {}", project.id, project.name, desc);
    }
    print!("{}", render::render_keys(keys));
    print!("{}", render::render_stats(console.stats()));
}

fn drain_toasts(console: &mut Console<ApiClient>) {
    for text in console.toasts.drain_active() {
        println!("* {text}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::from_env();
    let base_url: Url = args
        .base_url
        .unwrap_or(config.base_url)
        .parse()
        .context("invalid backend base URL")?;

    let session = if args.ephemeral {
        SessionStore::in_memory()
    } else {
        FileStorage::new(APP_NAME)
            .map(|storage| SessionStore::new(Arc::new(storage)))
            .unwrap_or_else(SessionStore::in_memory)
    };

    let api = ApiClient::new(base_url, session.clone());
    let mut console = Console::new(api, session.clone());

    // The rendered key table; toggle and unbind look keys up here.
    let mut keys: Vec<LicenseKey> = Vec::new();

    if session.is_authenticated() {
        if let Ok(list) = console.load_projects().await {
            keys = list;
            show_keys(&keys, &console);
        }
    } else {
        println!("Not logged in. Run `login <username>` first.");
    }
    drain_toasts(&mut console);

    loop {
        let Some(line) = prompt_line("keyhub> ")? else {
            break;
        };
        let words: Vec<&str> = line.split_whitespace().collect();
        let started = Instant::now();

        match words.as_slice() {
            [] => continue,
            ["help"] => print!("{HELP}"),
            ["quit"] | ["exit"] => break,

            ["login", username] => {
                let Some(password) = prompt_line("Password: ")? else {
                    continue;
                };
                if console.login(username, &password).await.is_ok() {
                    if let Ok(list) = console.load_projects().await {
                        keys = list;
                        show_keys(&keys, &console);
                    }
                }
            }
            ["logout"] => console.logout(),

            ["projects"] => {
                if let Ok(list) = console.load_projects().await {
                    keys = list;
                }
                let selected = console.current_project().map(|p| p.id);
                print!("{}", render::render_projects(console.projects(), selected));
            }
            ["use", id] => match id.parse() {
                Ok(id) => {
                    if let Ok(list) = console.select_project(id).await {
                        keys = list;
                        show_keys(&keys, &console);
                    }
                }
                Err(_) => println!("Project id must be a number."),
            },
            ["project", "add", name, desc @ ..] => {
                let input = keyhub_console::models::ProjectInput {
                    name: name.to_string(),
                    description: (!desc.is_empty()).then(|| desc.join(" ")),
                };
                let _ = console.save_project(None, input).await;
            }
            ["project", "edit", name, desc @ ..] => {
                let Some(id) = console.current_project().map(|p| p.id) else {
                    println!("Select a project first.");
                    continue;
                };
                let input = keyhub_console::models::ProjectInput {
                    name: name.to_string(),
                    description: (!desc.is_empty()).then(|| desc.join(" ")),
                };
                let _ = console.save_project(Some(id), input).await;
            }
            ["project", "rm"] => {
                let _ = console.delete_current_project(confirm).await;
            }

            ["keys"] => {
                if let Ok(list) = console.load_keys().await {
                    keys = list;
                    show_keys(&keys, &console);
                }
            }
            ["gen", rest @ ..] => {
                let (custom_key, remarks) = match rest {
                    ["--key", value, remarks @ ..] => (Some(value.to_string()), remarks.join(" ")),
                    remarks => (None, remarks.join(" ")),
                };
                if let Ok(Some(created)) = console.create_key(&remarks, custom_key).await {
                    println!("Created key: {created}");
                    if let Ok(list) = console.load_keys().await {
                        keys = list;
                        show_keys(&keys, &console);
                    }
                }
            }
            ["key", "toggle", key] => {
                match keys.iter().find(|k| k.license_key == *key).cloned() {
                    Some(entry) => {
                        if console.toggle_key(&entry).await.is_ok() {
                            if let Ok(list) = console.load_keys().await {
                                keys = list;
                                show_keys(&keys, &console);
                            }
                        }
                    }
                    None => println!("Unknown key; run `keys` first."),
                }
            }
            ["key", "remarks", key, text @ ..] => {
                let _ = console.update_remarks(key, &text.join(" ")).await;
            }
            ["key", "rm", key] => {
                if console.delete_key(key, confirm).await.is_ok() {
                    if let Ok(list) = console.load_keys().await {
                        keys = list;
                    }
                }
            }

            ["bindings", key] => {
                if console.open_bindings(key).await.is_ok() {
                    if let Some(view) = console.bindings_modal.value() {
                        print!("{}", render::render_bindings(view));
                    }
                }
            }
            ["unbind", id] => match id.parse() {
                Ok(id) => {
                    if let Ok(list) = console.unbind(id, confirm).await {
                        if !list.is_empty() {
                            keys = list;
                        }
                        if let Some(view) = console.bindings_modal.value() {
                            print!("{}", render::render_bindings(view));
                        }
                    }
                }
                Err(_) => println!("Binding id must be a number."),
            },
            ["close"] => {
                console.bindings_modal.close();
                console.bindings_modal.finish_close();
            }

            ["admins"] => {
                if let Ok(admins) = console.load_admins().await {
                    print!("{}", render::render_admins(&admins));
                }
            }
            ["admin", "add", username] => {
                let Some(password) = prompt_line("Password: ")? else {
                    continue;
                };
                let _ = console.create_admin(username, &password).await;
            }
            ["admin", "rename", old, new] => {
                let _ = console.rename_admin(old, new).await;
            }
            ["admin", "passwd", username] => {
                let Some(password) = prompt_line("New password: ")? else {
                    continue;
                };
                let _ = console.change_password(username, &password).await;
            }
            ["admin", "rm", username] => {
                let _ = console.delete_admin(username, confirm).await;
            }

            _ => println!("Unknown command; try `help`."),
        }

        tracing::debug!(elapsed_ms = started.elapsed().as_millis() as u64, "command handled");
        drain_toasts(&mut console);

        if console.session_expired() {
            println!("Session expired. Start again and run `login <username>`.");
            break;
        }
    }

    Ok(())
}
