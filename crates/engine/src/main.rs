//! Reforge Engine - console entry point.
//!
//! Reads one command per line from stdin and routes it to the configured
//! reforge service. Each actor has a single hand slot held here.

use std::collections::HashMap;

use reforge_domain::{ActorId, ItemSnapshot, ItemType};
use reforge_engine::infrastructure::app_settings::EngineSettings;
use reforge_engine::App;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HELP: &str = "commands: present <actor> <item> [wear] | hand <actor> | cancel <actor> | \
                    status | fund <actor> <amount> | pickup <actor> | quit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reforge_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Reforge Engine");

    let settings = EngineSettings::from_env();
    tracing::info!(
        config_dir = %settings.config_dir.display(),
        service = %settings.service_key,
        "Loaded settings"
    );

    let app = App::new(settings).await?;
    println!("{HELP}");

    let mut hands: HashMap<ActorId, Option<ItemSnapshot>> = HashMap::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                None
            }
        };
        let Some(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => run(&app, &mut hands, command),
            Err(message) => println!("{message}\n{HELP}"),
        }
    }

    app.shutdown();
    tracing::info!("Reforge Engine stopped");
    Ok(())
}

#[derive(Debug, PartialEq)]
enum Command {
    Present {
        actor: ActorId,
        item: ItemType,
        wear: u32,
    },
    Hand(ActorId),
    Cancel(ActorId),
    Status,
    Fund {
        actor: ActorId,
        amount: f64,
    },
    Pickup(ActorId),
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let actor_at = |index: usize| -> Result<ActorId, String> {
        let raw = words.get(index).ok_or("missing actor")?;
        ActorId::new(*raw).map_err(|e| e.to_string())
    };

    match words.first().copied() {
        Some("present") => {
            let actor = actor_at(1)?;
            let item = words
                .get(2)
                .ok_or("missing item")?
                .parse::<ItemType>()
                .map_err(|e| e.to_string())?;
            let wear = match words.get(3) {
                Some(raw) => raw.parse().map_err(|_| format!("bad wear '{raw}'"))?,
                None => 0,
            };
            Ok(Command::Present { actor, item, wear })
        }
        Some("hand") => Ok(Command::Hand(actor_at(1)?)),
        Some("cancel") => Ok(Command::Cancel(actor_at(1)?)),
        Some("status") => Ok(Command::Status),
        Some("fund") => {
            let actor = actor_at(1)?;
            let raw = words.get(2).ok_or("missing amount")?;
            let amount = raw.parse().map_err(|_| format!("bad amount '{raw}'"))?;
            Ok(Command::Fund { actor, amount })
        }
        Some("pickup") => Ok(Command::Pickup(actor_at(1)?)),
        Some("quit" | "exit") => Ok(Command::Quit),
        Some(other) => Err(format!("unknown command '{other}'")),
        None => Err("empty command".to_string()),
    }
}

fn run(app: &App, hands: &mut HashMap<ActorId, Option<ItemSnapshot>>, command: Command) {
    match command {
        Command::Present { actor, item, wear } => {
            let hand = hands.entry(actor.clone()).or_default();
            if let Some(held) = hand {
                println!("{actor} is already holding {held}");
                return;
            }
            match ItemSnapshot::new(item).with_wear(wear) {
                Ok(snapshot) => *hand = Some(snapshot),
                Err(e) => {
                    println!("{e}");
                    return;
                }
            }
            let reply = app.reforge.handle_interaction(&actor, hand);
            println!("-> {reply:?}");
        }
        Command::Hand(actor) => {
            let hand = hands.entry(actor.clone()).or_default();
            let reply = app.reforge.handle_interaction(&actor, hand);
            println!("-> {reply:?}");
        }
        Command::Cancel(actor) => {
            println!("-> {:?}", app.reforge.cancel(&actor));
        }
        Command::Status => {
            println!("{:?}", app.reforge.snapshot());
            for (actor, hand) in hands.iter() {
                match hand {
                    Some(item) => println!("  {actor}: {item}"),
                    None => println!("  {actor}: (empty)"),
                }
            }
        }
        Command::Fund { actor, amount } => match &app.wallet {
            Some(wallet) => {
                wallet.deposit(&actor, amount);
                println!("{actor} now has {:.2}", wallet.balance(&actor));
            }
            None => println!("no economy configured (set REFORGE_STARTING_BALANCE)"),
        },
        Command::Pickup(actor) => {
            let hand = hands.entry(actor.clone()).or_default();
            if hand.is_some() {
                println!("{actor}'s hand is full");
                return;
            }
            match app.delivery.pick_up(&actor) {
                Some(item) => {
                    println!("{actor} picks up {item}");
                    *hand = Some(item);
                }
                None => println!("nothing at {actor}'s feet"),
            }
        }
        Command::Quit => {}
    }
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
