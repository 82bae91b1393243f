use tracing_subscriber::EnvFilter;

use vectorclash_duel::VectorClash;
use vectorclash_host::config::HostConfig;
use vectorclash_host::game_loop::spawn_match_session;
use vectorclash_host::session::{SessionBroadcast, SessionCommand};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = HostConfig::load();
    tracing::info!(
        p1 = ?config.setup.combatants[0],
        p2 = ?config.setup.combatants[1],
        win_score = config.win_score,
        "Vector Clash host starting"
    );

    let game = Box::new(VectorClash::new());
    let (cmd_tx, mut broadcast_rx, handle) = spawn_match_session(game, config);

    let stop_tx = cmd_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, stopping match");
            let _ = stop_tx.send(SessionCommand::Stop);
        }
    });

    while let Some(broadcast) = broadcast_rx.recv().await {
        match broadcast {
            SessionBroadcast::Snapshot(_) => {},
            SessionBroadcast::RoundOver { winner, scores } => {
                tracing::info!(winner, "Round to P{winner}: {} - {}", scores[0], scores[1]);
            },
            SessionBroadcast::MatchOver { winner, scores } => {
                tracing::info!(winner, "P{winner} wins the match {} - {}", scores[0], scores[1]);
                let _ = cmd_tx.send(SessionCommand::Stop);
            },
            SessionBroadcast::Ended => break,
        }
    }

    if let Err(e) = handle.await {
        tracing::error!(error = %e, "Match task failed");
    }
}
